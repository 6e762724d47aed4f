use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::Frame;
use tachyonfx::Duration;

use deckforge_core::grid::DeckSection;
use deckforge_core::{ApiClient, CardPreview, DeckId, Result, SearchState, SlotGrid};

use crate::effects::{self, FxManager};
use crate::screens::builder::{BuilderScreen, BuilderView};

/// Interactions the screen can request. Network-touching actions run to
/// completion before the next event is handled, so mutations on the deck
/// are naturally serialized.
#[derive(Debug, Clone)]
pub enum UiAction {
    Quit,
    AddCard(u32),
    RemoveCard(u32),
    ClearDeck,
    RenameDeck(String),
    SubmitSearch,
    PageForward,
    PageBack,
    ClearFilters,
    Preview(CardPreview),
}

/// Main application state
pub struct App {
    pub deck_id: DeckId,
    api: ApiClient,
    pub main_grid: SlotGrid,
    pub extra_grid: SlotGrid,
    pub search: SearchState,
    pub preview: Option<CardPreview>,
    /// Blocking server-error notification; swallows input until dismissed.
    pub popup: Option<String>,
    /// Last success message from the server, shown under the header.
    pub status: Option<String>,
    pub fx: FxManager,
    pub builder: BuilderScreen,
}

impl App {
    pub fn new(deck_id: DeckId, api: ApiClient) -> Self {
        Self {
            deck_id,
            api,
            main_grid: SlotGrid::new(DeckSection::Main),
            extra_grid: SlotGrid::new(DeckSection::Extra),
            search: SearchState::new(),
            preview: None,
            popup: None,
            status: None,
            fx: FxManager::default(),
            builder: BuilderScreen::new(),
        }
    }

    /// Initial page-load sync of both grids.
    pub fn load(&mut self) {
        self.refresh_grids();
        self.fx
            .add_unique_effect("startup", effects::startup_coalesce());
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let Self {
            builder,
            deck_id,
            main_grid,
            extra_grid,
            search,
            preview,
            popup,
            status,
            ..
        } = self;
        let view = BuilderView {
            deck_id,
            main_grid,
            extra_grid,
            search,
            preview: preview.as_ref(),
            popup: popup.as_deref(),
            status: status.as_deref(),
        };
        builder.render(frame, &view);

        // Apply all tachyonfx effects on top of rendered content
        let tick_duration = Duration::from_millis(33); // ~30fps
        let buf = frame.buffer_mut();
        self.fx.process_effects(tick_duration, buf, area);
    }

    /// Handle key event. Returns true if should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_popup();
            }
            return false;
        }

        let Self {
            builder,
            main_grid,
            extra_grid,
            search,
            ..
        } = self;
        let action = builder.handle_key(key, main_grid, extra_grid, search);
        self.process_action(action)
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.popup.is_some() {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.dismiss_popup();
            }
            return;
        }

        let Self {
            builder,
            main_grid,
            extra_grid,
            search,
            ..
        } = self;
        let action = builder.handle_mouse(mouse, main_grid, extra_grid, search);
        self.process_action(action);
    }

    pub fn handle_resize(&mut self, _w: u16, _h: u16) {
        // Ratatui handles resize automatically
    }

    pub fn tick(&mut self) {
        self.builder.tick(&self.search);
    }

    fn dismiss_popup(&mut self) {
        self.popup = None;
        self.fx.cancel_unique_effect("popup");
    }

    /// Process a screen action. Returns true if should quit.
    fn process_action(&mut self, action: Option<UiAction>) -> bool {
        match action {
            Some(UiAction::Quit) => return true,
            Some(UiAction::Preview(preview)) => {
                self.preview = Some(preview);
            }
            Some(UiAction::AddCard(card_id)) => {
                let result = self.api.add_card(&self.deck_id, card_id);
                self.after_mutation("add card", result);
            }
            Some(UiAction::RemoveCard(card_id)) => {
                let result = self.api.remove_card(&self.deck_id, card_id);
                self.after_mutation("remove card", result);
            }
            Some(UiAction::ClearDeck) => {
                let result = self.api.clear_deck(&self.deck_id);
                self.after_mutation("clear deck", result);
            }
            Some(UiAction::RenameDeck(name)) => {
                let result = self.api.rename_deck(&self.deck_id, &name);
                self.after_mutation("rename deck", result);
            }
            Some(UiAction::SubmitSearch) => self.run_search(0),
            Some(UiAction::PageForward) => {
                if self.search.can_page_forward() {
                    self.run_search(self.search.forward_offset());
                }
            }
            Some(UiAction::PageBack) => {
                if self.search.can_page_back() {
                    self.run_search(self.search.back_offset());
                }
            }
            Some(UiAction::ClearFilters) => {
                self.search.clear_filters();
            }
            None => {}
        }

        false
    }

    /// Write-then-refetch: a successful mutation triggers exactly one
    /// re-sync of both grids; a failed one leaves them untouched.
    fn after_mutation(&mut self, what: &str, result: Result<String>) {
        match result {
            Ok(message) => {
                self.status = (!message.is_empty()).then_some(message);
                self.refresh_grids();
                self.fx
                    .add_unique_effect("grid_refresh", effects::grid_refresh_sweep());
            }
            Err(err) if err.is_user_facing() => {
                self.popup = Some(err.to_string());
                self.fx
                    .add_unique_effect("popup", effects::popup_shimmer());
            }
            Err(err) => log::error!("failed to {}: {}", what, err),
        }
    }

    /// Fetch the deck list once and rebuild both grids from it. On failure
    /// the stale grids stay on screen.
    fn refresh_grids(&mut self) {
        match self.api.deck_cards(&self.deck_id) {
            Ok(cards) => {
                self.main_grid.sync(&cards);
                self.extra_grid.sync(&cards);
            }
            Err(err) => log::error!("deck refresh failed, keeping stale grids: {}", err),
        }
    }

    fn run_search(&mut self, offset: u32) {
        match self.api.search(&self.search.filters, offset) {
            Ok(page) => self.search.apply(offset, page),
            Err(err) if err.is_user_facing() => {
                self.popup = Some(err.to_string());
                self.fx
                    .add_unique_effect("popup", effects::popup_shimmer());
            }
            Err(err) => log::error!("card search failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_for(server: &mockito::ServerGuard) -> App {
        let api = ApiClient::new(&server.url()).unwrap();
        App::new(DeckId::parse("7").unwrap(), api)
    }

    #[test]
    fn test_successful_add_refetches_deck_once() {
        let mut server = mockito::Server::new();
        let _add = server
            .mock("POST", "/decks/7/cards/add/42")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Card added to deck."}"#)
            .create();
        let refetch = server
            .mock("GET", "/api/decks/7/cards")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":42,"img_url":"/static/images/42.jpg","card_desc":"a dragon","quantity":1,"is_extra_deck":false}]"#,
            )
            .expect(1)
            .create();

        let mut app = app_for(&server);
        app.process_action(Some(UiAction::AddCard(42)));

        refetch.assert();
        assert_eq!(app.main_grid.occupied(), 1);
        assert!(app.popup.is_none());
        assert_eq!(app.status.as_deref(), Some("Card added to deck."));
    }

    #[test]
    fn test_failed_add_skips_refetch_and_raises_popup() {
        let mut server = mockito::Server::new();
        let _add = server
            .mock("POST", "/decks/7/cards/add/42")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"You can only have 3 copies of a card."}"#)
            .create();
        let refetch = server
            .mock("GET", "/api/decks/7/cards")
            .expect(0)
            .create();

        let mut app = app_for(&server);
        app.process_action(Some(UiAction::AddCard(42)));

        refetch.assert();
        assert_eq!(
            app.popup.as_deref(),
            Some("You can only have 3 copies of a card.")
        );
        assert_eq!(app.main_grid.occupied(), 0);
    }

    #[test]
    fn test_search_submit_replaces_results() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("POST", "/api/cards/search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cards":[{"id":5,"name":"Blue-Eyes","type":"Monster","desc":"d","card_images":[]}],"pages_remaining":0}"#)
            .create();

        let mut app = app_for(&server);
        app.process_action(Some(UiAction::SubmitSearch));

        assert_eq!(app.search.results.len(), 1);
        assert!(!app.search.can_page_forward());
        assert!(!app.search.can_page_back());
    }
}
