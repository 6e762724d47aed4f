use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use deckforge_core::grid::DeckSection;
use deckforge_core::{CardPreview, DeckId, SearchState, SlotGrid};
use deckforge_widgets::popup::{centered_rect, PopupWidget};
use deckforge_widgets::preview::CardPreviewWidget;
use deckforge_widgets::search_panel::{
    FormAction, ResultZone, SearchFormState, SearchPanelHit, SearchPanelWidget,
};
use deckforge_widgets::slot_grid::{DeckGridWidget, SLOTS_PER_ROW};
use deckforge_widgets::theme::Theme;

use crate::app::UiAction;

/// Read-only snapshot of app state the screen renders from.
pub struct BuilderView<'a> {
    pub deck_id: &'a DeckId,
    pub main_grid: &'a SlotGrid,
    pub extra_grid: &'a SlotGrid,
    pub search: &'a SearchState,
    pub preview: Option<&'a CardPreview>,
    pub popup: Option<&'a str>,
    pub status: Option<&'a str>,
}

/// Which region keyboard input is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    MainGrid,
    ExtraGrid,
    SearchForm,
    SearchResults,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::MainGrid => Focus::ExtraGrid,
            Focus::ExtraGrid => Focus::SearchForm,
            Focus::SearchForm => Focus::SearchResults,
            Focus::SearchResults => Focus::MainGrid,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::MainGrid => Focus::SearchResults,
            Focus::ExtraGrid => Focus::MainGrid,
            Focus::SearchForm => Focus::ExtraGrid,
            Focus::SearchResults => Focus::SearchForm,
        }
    }
}

/// The single deck-building screen: both slot grids, the preview pane and
/// the search panel, with every interactive region mouse hit-testable.
pub struct BuilderScreen {
    pub focus: Focus,
    pub main_cursor: usize,
    pub extra_cursor: usize,
    pub result_cursor: usize,
    pub result_scroll: usize,
    pub form: SearchFormState,
    /// Rename prompt buffer; Some while the prompt is open.
    pub rename: Option<String>,

    // Layout rects cached on render for mouse hit-testing
    main_area: Rect,
    extra_area: Rect,
    search_area: Rect,
    clear_deck_rect: Rect,
}

impl BuilderScreen {
    pub fn new() -> Self {
        Self {
            focus: Focus::MainGrid,
            main_cursor: 0,
            extra_cursor: 0,
            result_cursor: 0,
            result_scroll: 0,
            form: SearchFormState::new(),
            rename: None,
            main_area: Rect::default(),
            extra_area: Rect::default(),
            search_area: Rect::default(),
            clear_deck_rect: Rect::default(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, view: &BuilderView<'_>) {
        let area = frame.area();
        let bg = Block::default().style(Style::default().bg(Theme::BG));
        frame.render_widget(bg, area);

        let rows = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Help
        ])
        .split(area);

        self.render_header(frame, view, rows[0]);

        let columns = Layout::horizontal([
            Constraint::Length(26), // Preview pane
            Constraint::Min(61),    // Deck grids
            Constraint::Length(40), // Search panel
        ])
        .split(rows[1]);

        frame.render_widget(CardPreviewWidget::new(view.preview), columns[0]);

        // Grids, main above extra
        let grid_rows = Layout::vertical([
            Constraint::Length(DeckGridWidget::required_height(view.main_grid.capacity())),
            Constraint::Length(1),
            Constraint::Length(DeckGridWidget::required_height(view.extra_grid.capacity())),
            Constraint::Min(0),
        ])
        .split(columns[1]);
        self.main_area = grid_rows[0];
        self.extra_area = grid_rows[2];

        frame.render_widget(
            DeckGridWidget::new(view.main_grid)
                .cursor(Some(self.main_cursor))
                .focused(self.focus == Focus::MainGrid),
            self.main_area,
        );
        frame.render_widget(
            DeckGridWidget::new(view.extra_grid)
                .cursor(Some(self.extra_cursor))
                .focused(self.focus == Focus::ExtraGrid),
            self.extra_area,
        );

        // Search panel; keep the result cursor inside the visible window
        self.search_area = columns[2];
        let visible = SearchPanelWidget::visible_result_rows(self.search_area);
        if visible > 0 {
            if self.result_cursor < self.result_scroll {
                self.result_scroll = self.result_cursor;
            }
            if self.result_cursor >= self.result_scroll + visible {
                self.result_scroll = self.result_cursor + 1 - visible;
            }
        }
        frame.render_widget(
            SearchPanelWidget::new(view.search)
                .form_focused(self.focus == Focus::SearchForm)
                .results_focused(self.focus == Focus::SearchResults)
                .field_cursor(self.form.field_cursor)
                .result_cursor(self.result_cursor)
                .scroll(self.result_scroll),
            self.search_area,
        );

        self.render_help(frame, rows[2]);

        if let Some(buffer) = &self.rename {
            render_rename_prompt(frame, area, buffer);
        }

        // Server-error popup goes on top of everything
        if let Some(message) = view.popup {
            frame.render_widget(PopupWidget::new("Server Error", message), area);
        }
    }

    fn render_header(&mut self, frame: &mut Frame, view: &BuilderView<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Theme::SLOT_BORDER));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let title = Line::from(vec![
            Span::styled(
                "  DECKFORGE ",
                Style::default().fg(Theme::GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled("\u{2502} ", Style::default().fg(Theme::SLOT_BORDER)),
            Span::styled(
                format!("Deck {}", view.deck_id),
                Style::default()
                    .fg(Theme::BRIGHT_TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(title), inner);

        // Clear-deck control, right-aligned on the title row
        let clear_label = "[ Clear Deck ]";
        let clear_x = inner
            .x
            .saturating_add(inner.width.saturating_sub(clear_label.len() as u16 + 2));
        self.clear_deck_rect = Rect::new(clear_x, inner.y, clear_label.len() as u16, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                clear_label,
                Style::default()
                    .fg(Theme::REMOVE_ICON)
                    .add_modifier(Modifier::BOLD),
            )),
            self.clear_deck_rect,
        );

        if inner.height > 1 {
            if let Some(status) = view.status {
                let status_area = Rect::new(inner.x + 2, inner.y + 1, inner.width.saturating_sub(2), 1);
                frame.render_widget(
                    Paragraph::new(Span::styled(status, Style::default().fg(Theme::SUCCESS))),
                    status_area,
                );
            }
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = Paragraph::new(Line::from(vec![
            Span::styled("[", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("Tab", Style::default().fg(Theme::GOLD)),
            Span::styled("] Focus  [", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("\u{2190}\u{2191}\u{2192}\u{2193}", Style::default().fg(Theme::GOLD)),
            Span::styled("] Move  [", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("Enter", Style::default().fg(Theme::GOLD)),
            Span::styled("] Add/Remove  [", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("/", Style::default().fg(Theme::GOLD)),
            Span::styled("] Search  [", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("c", Style::default().fg(Theme::GOLD)),
            Span::styled("] Clear Deck  [", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("r", Style::default().fg(Theme::GOLD)),
            Span::styled("] Rename  [", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled("q", Style::default().fg(Theme::GOLD)),
            Span::styled("] Quit", Style::default().fg(Theme::DIM_TEXT)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, area);
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        main_grid: &SlotGrid,
        extra_grid: &SlotGrid,
        search: &mut SearchState,
    ) -> Option<UiAction> {
        if self.rename.is_some() {
            return self.handle_rename_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return None;
            }
            _ => {}
        }

        // Jump straight to the form from anywhere; typing there needs the
        // remaining characters, so these shortcuts stop at its edge
        if self.focus != Focus::SearchForm {
            if key.code == KeyCode::Char('/') {
                self.focus = Focus::SearchForm;
                return None;
            }
            if key.code == KeyCode::Char('q') {
                return Some(UiAction::Quit);
            }
        }

        match self.focus {
            Focus::MainGrid => self.handle_grid_key(key, main_grid),
            Focus::ExtraGrid => self.handle_grid_key(key, extra_grid),
            Focus::SearchResults => self.handle_results_key(key, search),
            Focus::SearchForm => {
                if key.code == KeyCode::Esc {
                    self.focus = Focus::MainGrid;
                    return None;
                }
                match self.form.handle_key(key, &mut search.filters) {
                    Some(FormAction::Submit) => Some(UiAction::SubmitSearch),
                    Some(FormAction::Clear) => Some(UiAction::ClearFilters),
                    None => None,
                }
            }
        }
    }

    fn handle_rename_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Esc => {
                self.rename = None;
            }
            KeyCode::Enter => {
                if let Some(buffer) = self.rename.take() {
                    let name = buffer.trim().to_string();
                    if !name.is_empty() {
                        return Some(UiAction::RenameDeck(name));
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.rename.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.rename.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        None
    }

    fn handle_grid_key(&mut self, key: KeyEvent, grid: &SlotGrid) -> Option<UiAction> {
        match key.code {
            KeyCode::Char('c') => return Some(UiAction::ClearDeck),
            KeyCode::Char('r') => {
                self.rename = Some(String::new());
                return None;
            }
            _ => {}
        }

        let capacity = grid.capacity();
        let cursor = match grid.section() {
            DeckSection::Main => &mut self.main_cursor,
            DeckSection::Extra => &mut self.extra_cursor,
        };

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                *cursor = cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if *cursor + 1 < capacity {
                    *cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *cursor = cursor.saturating_sub(SLOTS_PER_ROW);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if *cursor + SLOTS_PER_ROW < capacity {
                    *cursor += SLOTS_PER_ROW;
                }
            }
            KeyCode::Enter | KeyCode::Delete | KeyCode::Char('x') => {
                let index = *cursor;
                return grid
                    .slot(index)
                    .map(|content| UiAction::RemoveCard(content.card_id));
            }
            _ => return None,
        }

        // Cursor landed on a new slot; treat it like a hover
        let index = *cursor;
        grid.slot(index)
            .map(|content| UiAction::Preview(CardPreview::from(content)))
    }

    fn handle_results_key(&mut self, key: KeyEvent, search: &SearchState) -> Option<UiAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_cursor = self.result_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.result_cursor + 1 < search.results.len() {
                    self.result_cursor += 1;
                }
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => {
                return Some(UiAction::PageBack);
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => {
                return Some(UiAction::PageForward);
            }
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('+') => {
                return search
                    .results
                    .get(self.result_cursor)
                    .map(|card| UiAction::AddCard(card.id));
            }
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('-') => {
                return search
                    .results
                    .get(self.result_cursor)
                    .map(|card| UiAction::RemoveCard(card.id));
            }
            _ => return None,
        }

        search
            .results
            .get(self.result_cursor)
            .map(|card| UiAction::Preview(CardPreview::from(card)))
    }

    pub fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        main_grid: &SlotGrid,
        extra_grid: &SlotGrid,
        search: &SearchState,
    ) -> Option<UiAction> {
        if self.rename.is_some() {
            return None;
        }

        match mouse.kind {
            MouseEventKind::Moved => {
                self.hover_at(mouse.column, mouse.row, main_grid, extra_grid, search)
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.click_at(mouse.column, mouse.row, main_grid, extra_grid, search)
            }
            MouseEventKind::ScrollUp => {
                if in_rect(self.search_area, mouse.column, mouse.row) {
                    self.result_scroll = self.result_scroll.saturating_sub(1);
                }
                None
            }
            MouseEventKind::ScrollDown => {
                let visible = SearchPanelWidget::visible_result_rows(self.search_area);
                if in_rect(self.search_area, mouse.column, mouse.row)
                    && self.result_scroll + visible < search.results.len()
                {
                    self.result_scroll += 1;
                }
                None
            }
            _ => None,
        }
    }

    /// Pointer hover over any card tile updates the preview pane;
    /// last-hovered-wins, no network involved.
    fn hover_at(
        &mut self,
        column: u16,
        row: u16,
        main_grid: &SlotGrid,
        extra_grid: &SlotGrid,
        search: &SearchState,
    ) -> Option<UiAction> {
        if let Some(index) =
            DeckGridWidget::slot_at(self.main_area, main_grid.capacity(), column, row)
        {
            return main_grid
                .slot(index)
                .map(|content| UiAction::Preview(CardPreview::from(content)));
        }
        if let Some(index) =
            DeckGridWidget::slot_at(self.extra_area, extra_grid.capacity(), column, row)
        {
            return extra_grid
                .slot(index)
                .map(|content| UiAction::Preview(CardPreview::from(content)));
        }
        if let Some(SearchPanelHit::Result(visible, _)) =
            SearchPanelWidget::hit(self.search_area, column, row)
        {
            return search
                .results
                .get(self.result_scroll + visible)
                .map(|card| UiAction::Preview(CardPreview::from(card)));
        }
        None
    }

    fn click_at(
        &mut self,
        column: u16,
        row: u16,
        main_grid: &SlotGrid,
        extra_grid: &SlotGrid,
        search: &SearchState,
    ) -> Option<UiAction> {
        if in_rect(self.clear_deck_rect, column, row) {
            return Some(UiAction::ClearDeck);
        }

        // Clicking an occupied deck slot removes that card
        if let Some(index) =
            DeckGridWidget::slot_at(self.main_area, main_grid.capacity(), column, row)
        {
            self.focus = Focus::MainGrid;
            self.main_cursor = index;
            return main_grid
                .slot(index)
                .map(|content| UiAction::RemoveCard(content.card_id));
        }
        if let Some(index) =
            DeckGridWidget::slot_at(self.extra_area, extra_grid.capacity(), column, row)
        {
            self.focus = Focus::ExtraGrid;
            self.extra_cursor = index;
            return extra_grid
                .slot(index)
                .map(|content| UiAction::RemoveCard(content.card_id));
        }

        match SearchPanelWidget::hit(self.search_area, column, row)? {
            SearchPanelHit::Field(index) => {
                self.focus = Focus::SearchForm;
                self.form.field_cursor = index;
                None
            }
            SearchPanelHit::SearchButton => {
                self.focus = Focus::SearchForm;
                Some(UiAction::SubmitSearch)
            }
            SearchPanelHit::ClearButton => Some(UiAction::ClearFilters),
            SearchPanelHit::PrevButton => search.can_page_back().then_some(UiAction::PageBack),
            SearchPanelHit::NextButton => {
                search.can_page_forward().then_some(UiAction::PageForward)
            }
            SearchPanelHit::Result(visible, zone) => {
                let index = self.result_scroll + visible;
                let card = search.results.get(index)?;
                self.focus = Focus::SearchResults;
                self.result_cursor = index;
                match zone {
                    ResultZone::Remove => Some(UiAction::RemoveCard(card.id)),
                    ResultZone::Add | ResultZone::Body => Some(UiAction::AddCard(card.id)),
                }
            }
        }
    }

    pub fn tick(&mut self, search: &SearchState) {
        // Clamp the result cursor to the current result set
        if search.results.is_empty() {
            self.result_cursor = 0;
            self.result_scroll = 0;
        } else if self.result_cursor >= search.results.len() {
            self.result_cursor = search.results.len() - 1;
        }
    }
}

fn in_rect(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

fn render_rename_prompt(frame: &mut Frame, area: Rect, buffer: &str) {
    let popup_area = centered_rect(40, 20, area);
    if popup_area.width < 10 || popup_area.height < 4 {
        return;
    }
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Theme::GOLD))
        .title(Line::from(Span::styled(
            " Rename Deck ",
            Style::default().fg(Theme::GOLD).add_modifier(Modifier::BOLD),
        )))
        .title_alignment(Alignment::Center);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let input_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{}_", buffer),
            Style::default().fg(Theme::BRIGHT_TEXT),
        )),
        input_area,
    );

    if inner.height > 2 {
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "[Enter] Save  [Esc] Cancel",
                Style::default().fg(Theme::DIM_TEXT),
            ))
            .alignment(Alignment::Center),
            hint_area,
        );
    }
}
