use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use deckforge_core::search::{SearchFilters, SearchState, FIELD_COUNT, FIELD_LABELS};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use crate::theme::Theme;

const LABEL_WIDTH: u16 = 10;
const SEARCH_BUTTON: &str = "[ Search ]";
const CLEAR_BUTTON: &str = "[ Clear Filters ]";
const PREV_BUTTON: &str = "[ < Prev ]";
const NEXT_BUTTON: &str = "[ Next > ]";

// Rows inside the panel border: the filter fields, a gap, the buttons, the
// results header, then the result list down to the pagination row.
const BUTTONS_ROW: u16 = FIELD_COUNT as u16 + 1;
const RESULTS_HEADER_ROW: u16 = BUTTONS_ROW + 1;
const RESULTS_TOP: u16 = RESULTS_HEADER_ROW + 1;

/// Interactive regions of the search panel, for mouse routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPanelHit {
    Field(usize),
    SearchButton,
    ClearButton,
    /// Visible result row plus which part of it was hit.
    Result(usize, ResultZone),
    PrevButton,
    NextButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultZone {
    Add,
    Remove,
    Body,
}

/// Cursor state for the search form; embedded by the owning screen.
/// Typing edits the selected field directly.
#[derive(Debug, Default)]
pub struct SearchFormState {
    pub field_cursor: usize,
}

/// Form-level actions handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Submit,
    Clear,
}

impl SearchFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a key press into the form.
    pub fn handle_key(&mut self, key: KeyEvent, filters: &mut SearchFilters) -> Option<FormAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('l') => Some(FormAction::Clear),
                KeyCode::Char('u') => {
                    filters.field_mut(self.field_cursor).clear();
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Up => {
                self.field_cursor = self
                    .field_cursor
                    .checked_sub(1)
                    .unwrap_or(FIELD_COUNT - 1);
                None
            }
            KeyCode::Down => {
                self.field_cursor = (self.field_cursor + 1) % FIELD_COUNT;
                None
            }
            KeyCode::Backspace => {
                filters.field_mut(self.field_cursor).pop();
                None
            }
            KeyCode::Enter => Some(FormAction::Submit),
            KeyCode::Char(c) => {
                filters.field_mut(self.field_cursor).push(c);
                None
            }
            _ => None,
        }
    }
}

/// Right-hand panel: filter form, result tiles with add/remove affordances,
/// and the pagination controls.
pub struct SearchPanelWidget<'a> {
    pub state: &'a SearchState,
    pub form_focused: bool,
    pub results_focused: bool,
    pub field_cursor: usize,
    pub result_cursor: usize,
    pub scroll: usize,
}

impl<'a> SearchPanelWidget<'a> {
    pub fn new(state: &'a SearchState) -> Self {
        Self {
            state,
            form_focused: false,
            results_focused: false,
            field_cursor: 0,
            result_cursor: 0,
            scroll: 0,
        }
    }

    pub fn form_focused(mut self, focused: bool) -> Self {
        self.form_focused = focused;
        self
    }

    pub fn results_focused(mut self, focused: bool) -> Self {
        self.results_focused = focused;
        self
    }

    pub fn field_cursor(mut self, cursor: usize) -> Self {
        self.field_cursor = cursor;
        self
    }

    pub fn result_cursor(mut self, cursor: usize) -> Self {
        self.result_cursor = cursor;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn inner(area: Rect) -> Rect {
        Rect::new(
            area.x + 1,
            area.y + 1,
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        )
    }

    pub fn field_rect(area: Rect, index: usize) -> Option<Rect> {
        let inner = Self::inner(area);
        let y = inner.y + index as u16;
        if index >= FIELD_COUNT || y >= inner.bottom() {
            return None;
        }
        Some(Rect::new(inner.x, y, inner.width, 1))
    }

    pub fn search_button_rect(area: Rect) -> Option<Rect> {
        Self::button_rect(area, BUTTONS_ROW, 0, SEARCH_BUTTON.len() as u16)
    }

    pub fn clear_button_rect(area: Rect) -> Option<Rect> {
        Self::button_rect(area, BUTTONS_ROW, 12, CLEAR_BUTTON.len() as u16)
    }

    pub fn prev_button_rect(area: Rect) -> Option<Rect> {
        let inner = Self::inner(area);
        let row = inner.height.checked_sub(1)?;
        if row <= RESULTS_TOP {
            return None;
        }
        Self::button_rect(area, row, 0, PREV_BUTTON.len() as u16)
    }

    pub fn next_button_rect(area: Rect) -> Option<Rect> {
        let inner = Self::inner(area);
        let row = inner.height.checked_sub(1)?;
        if row <= RESULTS_TOP {
            return None;
        }
        Self::button_rect(area, row, 12, NEXT_BUTTON.len() as u16)
    }

    fn button_rect(area: Rect, row: u16, x_offset: u16, width: u16) -> Option<Rect> {
        let inner = Self::inner(area);
        let y = inner.y + row;
        if y >= inner.bottom() || x_offset + width > inner.width {
            return None;
        }
        Some(Rect::new(inner.x + x_offset, y, width, 1))
    }

    /// Number of result rows that fit between the header and the
    /// pagination row.
    pub fn visible_result_rows(area: Rect) -> usize {
        let inner = Self::inner(area);
        inner.height.saturating_sub(RESULTS_TOP + 1) as usize
    }

    /// Rect of a visible result row (0 = topmost rendered result).
    pub fn result_rect(area: Rect, row: usize) -> Option<Rect> {
        if row >= Self::visible_result_rows(area) {
            return None;
        }
        let inner = Self::inner(area);
        Some(Rect::new(
            inner.x,
            inner.y + RESULTS_TOP + row as u16,
            inner.width,
            1,
        ))
    }

    /// Interactive region under a screen position, if any.
    pub fn hit(area: Rect, column: u16, row: u16) -> Option<SearchPanelHit> {
        for index in 0..FIELD_COUNT {
            if let Some(rect) = Self::field_rect(area, index) {
                if in_rect(rect, column, row) {
                    return Some(SearchPanelHit::Field(index));
                }
            }
        }
        if Self::search_button_rect(area).is_some_and(|r| in_rect(r, column, row)) {
            return Some(SearchPanelHit::SearchButton);
        }
        if Self::clear_button_rect(area).is_some_and(|r| in_rect(r, column, row)) {
            return Some(SearchPanelHit::ClearButton);
        }
        if Self::prev_button_rect(area).is_some_and(|r| in_rect(r, column, row)) {
            return Some(SearchPanelHit::PrevButton);
        }
        if Self::next_button_rect(area).is_some_and(|r| in_rect(r, column, row)) {
            return Some(SearchPanelHit::NextButton);
        }
        for visible in 0..Self::visible_result_rows(area) {
            if let Some(rect) = Self::result_rect(area, visible) {
                if in_rect(rect, column, row) {
                    let zone = match column.saturating_sub(rect.x) {
                        0..=2 => ResultZone::Add,
                        4..=6 => ResultZone::Remove,
                        _ => ResultZone::Body,
                    };
                    return Some(SearchPanelHit::Result(visible, zone));
                }
            }
        }
        None
    }
}

fn in_rect(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

impl<'a> Widget for SearchPanelWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 24 || area.height < 6 {
            return;
        }

        let border_color = if self.form_focused || self.results_focused {
            Theme::GOLD
        } else {
            Theme::SLOT_BORDER
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(" Search ");
        block.render(area, buf);

        let inner = Self::inner(area);

        // Filter fields
        for index in 0..FIELD_COUNT {
            let Some(rect) = Self::field_rect(area, index) else {
                continue;
            };
            let selected = self.form_focused && index == self.field_cursor;
            let label_style = if selected {
                Style::default().fg(Theme::GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::MUTED_TEXT)
            };
            buf.set_string(rect.x, rect.y, FIELD_LABELS[index], label_style);

            let mut value = self.state.filters.field(index).to_string();
            if selected {
                value.push('_');
            }
            let max_len = rect.width.saturating_sub(LABEL_WIDTH) as usize;
            let shown: String = value.chars().take(max_len).collect();
            buf.set_string(
                rect.x + LABEL_WIDTH,
                rect.y,
                &shown,
                Style::default().fg(Theme::BRIGHT_TEXT),
            );
        }

        // Buttons
        if let Some(rect) = Self::search_button_rect(area) {
            buf.set_string(
                rect.x,
                rect.y,
                SEARCH_BUTTON,
                Style::default().fg(Theme::BUTTON).add_modifier(Modifier::BOLD),
            );
        }
        if let Some(rect) = Self::clear_button_rect(area) {
            buf.set_string(
                rect.x,
                rect.y,
                CLEAR_BUTTON,
                Style::default().fg(Theme::MUTED_TEXT),
            );
        }

        // Results header
        let header_y = inner.y + RESULTS_HEADER_ROW;
        if header_y < inner.bottom() {
            let header = if self.state.results.is_empty() {
                "Results".to_string()
            } else {
                format!(
                    "Results \u{00b7} page {} \u{00b7} {} shown",
                    self.state.page_number(),
                    self.state.results.len()
                )
            };
            buf.set_string(
                inner.x,
                header_y,
                &header,
                Style::default().fg(Theme::MUTED_TEXT),
            );
        }

        // Result tiles
        for visible in 0..Self::visible_result_rows(area) {
            let Some(rect) = Self::result_rect(area, visible) else {
                break;
            };
            let index = self.scroll + visible;
            let Some(card) = self.state.results.get(index) else {
                break;
            };

            buf.set_string(
                rect.x,
                rect.y,
                "[+]",
                Style::default().fg(Theme::ADD_ICON),
            );
            buf.set_string(
                rect.x + 4,
                rect.y,
                "[-]",
                Style::default().fg(Theme::REMOVE_ICON),
            );

            let is_cursor = self.results_focused && index == self.result_cursor;
            let name_style = if is_cursor {
                Style::default().fg(Theme::CURSOR).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::BRIGHT_TEXT)
            };
            let body = if card.card_type.is_empty() {
                card.name.clone()
            } else {
                format!("{} \u{00b7} {}", card.name, card.card_type)
            };
            let max_len = rect.width.saturating_sub(8) as usize;
            let shown: String = body.chars().take(max_len).collect();
            buf.set_string(rect.x + 8, rect.y, &shown, name_style);
        }

        // Pagination controls, disabled states per the cursor position
        if let Some(rect) = Self::prev_button_rect(area) {
            let style = if self.state.can_page_back() {
                Style::default().fg(Theme::BUTTON).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::BUTTON_DISABLED)
            };
            buf.set_string(rect.x, rect.y, PREV_BUTTON, style);
        }
        if let Some(rect) = Self::next_button_rect(area) {
            let style = if self.state.can_page_forward() {
                Style::default().fg(Theme::BUTTON).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::BUTTON_DISABLED)
            };
            buf.set_string(rect.x, rect.y, NEXT_BUTTON, style);
        }
    }
}
