use deckforge_core::grid::{DeckSection, SlotGrid};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::theme::Theme;

/// Slot cell size in terminal cells.
pub const SLOT_WIDTH: u16 = 4;
pub const SLOT_HEIGHT: u16 = 3;
/// Slots per grid row.
pub const SLOTS_PER_ROW: usize = 15;

/// Fixed-capacity deck grid: one bordered mini-cell per slot, filled cells
/// showing a card back in the section's color.
pub struct DeckGridWidget<'a> {
    pub grid: &'a SlotGrid,
    pub cursor: Option<usize>,
    pub focused: bool,
}

impl<'a> DeckGridWidget<'a> {
    pub fn new(grid: &'a SlotGrid) -> Self {
        Self {
            grid,
            cursor: None,
            focused: false,
        }
    }

    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Height in rows needed for a grid of the given capacity, including the
    /// section header line.
    pub fn required_height(capacity: usize) -> u16 {
        let rows = capacity.div_ceil(SLOTS_PER_ROW) as u16;
        rows * SLOT_HEIGHT + 1
    }

    /// Rect of one slot cell within the grid area. The header line occupies
    /// the first row.
    pub fn slot_rect(area: Rect, index: usize, capacity: usize) -> Option<Rect> {
        if index >= capacity {
            return None;
        }
        let col = (index % SLOTS_PER_ROW) as u16;
        let row = (index / SLOTS_PER_ROW) as u16;
        let rect = Rect::new(
            area.x + col * SLOT_WIDTH,
            area.y + 1 + row * SLOT_HEIGHT,
            SLOT_WIDTH,
            SLOT_HEIGHT,
        );
        if rect.right() > area.right() || rect.bottom() > area.bottom() {
            return None;
        }
        Some(rect)
    }

    /// Slot index under a screen position, if any.
    pub fn slot_at(area: Rect, capacity: usize, column: u16, row: u16) -> Option<usize> {
        for index in 0..capacity {
            if let Some(rect) = Self::slot_rect(area, index, capacity) {
                if column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
                {
                    return Some(index);
                }
            }
        }
        None
    }

    fn card_color(&self) -> ratatui::style::Color {
        match self.grid.section() {
            DeckSection::Main => Theme::MAIN_CARD,
            DeckSection::Extra => Theme::EXTRA_CARD,
        }
    }
}

impl<'a> Widget for DeckGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < SLOTS_PER_ROW as u16 * SLOT_WIDTH || area.height < SLOT_HEIGHT + 1 {
            return;
        }

        // Section header with the occupancy counter
        let header = format!(
            "{}  {}/{}",
            self.grid.section(),
            self.grid.occupied(),
            self.grid.capacity()
        );
        let header_color = if self.focused {
            Theme::GOLD
        } else {
            Theme::MUTED_TEXT
        };
        buf.set_string(
            area.x,
            area.y,
            &header,
            Style::default()
                .fg(header_color)
                .add_modifier(Modifier::BOLD),
        );

        for index in 0..self.grid.capacity() {
            let Some(rect) = Self::slot_rect(area, index, self.grid.capacity()) else {
                continue;
            };
            let is_cursor = self.focused && self.cursor == Some(index);
            let border_color = if is_cursor {
                Theme::CURSOR
            } else if self.grid.slot(index).is_some() {
                self.card_color()
            } else {
                Theme::SLOT_EMPTY
            };
            let border_style = Style::default().fg(border_color);

            if self.grid.slot(index).is_some() {
                render_filled_slot(rect, buf, border_style);
            } else {
                render_empty_slot(rect, buf, border_style);
            }
        }
    }
}

fn render_filled_slot(area: Rect, buf: &mut Buffer, border_style: Style) {
    let fill_style = Style::default().fg(Theme::CARD_BACK);

    buf.set_string(area.x, area.y, "\u{256d}", border_style);
    for x in 1..area.width - 1 {
        buf.set_string(area.x + x, area.y, "\u{2500}", border_style);
    }
    buf.set_string(area.x + area.width - 1, area.y, "\u{256e}", border_style);

    for y in 1..area.height - 1 {
        buf.set_string(area.x, area.y + y, "\u{2502}", border_style);
        for x in 1..area.width - 1 {
            let pattern = if (x + y) % 2 == 0 {
                "\u{2593}"
            } else {
                "\u{2591}"
            };
            buf.set_string(area.x + x, area.y + y, pattern, fill_style);
        }
        buf.set_string(area.x + area.width - 1, area.y + y, "\u{2502}", border_style);
    }

    let by = area.y + area.height - 1;
    buf.set_string(area.x, by, "\u{2570}", border_style);
    for x in 1..area.width - 1 {
        buf.set_string(area.x + x, by, "\u{2500}", border_style);
    }
    buf.set_string(area.x + area.width - 1, by, "\u{256f}", border_style);
}

fn render_empty_slot(area: Rect, buf: &mut Buffer, border_style: Style) {
    buf.set_string(area.x, area.y, "\u{256d}", border_style);
    for x in 1..area.width - 1 {
        buf.set_string(area.x + x, area.y, "\u{2500}", border_style);
    }
    buf.set_string(area.x + area.width - 1, area.y, "\u{256e}", border_style);

    for y in 1..area.height - 1 {
        buf.set_string(area.x, area.y + y, "\u{2502}", border_style);
        for x in 1..area.width - 1 {
            buf.set_string(area.x + x, area.y + y, " ", Style::default());
        }
        buf.set_string(area.x + area.width - 1, area.y + y, "\u{2502}", border_style);
    }

    let by = area.y + area.height - 1;
    buf.set_string(area.x, by, "\u{2570}", border_style);
    for x in 1..area.width - 1 {
        buf.set_string(area.x + x, by, "\u{2500}", border_style);
    }
    buf.set_string(area.x + area.width - 1, by, "\u{256f}", border_style);
}
