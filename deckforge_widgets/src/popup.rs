use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::theme::Theme;

/// Modal notification overlay carrying a server-reported message. The app
/// swallows all other input while one is visible.
pub struct PopupWidget {
    pub title: String,
    pub message: String,
}

impl PopupWidget {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl Widget for PopupWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width * 60 / 100).clamp(24, 60).min(area.width);
        let text_width = width.saturating_sub(4).max(1);
        let text_rows = (self.message.chars().count() as u16).div_ceil(text_width) + 1;
        let height = (text_rows + 4).min(area.height);

        let popup_area = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );
        Clear.render(popup_area, buf);

        let title_line = Line::from(Span::styled(
            format!(" {} ", self.title),
            Style::default()
                .fg(Theme::ERROR)
                .add_modifier(Modifier::BOLD),
        ));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Theme::ERROR))
            .title(title_line)
            .title_alignment(Alignment::Center);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        if inner.height < 2 {
            return;
        }

        let message_area = Rect::new(
            inner.x + 1,
            inner.y + 1,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(2),
        );
        Paragraph::new(Line::from(Span::styled(
            self.message,
            Style::default().fg(Theme::BRIGHT_TEXT),
        )))
        .wrap(Wrap { trim: true })
        .render(message_area, buf);

        let hint = "[Enter] Dismiss";
        let hint_x = inner.x + inner.width.saturating_sub(hint.len() as u16) / 2;
        buf.set_string(
            hint_x,
            inner.y + inner.height - 1,
            hint,
            Style::default().fg(Theme::GOLD),
        );
    }
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
