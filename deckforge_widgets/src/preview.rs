use deckforge_core::CardPreview;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

use crate::theme::Theme;

/// Singleton preview pane mirroring the last hovered card: its stored image
/// URL and description text.
pub struct CardPreviewWidget<'a> {
    pub preview: Option<&'a CardPreview>,
}

impl<'a> CardPreviewWidget<'a> {
    pub fn new(preview: Option<&'a CardPreview>) -> Self {
        Self { preview }
    }
}

impl<'a> Widget for CardPreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < 4 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Theme::SLOT_BORDER))
            .title(" Card View ");
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(preview) = self.preview else {
            Paragraph::new(Line::from(Span::styled(
                "Hover a card to preview it",
                Style::default().fg(Theme::DIM_TEXT),
            )))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        };

        let title = preview
            .name
            .clone()
            .unwrap_or_else(|| format!("Card #{}", preview.card_id));

        let mut lines = vec![
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(Theme::BRIGHT_TEXT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("id {}", preview.card_id),
                Style::default().fg(Theme::MUTED_TEXT),
            )),
            Line::from(""),
            Line::from(Span::styled(
                preview.img_url.clone(),
                Style::default().fg(Theme::DIM_TEXT),
            )),
            Line::from(""),
        ];
        lines.push(Line::from(Span::styled(
            preview.card_desc.clone(),
            Style::default().fg(Theme::MUTED_TEXT),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
