//! Single cards of a card grid.

use crate::theme::SynthBruteTheme;
use crate::traits::Widget;
use crate::cards::CardModel;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Marker drawn in the title of a skeleton card.
pub const SKELETON_TITLE: &str = " loading ";

pub struct CardWidget<'a> {
    pub card: &'a CardModel,
    pub selected: bool,
    pub theme: &'a SynthBruteTheme,
}

impl Widget for CardWidget<'_> {
    fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let (border, title_style) = if self.selected {
            (
                Style::default().fg(self.theme.border_focus),
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                Style::default().fg(self.theme.border),
                Style::default().fg(self.theme.text),
            )
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::styled(self.card.title.as_str(), title_style));
        let body = Paragraph::new(self.card.description.as_str())
            .style(Style::default().fg(self.theme.text_dim))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(body, area);
    }
}

pub struct SkeletonCard<'a> {
    pub theme: &'a SynthBruteTheme,
}

impl Widget for SkeletonCard<'_> {
    fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let filler = "░".repeat(usize::from(area.width.saturating_sub(4)));
        let lines = vec![Line::raw(filler.clone()), Line::raw(filler)];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.text_muted))
            .title(SKELETON_TITLE);
        let body = Paragraph::new(lines)
            .style(Style::default().fg(self.theme.text_muted))
            .block(block);
        f.render_widget(body, area);
    }
}
