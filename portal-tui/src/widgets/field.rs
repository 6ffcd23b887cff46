//! One input of the links form.

use crate::theme::SynthBruteTheme;
use crate::traits::Widget;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct FormField<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub error: Option<&'a str>,
    pub focused: bool,
    /// Show a cursor after the value.
    pub editing: bool,
    pub theme: &'a SynthBruteTheme,
}

impl Widget for FormField<'_> {
    fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let border = match (self.error, self.focused) {
            (Some(_), _) => self.theme.error,
            (None, true) => self.theme.border_focus,
            (None, false) => self.theme.border,
        };

        let mut spans = if self.value.is_empty() && !(self.focused && self.editing) {
            vec![Span::styled(
                self.placeholder,
                Style::default().fg(self.theme.text_muted),
            )]
        } else {
            vec![Span::styled(self.value, Style::default().fg(self.theme.text))]
        };
        if self.focused && self.editing {
            spans.push(Span::styled("_", Style::default().fg(self.theme.primary)));
        }

        let mut lines = vec![Line::from(spans)];
        if let Some(error) = self.error {
            lines.push(Line::styled(error, Style::default().fg(self.theme.error)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(self.label);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
