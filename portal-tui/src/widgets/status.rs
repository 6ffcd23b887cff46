//! Status indicator widget.

use crate::traits::Widget;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

pub struct StatusIndicator {
    pub status: String,
    pub style: Style,
}

impl Widget for StatusIndicator {
    fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(format!("[{}]", self.status))
            .style(self.style)
            .alignment(Alignment::Right);
        f.render_widget(paragraph, area);
    }
}
