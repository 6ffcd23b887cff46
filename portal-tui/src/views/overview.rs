//! Overview tab: the profile itself.

use super::helpers::or_dash;
use crate::state::App;
use crate::traits::Widget;
use crate::widgets::DetailPanel;
use portal_core::ResourceState;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let profile = match app.workflow.profile() {
        ResourceState::Ready(profile) => profile,
        ResourceState::Loading => {
            let paragraph = Paragraph::new("Loading profile...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.text_dim))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, area);
            return;
        }
        ResourceState::Failed(message) => {
            let paragraph = Paragraph::new(format!("Profile unavailable: {}", message))
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.error))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, area);
            return;
        }
    };

    let fields = vec![
        ("Name", or_dash(Some(profile.name.as_str()))),
        ("Designation", or_dash(Some(profile.designation.as_str()))),
        ("Department", or_dash(profile.department.as_deref())),
        ("Email", or_dash(profile.email.as_deref())),
        ("Phone", or_dash(profile.phone.as_deref())),
        ("About", or_dash(Some(profile.description.as_str()))),
        ("Education", or_dash(Some(profile.education.join("; ").as_str()))),
    ];
    let panel = DetailPanel {
        title: "Profile",
        fields,
        style: Style::default().fg(app.theme.secondary),
        overlay: false,
    };
    panel.render(f, area);
}
