//! View rendering dispatch.

pub mod grid;
pub mod helpers;
pub mod links;
pub mod overview;

pub use helpers::centered_rect;

use crate::keys::InputMode;
use crate::nav::ProfileTab;
use crate::state::App;
use crate::theme::{notification_color, phase_color};
use crate::traits::{Renderable, Widget};
use crate::widgets::{DetailPanel, StatusIndicator};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

impl Renderable for ProfileTab {
    fn render(&self, f: &mut Frame<'_>, app: &App, area: Rect) {
        match self {
            ProfileTab::Overview => overview::render(f, app, area),
            ProfileTab::Links => links::render(f, app, area),
            tab => {
                if let Some(kind) = App::card_kind(*tab) {
                    grid::render(f, app, kind, area);
                }
            }
        }
    }
}

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    render_tabs(f, app, layout[1]);
    app.active_tab().render(f, app, layout[2]);
    render_footer(f, app, layout[3]);

    if let Some(modal) = &app.modal {
        let panel = DetailPanel {
            title: &modal.title,
            fields: vec![("Description", modal.message.clone())],
            style: Style::default().fg(app.theme.primary),
            overlay: true,
        };
        panel.render(f, centered_rect(60, 40, layout[2]));
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = match app.workflow.profile().ready() {
        Some(profile) if !profile.designation.is_empty() => {
            format!("{} | {}", profile.name, profile.designation)
        }
        Some(profile) => profile.name.clone(),
        None => "Faculty Portal".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let phase = app.workflow.phase();
    let status = StatusIndicator {
        status: phase.label().to_string(),
        style: Style::default().fg(phase_color(phase, &app.theme)),
    };
    status.render(f, inner);
}

fn render_tabs(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<String> = ProfileTab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab().index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.mode {
        InputMode::Edit => "Ctrl-s save • Tab/Shift-Tab field • Esc leave edit",
        InputMode::Browse => {
            "1-6/Tab switch • h/j/k/l move • Enter open • e edit links • Ctrl-r refresh • L logout • q quit"
        }
    };
    let (text, style) = match app.workflow.latest_notification() {
        Some(note) => (
            format!("{}: {} {}", note.level.label(), note.title, note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
