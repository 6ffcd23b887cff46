//! Links tab: the social/academic profile form.

use crate::keys::InputMode;
use crate::state::App;
use crate::traits::Widget;
use crate::widgets::FormField;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FIELD_HEIGHT: u16 = 4;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let form = app.workflow.form();
    let fields = &form.schema().fields;
    let editing = app.mode == InputMode::Edit;

    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, spec) in fields.iter().enumerate() {
        let field = FormField {
            label: spec.label,
            value: form.value(spec.name),
            placeholder: spec.placeholder,
            error: form.error(spec.name),
            focused: index == form.focused_index(),
            editing,
            theme: &app.theme,
        };
        field.render(f, rows[index]);
    }

    let hint = if form.is_submitting {
        "Saving..."
    } else if editing {
        "Enter/Ctrl-s save • Tab next field • Esc cancel"
    } else {
        "e edit links"
    };
    let footer = Paragraph::new(hint)
        .style(Style::default().fg(app.theme.text_dim))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, rows[fields.len()]);
}
