//! Card tabs: projects, patents, courses and research interests.

use crate::cards::{CardGrid, CardKind};
use crate::state::App;
use ratatui::{layout::Rect, Frame};

pub fn render(f: &mut Frame<'_>, app: &App, kind: CardKind, area: Rect) {
    let grid = CardGrid::build(kind, &app.workflow.cards(kind));
    let selected = (!grid.is_empty()).then(|| app.selected());
    grid.render(f, area, selected, &app.theme);
}
