//! Common traits for TUI components

use crate::state::App;
use ratatui::{layout::Rect, Frame};

/// A component drawn from the full application state.
pub trait Renderable {
    fn render(&self, f: &mut Frame<'_>, app: &App, area: Rect);
}

/// A self-contained widget that needs no application state.
pub trait Widget {
    fn render(&self, f: &mut Frame<'_>, area: Rect);
}
