//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use portal_core::{QueryUpdate, RemoteResult};
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// Cache change for one of the workflow's keys.
    Query(QueryUpdate),
    /// Outcome of the PUT started by a submit.
    SubmitFinished(RemoteResult<Value>),
}
