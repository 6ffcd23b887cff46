//! Application state: the workflow plus what only the terminal needs.

use crate::cards::{move_selection, CardGrid, CardKind, GRID_COLUMNS};
use crate::config::TuiConfig;
use crate::keys::{Action, InputMode};
use crate::nav::ProfileTab;
use crate::persistence::PersistedState;
use crate::theme::SynthBruteTheme;
use crate::workflow::{Phase, ProfileWorkflow, SubmitOutcome, SubmitTask};
use tracing::debug;

/// Work the event loop has to do on the app's behalf.
pub enum Command {
    Quit,
    /// Run the request and feed its result back through
    /// [`App::finish_submit`].
    Submit(SubmitTask),
    Logout,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Quit => f.write_str("Quit"),
            Command::Submit(_) => f.write_str("Submit"),
            Command::Logout => f.write_str("Logout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub workflow: ProfileWorkflow,
    pub mode: InputMode,
    pub modal: Option<Modal>,
    selections: [usize; 6],
}

impl App {
    pub fn new(config: TuiConfig, workflow: ProfileWorkflow) -> Self {
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            workflow,
            mode: InputMode::Browse,
            modal: None,
            selections: [0; 6],
        }
    }

    pub fn active_tab(&self) -> ProfileTab {
        self.workflow.active_tab()
    }

    pub fn select_tab(&mut self, tab: ProfileTab) {
        self.modal = None;
        self.workflow.select_tab(tab);
    }

    /// Grid kind shown on `tab`, if it shows one.
    pub fn card_kind(tab: ProfileTab) -> Option<CardKind> {
        match tab {
            ProfileTab::Projects => Some(CardKind::Projects),
            ProfileTab::Patents => Some(CardKind::Patents),
            ProfileTab::Research => Some(CardKind::ResearchInterests),
            ProfileTab::Courses => Some(CardKind::Courses),
            ProfileTab::Overview | ProfileTab::Links => None,
        }
    }

    pub fn current_grid(&self) -> Option<CardGrid> {
        Self::card_kind(self.active_tab())
            .map(|kind| CardGrid::build(kind, &self.workflow.cards(kind)))
    }

    /// Selected card on the active tab, clamped to what is on screen.
    pub fn selected(&self) -> usize {
        let stored = self.selections[self.active_tab().index()];
        match self.current_grid() {
            Some(grid) if !grid.is_empty() => stored.min(grid.len() - 1),
            _ => 0,
        }
    }

    fn move_cards(&mut self, delta: isize) {
        if let Some(grid) = self.current_grid() {
            let index = self.active_tab().index();
            self.selections[index] = move_selection(self.selected(), grid.len(), delta);
        }
    }

    pub fn open_selected(&mut self) {
        let Some(grid) = self.current_grid() else {
            return;
        };
        if let Some(card) = grid.card(self.selected()) {
            self.modal = Some(Modal {
                title: card.title.clone(),
                message: card.description.clone(),
            });
        }
    }

    pub fn enter_edit(&mut self) {
        if matches!(self.workflow.phase(), Phase::Ready) {
            self.select_tab(ProfileTab::Links);
            self.mode = InputMode::Edit;
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Option<Command> {
        debug!(?action, mode = ?self.mode, "action");
        match action {
            Action::Quit => return Some(Command::Quit),
            Action::Logout => {
                self.workflow.logout();
                return Some(Command::Logout);
            }
            Action::NextTab => self.select_tab(self.active_tab().next()),
            Action::PrevTab => self.select_tab(self.active_tab().previous()),
            Action::SwitchTab(index) => {
                if let Some(tab) = ProfileTab::from_index(index) {
                    self.select_tab(tab);
                }
            }
            Action::MoveUp | Action::MoveDown if self.active_tab() == ProfileTab::Links => {
                if action == Action::MoveUp {
                    self.workflow.focus_previous_field();
                } else {
                    self.workflow.focus_next_field();
                }
            }
            Action::MoveUp => self.move_cards(-(GRID_COLUMNS as isize)),
            Action::MoveDown => self.move_cards(GRID_COLUMNS as isize),
            Action::MoveLeft => self.move_cards(-1),
            Action::MoveRight => self.move_cards(1),
            Action::Open => {
                if self.active_tab() == ProfileTab::Links {
                    self.enter_edit();
                } else {
                    self.open_selected();
                }
            }
            Action::Close => self.modal = None,
            Action::EditLinks => self.enter_edit(),
            Action::Refresh => {
                self.workflow.refresh();
            }
            Action::InsertChar(c) => self.workflow.type_char(c),
            Action::DeleteChar => self.workflow.delete_char(),
            Action::NextField => self.workflow.focus_next_field(),
            Action::PrevField => self.workflow.focus_previous_field(),
            Action::LeaveEdit => self.mode = InputMode::Browse,
            Action::Submit => {
                if let Ok(task) = self.workflow.prepare_submit() {
                    return Some(Command::Submit(task));
                }
            }
        }
        None
    }

    /// Apply the result of a submit started through [`Command::Submit`].
    pub fn finish_submit(
        &mut self,
        result: portal_core::RemoteResult<serde_json::Value>,
    ) -> SubmitOutcome {
        let outcome = self.workflow.complete_submit(result);
        if outcome == SubmitOutcome::Saved {
            self.mode = InputMode::Browse;
        }
        outcome
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            active_tab: self.active_tab(),
        }
    }

    pub fn restore(&mut self, state: PersistedState) {
        self.select_tab(state.active_tab);
    }
}
