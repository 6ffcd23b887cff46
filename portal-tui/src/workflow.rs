//! Profile workflow: fetch, edit, submit, invalidate, refetch.
//!
//! [`ProfileWorkflow`] owns everything the dashboard knows about the
//! logged-in faculty member. It reads the profile and both lists through the
//! shared [`QueryCache`], routes cache notifications to per-resource state,
//! and runs the links form through validation and a single PUT.
//!
//! ```text
//! Loading --profile resolved--> Ready --valid submit--> Submitting
//!                                 ^                         |
//!                                 +----- success/failure ---+
//! any --logout--> Detached
//! ```

use crate::cards::{CardKind, CardModel};
use crate::nav::ProfileTab;
use crate::notifications::Notification;
use futures_util::future::FutureExt;
use portal_core::backend::paths;
use portal_core::{
    social_profile_schema, EditProfileData, FieldErrors, FormState, Loader, PatentRecord,
    ProfileBackend, ProfileRecord, ProjectRecord, QueryCache, QueryKey, QueryUpdate, RemoteError,
    RemoteResult, ResourceState, SocialProfileUpdate, Subscription,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const SUCCESS_MESSAGE: &str = "Social/academic profile updated successfully";
pub const FAILURE_MESSAGE: &str = "Failed to update profile. Please try again.";

pub fn profile_key() -> QueryKey {
    QueryKey::from(["user-profile"])
}

pub fn projects_key() -> QueryKey {
    QueryKey::from(["projects"])
}

pub fn patents_key() -> QueryKey {
    QueryKey::from(["patents"])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitting,
    /// Logged out. Nothing is applied any more.
    Detached,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Loading => "Loading",
            Phase::Ready => "Ready",
            Phase::Submitting => "Saving",
            Phase::Detached => "Logged out",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Not accepting a submit right now.
    Busy,
    /// Rejected locally; nothing was sent.
    Invalid(FieldErrors),
    Saved,
    Failed(RemoteError),
}

/// The network half of a submit. Runs without borrowing the workflow so the
/// UI keeps drawing while it is in flight.
pub struct SubmitTask {
    cache: QueryCache,
    backend: Arc<dyn ProfileBackend>,
    update: SocialProfileUpdate,
}

impl SubmitTask {
    /// Send the update under the profile's mutation lock and invalidate the
    /// profile if the server accepted it.
    pub async fn run(self) -> RemoteResult<Value> {
        let key = profile_key();
        let _guard = self.cache.lock_mutation(&key).await;
        let body = serde_json::to_value(EditProfileData::from(self.update))?;
        info!("submitting social profile update");
        let response = self.backend.put_json(paths::PROFILE_EDIT, &body).await?;
        let refreshed = self.cache.invalidate(&key);
        info!(refreshed, "profile invalidated after update");
        Ok(response)
    }
}

pub struct ProfileWorkflow {
    cache: QueryCache,
    backend: Arc<dyn ProfileBackend>,
    phase: Phase,
    active_tab: ProfileTab,
    profile: ResourceState<ProfileRecord>,
    projects: ResourceState<Vec<ProjectRecord>>,
    patents: ResourceState<Vec<PatentRecord>>,
    form: FormState,
    notifications: Vec<Notification>,
    subscriptions: Vec<Subscription>,
    updates: Option<mpsc::UnboundedReceiver<QueryUpdate>>,
    /// A new profile arrived while submitting; the form still shows the old
    /// defaults.
    stale_form: bool,
}

impl ProfileWorkflow {
    pub fn new(cache: QueryCache, backend: Arc<dyn ProfileBackend>) -> Self {
        Self {
            cache,
            backend,
            phase: Phase::Loading,
            active_tab: ProfileTab::default(),
            profile: ResourceState::Loading,
            projects: ResourceState::Loading,
            patents: ResourceState::Loading,
            form: FormState::new(social_profile_schema()),
            notifications: Vec::new(),
            subscriptions: Vec::new(),
            updates: None,
            stale_form: false,
        }
    }

    /// Subscribe to the three resources and start loading them.
    ///
    /// The fetches run as independent tasks; results arrive through
    /// [`next_update`](Self::next_update). Must be called inside a tokio
    /// runtime.
    pub fn mount(&mut self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.phase = Phase::Loading;
        self.subscriptions.clear();

        for (key, path) in [
            (profile_key(), paths::PROFILE),
            (projects_key(), paths::PROJECTS),
            (patents_key(), paths::PATENTS),
        ] {
            self.subscriptions
                .push(self.cache.subscribe(&key, sender.clone()));
            let cache = self.cache.clone();
            let loader = self.loader(path);
            tokio::spawn(async move {
                cache.fetch_with(&key, loader).await;
            });
        }
        self.updates = Some(receiver);
        debug!("profile workflow mounted");
    }

    fn loader(&self, path: &'static str) -> Loader {
        let backend = Arc::clone(&self.backend);
        Arc::new(move || {
            let backend = Arc::clone(&backend);
            async move { backend.get_json(path).await }.boxed()
        })
    }

    /// Next cache notification, or `None` once detached.
    pub async fn next_update(&mut self) -> Option<QueryUpdate> {
        match self.updates.as_mut() {
            Some(updates) => updates.recv().await,
            None => None,
        }
    }

    /// Route a cache notification to the resource it belongs to.
    pub fn apply_update(&mut self, update: QueryUpdate) {
        if self.phase == Phase::Detached {
            debug!(key = %update.key, "update after logout ignored");
            return;
        }
        let QueryUpdate { key, snapshot } = update;
        if key == profile_key() {
            self.apply_profile(ResourceState::from_snapshot(&snapshot));
        } else if key == projects_key() {
            self.projects = ResourceState::from_snapshot(&snapshot);
        } else if key == patents_key() {
            self.patents = ResourceState::from_snapshot(&snapshot);
        } else {
            debug!(%key, "update for unknown key ignored");
        }
    }

    fn apply_profile(&mut self, state: ResourceState<ProfileRecord>) {
        match &state {
            ResourceState::Ready(profile) => {
                let changed = self.profile.ready() != Some(profile);
                if changed && self.phase == Phase::Submitting {
                    self.stale_form = true;
                } else if changed {
                    self.form.reset(profile.social_defaults());
                }
            }
            ResourceState::Failed(message) => {
                if !matches!(self.profile, ResourceState::Failed(_)) {
                    warn!(%message, "profile fetch failed");
                    self.notify(Notification::error(
                        "Profile unavailable",
                        format!("Could not load your profile: {}", message),
                    ));
                }
            }
            ResourceState::Loading => {}
        }
        if self.phase == Phase::Loading && !state.is_loading() {
            self.phase = Phase::Ready;
        }
        self.profile = state;
    }

    pub fn edit_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.accepts_edits() {
            return false;
        }
        self.form.set_value(name, value)
    }

    pub fn type_char(&mut self, c: char) {
        if self.accepts_edits() {
            self.form.push_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.accepts_edits() {
            self.form.pop_char();
        }
    }

    pub fn focus_next_field(&mut self) {
        self.form.focus_next();
    }

    pub fn focus_previous_field(&mut self) {
        self.form.focus_previous();
    }

    fn accepts_edits(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Ready)
    }

    pub fn select_tab(&mut self, tab: ProfileTab) {
        self.active_tab = tab;
    }

    /// Validate the form and, if it passes, hand back the request to run.
    ///
    /// On `Err` the outcome is final and nothing was sent. On `Ok` the
    /// workflow is `Submitting` until [`complete_submit`](Self::complete_submit)
    /// receives the task's result.
    pub fn prepare_submit(&mut self) -> Result<SubmitTask, SubmitOutcome> {
        if self.phase != Phase::Ready {
            debug!(phase = ?self.phase, "submit refused");
            return Err(SubmitOutcome::Busy);
        }
        match self.form.validate() {
            Err(errors) => {
                debug!(%errors, "submit rejected by validation");
                self.form.set_errors(errors.clone());
                Err(SubmitOutcome::Invalid(errors))
            }
            Ok(valid) => {
                self.phase = Phase::Submitting;
                self.form.is_submitting = true;
                Ok(SubmitTask {
                    cache: self.cache.clone(),
                    backend: Arc::clone(&self.backend),
                    update: valid.into_social_update(),
                })
            }
        }
    }

    /// Apply the result of a [`SubmitTask`].
    pub fn complete_submit(&mut self, result: RemoteResult<Value>) -> SubmitOutcome {
        let outcome = match result {
            Ok(_) => SubmitOutcome::Saved,
            Err(err) => SubmitOutcome::Failed(err),
        };
        if self.phase == Phase::Detached {
            return outcome;
        }
        self.form.is_submitting = false;
        self.phase = Phase::Ready;
        let stale_form = std::mem::take(&mut self.stale_form);
        match &outcome {
            SubmitOutcome::Saved => {
                info!("social profile updated");
                if stale_form {
                    if let Some(profile) = self.profile.ready() {
                        self.form.reset(profile.social_defaults());
                    }
                }
                self.notify(Notification::success("Success", SUCCESS_MESSAGE));
            }
            SubmitOutcome::Failed(err) => {
                warn!(error = %err, "social profile update failed");
                self.notify(Notification::error("Error", FAILURE_MESSAGE));
            }
            _ => {}
        }
        outcome
    }

    /// Validate, send and settle in one go.
    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.prepare_submit() {
            Ok(task) => {
                let result = task.run().await;
                self.complete_submit(result)
            }
            Err(outcome) => outcome,
        }
    }

    /// Invalidate every cached resource. Returns how many subscribers reload.
    pub fn refresh(&mut self) -> usize {
        if self.phase == Phase::Detached {
            return 0;
        }
        let refreshed = self.cache.invalidate_all();
        info!(refreshed, "manual refresh");
        refreshed
    }

    /// Stop listening for updates and drop the session's cached data. Terminal.
    pub fn logout(&mut self) {
        self.subscriptions.clear();
        self.updates = None;
        self.cache.clear();
        self.phase = Phase::Detached;
        self.form.is_submitting = false;
        self.stale_form = false;
        info!("logged out");
    }

    pub fn notify(&mut self, notification: Notification) {
        debug!(level = notification.level.label(), title = %notification.title, "notification");
        self.notifications.push(notification);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_tab(&self) -> ProfileTab {
        self.active_tab
    }

    pub fn profile(&self) -> &ResourceState<ProfileRecord> {
        &self.profile
    }

    pub fn projects(&self) -> &ResourceState<Vec<ProjectRecord>> {
        &self.projects
    }

    pub fn patents(&self) -> &ResourceState<Vec<PatentRecord>> {
        &self.patents
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Card models for one grid, each from its own resource.
    pub fn cards(&self, kind: CardKind) -> ResourceState<Vec<CardModel>> {
        match kind {
            CardKind::Projects => self
                .projects
                .map(|projects| projects.iter().map(CardModel::from).collect()),
            CardKind::Patents => self
                .patents
                .map(|patents| patents.iter().map(CardModel::from).collect()),
            CardKind::Courses => self.profile.map(|profile| {
                profile
                    .courses
                    .iter()
                    .map(String::as_str)
                    .map(CardModel::named)
                    .collect()
            }),
            CardKind::ResearchInterests => self.profile.map(|profile| {
                profile
                    .research_interests
                    .iter()
                    .map(String::as_str)
                    .map(CardModel::named)
                    .collect()
            }),
        }
    }
}
