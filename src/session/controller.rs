//! The submit → request → append → persist cycle.
//!
//! [`ChatController`] owns the whole application state. Front ends feed it
//! input and triggers, call [`ChatController::dispatch`] and re-render from
//! [`ChatController::state`].

use crate::error::Result;
use crate::history::{History, HistoryStore, Turn};
use crate::llm::gateway::LlmGateway;
use crate::llm::models::LlmMessage;
use crate::session::review::{sidebar, SelectedExchange, Selection, SidebarEntry};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Reply recorded whenever the completion call fails, for any reason.
pub const FALLBACK_REPLY: &str = "❌ Error from API";

/// What asked for the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The explicit ask action.
    Ask,
    /// Enter pressed in the input line.
    Enter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitted(Trigger),
}

/// Result of one call to [`ChatController::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing was submitted, or the input was blank.
    Ignored,
    /// The endpoint answered and its reply was recorded.
    Answered { exchange: Uuid },
    /// The call failed and [`FALLBACK_REPLY`] was recorded instead.
    FellBack { exchange: Uuid },
}

/// Everything a front end renders from.
#[derive(Debug, Default)]
pub struct AppState {
    pub history: History,
    pub input: String,
    pub submit: SubmitState,
    pub selection: Selection,
}

pub struct ChatController {
    gateway: Arc<dyn LlmGateway>,
    store: HistoryStore,
    model: String,
    instruction_suffix: String,
    state: AppState,
}

impl ChatController {
    /// Create a controller builder. The history is loaded from `store` on `build`.
    pub fn builder(gateway: Arc<dyn LlmGateway>, store: HistoryStore) -> ChatControllerBuilder {
        ChatControllerBuilder::new(gateway, store)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Replace the contents of the input line.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input = text.into();
    }

    /// Mark the current input as submitted. Either trigger leads to the same cycle.
    pub fn trigger(&mut self, trigger: Trigger) {
        debug!(trigger = ?trigger, "Submission triggered");
        self.state.submit = SubmitState::Submitted(trigger);
    }

    /// Set the input, trigger and dispatch in one step.
    pub async fn submit(
        &mut self,
        trigger: Trigger,
        text: impl Into<String>,
    ) -> Result<CycleOutcome> {
        self.set_input(text);
        self.trigger(trigger);
        self.dispatch().await
    }

    /// Run one cycle if a submission is pending.
    ///
    /// Blank input returns to idle with no side effects. Otherwise the user turn
    /// and a reply (or [`FALLBACK_REPLY`]) are appended, the input is cleared and
    /// the history is persisted. A persistence failure is returned as `Err`
    /// after the in-memory history has been updated.
    pub async fn dispatch(&mut self) -> Result<CycleOutcome> {
        let trigger = match std::mem::take(&mut self.state.submit) {
            SubmitState::Idle => return Ok(CycleOutcome::Ignored),
            SubmitState::Submitted(trigger) => trigger,
        };

        let prompt = self.state.input.trim().to_string();
        if prompt.is_empty() {
            debug!(trigger = ?trigger, "Ignoring blank submission");
            return Ok(CycleOutcome::Ignored);
        }

        let user_turn = Turn::user(prompt.clone());
        let exchange = user_turn.exchange();
        self.state.history.append(user_turn);

        let outcome = match self.request_completion(&prompt).await {
            Ok(reply) => {
                self.state.history.append(Turn::assistant(exchange, reply));
                CycleOutcome::Answered { exchange }
            }
            Err(e) => {
                if e.is_completion_failure() {
                    warn!(
                        model = %self.model,
                        error = %e,
                        "Completion failed, recording fallback reply"
                    );
                } else {
                    error!(
                        model = %self.model,
                        error = %e,
                        "Unexpected gateway failure, recording fallback reply"
                    );
                }
                self.state
                    .history
                    .append(Turn::assistant(exchange, FALLBACK_REPLY));
                CycleOutcome::FellBack { exchange }
            }
        };

        self.state.input.clear();
        info!(turns = self.state.history.len(), "Cycle complete");

        self.store.persist(&self.state.history)?;
        Ok(outcome)
    }

    async fn request_completion(&self, prompt: &str) -> Result<String> {
        let messages = [LlmMessage::user(build_prompt(prompt, &self.instruction_suffix))];
        self.gateway.complete(&self.model, &messages).await
    }

    /// Sidebar rows for the current history.
    pub fn sidebar(&self) -> Vec<SidebarEntry> {
        sidebar(&self.state.history)
    }

    /// Select the sidebar row with the given 1-based number.
    pub fn select_number(&mut self, number: usize) -> Result<()> {
        let entries = self.sidebar();
        self.state.selection.select_number(&entries, number)
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    /// The selected prompt and its reply, if anything is selected.
    pub fn selected(&self) -> Result<Option<SelectedExchange<'_>>> {
        self.state.selection.resolve(&self.state.history)
    }

    /// Re-read the snapshot from disk, replacing the in-memory history.
    ///
    /// The selection is kept, so it may now point past the end.
    pub fn reload(&mut self) {
        self.state.history = self.store.load();
    }
}

/// The prompt text sent for `input`: the input followed by the instruction suffix.
pub fn build_prompt(input: &str, instruction_suffix: &str) -> String {
    if instruction_suffix.is_empty() {
        input.to_string()
    } else {
        format!("{input}\n\n{instruction_suffix}")
    }
}

/// Builder for constructing a `ChatController` with custom configuration.
pub struct ChatControllerBuilder {
    gateway: Arc<dyn LlmGateway>,
    store: HistoryStore,
    model: String,
    instruction_suffix: String,
}

impl ChatControllerBuilder {
    fn new(gateway: Arc<dyn LlmGateway>, store: HistoryStore) -> Self {
        Self {
            gateway,
            store,
            model: crate::config::DEFAULT_MODEL.to_string(),
            instruction_suffix: crate::config::DEFAULT_INSTRUCTION_SUFFIX.to_string(),
        }
    }

    /// Set the model identifier (default: `meta-llama/llama-3-8b-instruct`)
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the text appended to every prompt (default: "Please reply in English only.")
    pub fn instruction_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.instruction_suffix = suffix.into();
        self
    }

    /// Load the history and build the controller
    pub fn build(self) -> ChatController {
        let history = self.store.load();

        ChatController {
            gateway: self.gateway,
            store: self.store,
            model: self.model,
            instruction_suffix: self.instruction_suffix,
            state: AppState {
                history,
                ..Default::default()
            },
        }
    }
}
