use dioxus::prelude::*;
use services::{LoadPhase, QuestionSet};
use stepform_core::Generation;
use stepform_core::model::{QuestionWithOptions, StepCode};

use crate::context::AppContext;

/// Reactive view of the active step's question set.
#[derive(Clone, Copy)]
pub struct QuestionsHandle {
    state: Signal<QuestionSet>,
    refetch: Callback<()>,
}

impl QuestionsHandle {
    #[must_use]
    pub fn questions(&self) -> Vec<QuestionWithOptions> {
        self.state.read().questions().to_vec()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.read().is_loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error().map(str::to_string)
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.state.read().phase().clone()
    }

    #[must_use]
    pub fn step(&self) -> Option<StepCode> {
        self.state.read().step().cloned()
    }

    /// Reload the active step; no-op when no step is active.
    pub fn refetch(&self) {
        self.refetch.call(());
    }
}

/// Load the questions of `step_code` whenever it changes.
///
/// A `None` step clears the set. Each fetch runs under a fresh generation, so a
/// slow response for a step the user already left is dropped.
pub fn use_questions_by_step(step_code: Signal<Option<StepCode>>) -> QuestionsHandle {
    let ctx = use_context::<AppContext>();
    let service = ctx.question_service();
    let state = use_signal(QuestionSet::new);

    let load = use_callback(move |(step, generation): (StepCode, Generation)| {
        let service = service.clone();
        let mut state = state;
        spawn(async move {
            let result = service
                .questions_for_step(&step)
                .await
                .map_err(|err| err.to_string());
            if let Err(message) = &result {
                tracing::warn!(%step, error = %message, "failed to load step questions");
            }
            if !state.write().finish(generation, result) {
                tracing::debug!(
                    %step,
                    generation = generation.value(),
                    "dropped stale question set"
                );
            }
        });
    });

    use_effect(move || {
        let mut state = state;
        match step_code() {
            Some(step) => {
                let generation = state.write().begin(step.clone());
                load.call((step, generation));
            }
            None => state.write().clear(),
        }
    });

    let refetch = use_callback(move |()| {
        let mut state = state;
        let restarted = state.write().restart();
        if let Some(pending) = restarted {
            load.call(pending);
        }
    });

    QuestionsHandle { state, refetch }
}
