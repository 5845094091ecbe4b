use std::collections::BTreeMap;

use dioxus::prelude::*;
use services::{AnswerBook, SyncStatus};
use stepform_core::model::{AnswerUpsert, Answers, CalculationId, EmissionFactorId, QuestionId};

use crate::context::AppContext;

type AnswerEdit = (QuestionId, String, Option<EmissionFactorId>);

/// Reactive view of a calculation's answers.
#[derive(Clone, Copy)]
pub struct AnswersHandle {
    book: Signal<AnswerBook>,
    save: Callback<AnswerEdit>,
    refetch: Callback<()>,
}

impl AnswersHandle {
    #[must_use]
    pub fn answers(&self) -> Answers {
        self.book.read().answers().clone()
    }

    /// The recorded value, `""` when unanswered.
    #[must_use]
    pub fn get_answer(&self, question_id: QuestionId) -> String {
        self.book.read().value(question_id).to_string()
    }

    /// Record `value` locally and persist it in the background.
    ///
    /// Does nothing while no calculation is selected.
    pub fn set_answer(
        &self,
        question_id: QuestionId,
        value: impl Into<String>,
        emission_factor_id: Option<EmissionFactorId>,
    ) {
        self.save.call((question_id, value.into(), emission_factor_id));
    }

    #[must_use]
    pub fn status(&self, question_id: QuestionId) -> Option<SyncStatus> {
        self.book.read().status(question_id).cloned()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.book.read().error().map(str::to_string)
    }

    #[must_use]
    pub fn error_for(&self, question_id: QuestionId) -> Option<String> {
        self.book.read().error_for(question_id).map(str::to_string)
    }

    /// Save failures keyed by question, for rendering beside each control.
    #[must_use]
    pub fn errors(&self) -> BTreeMap<QuestionId, String> {
        self.book
            .read()
            .failures()
            .map(|(id, message)| (id, message.to_string()))
            .collect()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.book.read().is_loading()
    }

    pub fn refetch(&self) {
        self.refetch.call(());
    }
}

/// Mirror the answers of `calculation` locally and persist edits.
///
/// Switching calculations drops local state before the new load starts.
pub fn use_calculation_answers(calculation: Signal<Option<CalculationId>>) -> AnswersHandle {
    let ctx = use_context::<AppContext>();
    let book = use_signal(AnswerBook::new);

    let load = {
        let service = ctx.answer_service();
        use_callback(move |calculation_id: CalculationId| {
            let mut book = book;
            let generation = book.write().begin_load();
            let service = service.clone();
            spawn(async move {
                let result = service
                    .load(calculation_id)
                    .await
                    .map_err(|err| err.to_string());
                if let Err(message) = &result {
                    tracing::warn!(%calculation_id, error = %message, "failed to load answers");
                }
                if !book.write().finish_load(generation, result) {
                    tracing::debug!(%calculation_id, "dropped stale answers");
                }
            });
        })
    };

    use_effect(move || {
        let mut book = book;
        let selected = calculation();
        book.write().reset();
        if let Some(calculation_id) = selected {
            load.call(calculation_id);
        }
    });

    let save = {
        let service = ctx.answer_service();
        use_callback(move |(question_id, value, emission_factor_id): AnswerEdit| {
            let Some(calculation_id) = *calculation.peek() else {
                return;
            };
            let mut book = book;
            let revision = book.write().apply_local(question_id, value.clone());
            let upsert = AnswerUpsert::new(calculation_id, question_id, value)
                .with_emission_factor(emission_factor_id);
            let service = service.clone();
            spawn(async move {
                let result = service.save(&upsert).await.map_err(|err| {
                    tracing::warn!(
                        %calculation_id,
                        %question_id,
                        error = %err,
                        "failed to save answer"
                    );
                    err.to_string()
                });
                if !book.write().settle(question_id, revision, result) {
                    tracing::debug!(%question_id, "superseded save completed");
                }
            });
        })
    };

    let refetch = use_callback(move |()| {
        if let Some(calculation_id) = *calculation.peek() {
            load.call(calculation_id);
        }
    });

    AnswersHandle {
        book,
        save,
        refetch,
    }
}
