use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stepform_core::model::{
    AnswerId, AnswerUpsert, CalculationAnswer, CalculationId, IdRef, Question, QuestionId,
    QuestionOption, StepCode,
};
use thiserror::Error;

/// Errors surfaced by remote store adapters.
///
/// `Display` is the human-readable message only, so callers can show it as is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    /// No readable envelope came back (network failure, unreadable body).
    #[error("{0}")]
    Transport(String),

    /// The API answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The envelope lacked its `success` flag or its expected payload.
    #[error("{0}")]
    Malformed(String),
}

impl ApiError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(message) | Self::Rejected(message) | Self::Malformed(message) => {
                message
            }
        }
    }
}

/// Remote operations, with the message used when the API gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AllQuestions,
    QuestionsByStep,
    QuestionOptions,
    AnswersByCalculation,
    UpsertAnswer,
}

impl Endpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::AllQuestions => "questions/all",
            Self::QuestionsByStep => "questions/by-step",
            Self::QuestionOptions => "question-options/by-question",
            Self::AnswersByCalculation => "calculation-answers/by-calculation",
            Self::UpsertAnswer => "calculation-answers/upsert",
        }
    }

    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::AllQuestions | Self::QuestionsByStep => "Failed to fetch questions",
            Self::QuestionOptions => "Failed to fetch question options",
            Self::AnswersByCalculation => "Failed to load answers",
            Self::UpsertAnswer => "Failed to save answer",
        }
    }
}

/// Read access to question definitions and their options.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Every question across all steps.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, API failure, or a missing question list.
    async fn all_questions(&self) -> Result<Vec<Question>, ApiError>;

    /// Questions belonging to one step. An unknown step yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, API failure, or a missing question list.
    async fn questions_by_step(&self, step: &StepCode) -> Result<Vec<Question>, ApiError>;

    /// Options of a choice question. A missing option list reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or API failure.
    async fn question_options(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<QuestionOption>, ApiError>;
}

/// Answers recorded for a calculation.
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, API failure, or a missing answer list.
    async fn answers_by_calculation(
        &self,
        calculation_id: CalculationId,
    ) -> Result<Vec<CalculationAnswer>, ApiError>;

    /// Insert or update the answer keyed by (calculation, question).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or API failure.
    async fn upsert_answer(&self, answer: &AnswerUpsert) -> Result<(), ApiError>;
}

/// How often each remote operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub all_questions: usize,
    pub questions_by_step: usize,
    pub question_options: usize,
    pub answers_by_calculation: usize,
    pub upsert_answer: usize,
}

#[derive(Default)]
struct InMemoryState {
    questions: Vec<Question>,
    options: HashMap<QuestionId, Vec<QuestionOption>>,
    answers: BTreeMap<(CalculationId, QuestionId), CalculationAnswer>,
    next_answer_id: u64,
    step_failures: HashMap<StepCode, ApiError>,
    option_failures: HashMap<QuestionId, ApiError>,
    answer_load_failure: Option<ApiError>,
    upsert_failures: VecDeque<ApiError>,
    calls: CallCounts,
}

/// In-memory remote store for tests and demos, with scripted failures.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, InMemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    // Seeding helpers keep going on a poisoned lock; only the trait methods report it.
    fn seed(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_question(&self, question: Question) {
        self.seed().questions.push(question);
    }

    pub fn insert_options(&self, question_id: QuestionId, options: Vec<QuestionOption>) {
        self.seed().options.insert(question_id, options);
    }

    pub fn insert_answer(&self, calculation_id: CalculationId, answer: CalculationAnswer) {
        if let Some(question_id) = answer.owning_question() {
            self.seed().answers.insert((calculation_id, question_id), answer);
        }
    }

    pub fn fail_questions_for_step(&self, step: StepCode, error: ApiError) {
        self.seed().step_failures.insert(step, error);
    }

    pub fn fail_options_for(&self, question_id: QuestionId, error: ApiError) {
        self.seed().option_failures.insert(question_id, error);
    }

    pub fn fail_answer_load(&self, error: ApiError) {
        self.seed().answer_load_failure = Some(error);
    }

    /// The next upsert fails with `error`; later ones succeed again.
    pub fn fail_next_upsert(&self, error: ApiError) {
        self.seed().upsert_failures.push_back(error);
    }

    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.seed().calls
    }

    #[must_use]
    pub fn stored_answer(
        &self,
        calculation_id: CalculationId,
        question_id: QuestionId,
    ) -> Option<CalculationAnswer> {
        self.seed().answers.get(&(calculation_id, question_id)).cloned()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn all_questions(&self) -> Result<Vec<Question>, ApiError> {
        let mut guard = self.state()?;
        guard.calls.all_questions += 1;
        Ok(guard.questions.clone())
    }

    async fn questions_by_step(&self, step: &StepCode) -> Result<Vec<Question>, ApiError> {
        let mut guard = self.state()?;
        guard.calls.questions_by_step += 1;
        if let Some(error) = guard.step_failures.get(step) {
            return Err(error.clone());
        }
        Ok(guard
            .questions
            .iter()
            .filter(|question| question.step_code == step.as_str())
            .cloned()
            .collect())
    }

    async fn question_options(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<QuestionOption>, ApiError> {
        let mut guard = self.state()?;
        guard.calls.question_options += 1;
        if let Some(error) = guard.option_failures.get(&question_id) {
            return Err(error.clone());
        }
        Ok(guard.options.get(&question_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AnswerRepository for InMemoryRepository {
    async fn answers_by_calculation(
        &self,
        calculation_id: CalculationId,
    ) -> Result<Vec<CalculationAnswer>, ApiError> {
        let mut guard = self.state()?;
        guard.calls.answers_by_calculation += 1;
        if let Some(error) = &guard.answer_load_failure {
            return Err(error.clone());
        }
        Ok(guard
            .answers
            .iter()
            .filter(|((calc, _), _)| *calc == calculation_id)
            .map(|(_, answer)| answer.clone())
            .collect())
    }

    async fn upsert_answer(&self, answer: &AnswerUpsert) -> Result<(), ApiError> {
        let mut guard = self.state()?;
        guard.calls.upsert_answer += 1;
        if let Some(error) = guard.upsert_failures.pop_front() {
            return Err(error);
        }

        let key = (answer.calculation_id(), answer.question_id());
        let id = match guard.answers.get(&key).and_then(|existing| existing.id) {
            Some(id) => id,
            None => {
                guard.next_answer_id += 1;
                AnswerId::new(guard.next_answer_id)
            }
        };
        guard.answers.insert(
            key,
            CalculationAnswer {
                id: Some(id),
                calculation: Some(IdRef::new(answer.calculation_id())),
                question: Some(IdRef::new(answer.question_id())),
                question_id: None,
                value_text: Some(answer.value_text.clone()),
                emission_factor_id: answer.emission_factor_id,
            },
        );
        Ok(())
    }
}

/// Aggregates the remote repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemoryRepository::new())
    }

    /// Share one in-memory store between both repositories.
    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let answers: Arc<dyn AnswerRepository> = Arc::new(repo.clone());
        Self { questions, answers }
    }
}
