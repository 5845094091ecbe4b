use stepform_core::model::{QuestionWithOptions, StepCode};
use stepform_core::{Generation, GenerationCounter};

/// Where a step's question set is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Question set of the active step.
///
/// `Idle → Loading → {Ready, Error}`; activating another step (or refetching)
/// goes back to `Loading` under a new generation, and results of older
/// generations are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionSet {
    step: Option<StepCode>,
    phase: LoadPhase,
    questions: Vec<QuestionWithOptions>,
    generations: GenerationCounter,
}

impl QuestionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `step` and start loading it.
    pub fn begin(&mut self, step: StepCode) -> Generation {
        self.step = Some(step);
        self.phase = LoadPhase::Loading;
        self.generations.advance()
    }

    /// Reload the active step, if any.
    pub fn restart(&mut self) -> Option<(StepCode, Generation)> {
        let step = self.step.clone()?;
        let generation = self.begin(step.clone());
        Some((step, generation))
    }

    /// Apply a settled fetch. Returns `false` when the result is stale and was dropped.
    pub fn finish(
        &mut self,
        generation: Generation,
        result: Result<Vec<QuestionWithOptions>, String>,
    ) -> bool {
        if !self.generations.is_current(generation) {
            return false;
        }
        match result {
            Ok(questions) => {
                self.questions = questions;
                self.phase = LoadPhase::Ready;
            }
            Err(message) => {
                self.questions.clear();
                self.phase = LoadPhase::Error(message);
            }
        }
        true
    }

    /// No active step: drop the questions and supersede in-flight fetches.
    pub fn clear(&mut self) {
        self.step = None;
        self.phase = LoadPhase::Idle;
        self.questions.clear();
        self.generations.advance();
    }

    #[must_use]
    pub fn step(&self) -> Option<&StepCode> {
        self.step.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionWithOptions] {
        &self.questions
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Error(message) => Some(message),
            _ => None,
        }
    }
}
