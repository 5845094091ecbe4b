use std::sync::Arc;

use services::{AnswerService, QuestionService};
use stepform_core::VisibilityRules;
use stepform_core::model::{CalculationId, StepCode};

pub trait UiApp: Send + Sync {
    fn question_service(&self) -> Arc<QuestionService>;
    fn answer_service(&self) -> Arc<AnswerService>;

    /// Step codes walked in order by the questionnaire.
    fn steps(&self) -> Vec<StepCode>;
    fn calculation_id(&self) -> Option<CalculationId>;

    fn visibility_rules(&self) -> VisibilityRules {
        VisibilityRules::builtin()
    }
}

#[derive(Clone)]
pub struct AppContext {
    steps: Arc<[StepCode]>,
    calculation_id: Option<CalculationId>,
    visibility_rules: Arc<VisibilityRules>,

    question_service: Arc<QuestionService>,
    answer_service: Arc<AnswerService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            steps: app.steps().into(),
            calculation_id: app.calculation_id(),
            visibility_rules: Arc::new(app.visibility_rules()),
            question_service: app.question_service(),
            answer_service: app.answer_service(),
        }
    }

    #[must_use]
    pub fn steps(&self) -> Arc<[StepCode]> {
        Arc::clone(&self.steps)
    }

    #[must_use]
    pub fn calculation_id(&self) -> Option<CalculationId> {
        self.calculation_id
    }

    #[must_use]
    pub fn visibility_rules(&self) -> Arc<VisibilityRules> {
        Arc::clone(&self.visibility_rules)
    }

    #[must_use]
    pub fn question_service(&self) -> Arc<QuestionService> {
        Arc::clone(&self.question_service)
    }

    #[must_use]
    pub fn answer_service(&self) -> Arc<AnswerService> {
        Arc::clone(&self.answer_service)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
