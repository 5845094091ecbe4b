use std::collections::BTreeMap;

use stepform_core::model::{Answers, QuestionId};
use stepform_core::{Generation, GenerationCounter};

/// Sequence number of one local edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(u64);

/// Remote state of the latest edit of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Pending,
    Committed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AnswerSync {
    revision: Revision,
    status: SyncStatus,
}

/// Local mirror of a calculation's answers with per-answer sync tracking.
///
/// Edits land locally first and are never rolled back; the remote outcome of
/// each edit is recorded against the question, and only the latest edit of a
/// question may settle its status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerBook {
    answers: Answers,
    sync: BTreeMap<QuestionId, AnswerSync>,
    // Monotonic across resets so late completions never match a newer edit.
    last_revision: u64,
    loads: GenerationCounter,
    // `last_revision` when the current load was requested.
    load_mark: u64,
    loading: bool,
    load_error: Option<String>,
}

impl AnswerBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// The recorded value, `""` when unanswered.
    #[must_use]
    pub fn value(&self, question_id: QuestionId) -> &str {
        self.answers.value(question_id)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_load(&mut self) -> Generation {
        self.loading = true;
        self.load_error = None;
        self.load_mark = self.last_revision;
        self.loads.advance()
    }

    /// Apply a settled load. Returns `false` when the result is stale and was dropped.
    ///
    /// Server values replace local ones, except answers edited after the load
    /// was requested or whose edit is still in flight: those keep their local
    /// value and sync status whatever the load returned.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<Answers, String>,
    ) -> bool {
        if !self.loads.is_current(generation) {
            return false;
        }
        self.loading = false;
        let mark = Revision(self.load_mark);
        self.sync
            .retain(|_, sync| sync.revision > mark || sync.status == SyncStatus::Pending);
        let kept: Vec<(QuestionId, String)> = self
            .sync
            .keys()
            .map(|id| (*id, self.answers.value(*id).to_string()))
            .collect();
        match result {
            Ok(loaded) => self.answers = loaded,
            Err(message) => {
                self.answers.clear();
                self.load_error = Some(message);
            }
        }
        for (id, value) in kept {
            self.answers.set(id, value);
        }
        true
    }

    /// Record an edit locally and mark it pending.
    pub fn apply_local(&mut self, question_id: QuestionId, value: impl Into<String>) -> Revision {
        self.answers.set(question_id, value);
        self.last_revision += 1;
        let revision = Revision(self.last_revision);
        self.sync.insert(
            question_id,
            AnswerSync {
                revision,
                status: SyncStatus::Pending,
            },
        );
        revision
    }

    /// Record the remote outcome of an edit. Returns `false` if a newer edit
    /// (or a reset) superseded `revision`.
    pub fn settle(
        &mut self,
        question_id: QuestionId,
        revision: Revision,
        result: Result<(), String>,
    ) -> bool {
        match self.sync.get_mut(&question_id) {
            Some(sync) if sync.revision == revision => {
                sync.status = match result {
                    Ok(()) => SyncStatus::Committed,
                    Err(message) => SyncStatus::Failed(message),
                };
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn status(&self, question_id: QuestionId) -> Option<&SyncStatus> {
        self.sync.get(&question_id).map(|sync| &sync.status)
    }

    #[must_use]
    pub fn error_for(&self, question_id: QuestionId) -> Option<&str> {
        match self.status(question_id) {
            Some(SyncStatus::Failed(message)) => Some(message),
            _ => None,
        }
    }

    /// The load error, else the message of the most recent failed edit.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        if let Some(message) = &self.load_error {
            return Some(message);
        }
        self.sync
            .values()
            .filter_map(|sync| match &sync.status {
                SyncStatus::Failed(message) => Some((sync.revision, message.as_str())),
                _ => None,
            })
            .max_by_key(|(revision, _)| *revision)
            .map(|(_, message)| message)
    }

    /// Every answer whose latest edit failed to persist, with its message.
    pub fn failures(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.sync.iter().filter_map(|(id, sync)| match &sync.status {
            SyncStatus::Failed(message) => Some((*id, message.as_str())),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.sync
            .values()
            .any(|sync| sync.status == SyncStatus::Pending)
    }

    /// Forget everything (no calculation selected) and supersede in-flight loads.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.sync.clear();
        self.loading = false;
        self.load_error = None;
        self.loads.advance();
    }
}
