#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError(String);

impl ViewError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        if self.0.trim().is_empty() {
            "Something went wrong. Please try again."
        } else {
            &self.0
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}

/// Collapse a hook's `loading`/`error` flags and its data into one state.
/// Loading wins over a stale error.
#[must_use]
pub fn view_state_from_flags<T>(loading: bool, error: Option<String>, data: T) -> ViewState<T> {
    if loading {
        ViewState::Loading
    } else if let Some(message) = error {
        ViewState::Error(ViewError::new(message))
    } else {
        ViewState::Ready(data)
    }
}
