#![forbid(unsafe_code)]

pub mod completion;
pub mod generation;
pub mod model;
pub mod visibility;

pub use completion::{can_proceed, is_answered};
pub use generation::{Generation, GenerationCounter};
pub use visibility::{VisibilityRule, VisibilityRules};
