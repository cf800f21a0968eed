//! Complexity classification and model selection.

pub mod complexity;
pub mod selector;
pub mod signals;

pub use complexity::{classify_complexity, ComplexityInput};
pub use selector::{select_model, ModelSelection};
pub use signals::extract_signals;
