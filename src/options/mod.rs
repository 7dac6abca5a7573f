//! Scaffold options
//!
//! This module turns raw answers into the validated [`OptionSet`] that drives
//! every downstream decision:
//! - `types`: the enumerated choices (template engine, CSS preprocessor)
//! - `questions`: the question table shown to the user, with defaults and choices
//! - `set`: the `OptionSet` itself and its normalization from raw answers

pub mod questions;
pub mod set;
pub mod types;

pub use questions::{questions, Question, QuestionKind};
pub use set::OptionSet;
pub use types::{CssPreprocessor, TemplateEngine};
