//! What lander needs from a terminal: three kinds of question.

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct TextRequest {
    pub prompt: String,
    /// Pre-filled answer, accepted with Enter.
    pub default: String,
}

#[derive(Debug, Clone)]
pub struct ChoiceRequest {
    pub prompt: String,
    pub choices: Vec<String>,
    pub default_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    pub prompt: String,
    pub default: bool,
}

pub trait TextInput {
    fn ask_text(&self, request: &TextRequest) -> Result<String>;
}

pub trait ChoiceInput {
    /// Index into `request.choices`.
    fn ask_choice(&self, request: &ChoiceRequest) -> Result<usize>;
}

pub trait ConfirmInput {
    fn ask_confirm(&self, request: &ConfirmRequest) -> Result<bool>;
}

/// Everything the answer collector asks through.
pub trait PromptProvider: TextInput + ChoiceInput + ConfirmInput {}

impl<T> PromptProvider for T where T: TextInput + ChoiceInput + ConfirmInput {}
