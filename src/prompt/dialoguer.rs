//! Terminal prompts backed by dialoguer

use dialoguer::{Confirm, Input, Select};

use super::interface::{
    ChoiceInput, ChoiceRequest, ConfirmInput, ConfirmRequest, TextInput, TextRequest,
};
use crate::error::Result;

#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl TextInput for DialoguerPrompter {
    fn ask_text(&self, request: &TextRequest) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(&request.prompt)
            .default(request.default.clone())
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

impl ChoiceInput for DialoguerPrompter {
    fn ask_choice(&self, request: &ChoiceRequest) -> Result<usize> {
        let select = Select::new()
            .with_prompt(&request.prompt)
            .items(&request.choices)
            .default(request.default_index.unwrap_or(0));
        Ok(select.interact()?)
    }
}

impl ConfirmInput for DialoguerPrompter {
    fn ask_confirm(&self, request: &ConfirmRequest) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(&request.prompt)
            .default(request.default)
            .interact()?)
    }
}
