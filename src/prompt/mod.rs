//! Asking the setup questions.
//!
//! - `interface`: prompt traits, independent of any terminal library
//! - `dialoguer`: the terminal implementation

pub mod dialoguer;
pub mod interface;

pub use interface::*;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::options::{Question, QuestionKind};
use crate::prompt::dialoguer::DialoguerPrompter;

/// Convenience function to create the default prompt provider
pub fn get_prompt_provider() -> DialoguerPrompter {
    DialoguerPrompter::new()
}

/// Asks one question and returns the raw answer.
pub fn ask_question<P: PromptProvider + ?Sized>(provider: &P, question: &Question) -> Result<Value> {
    let prompt = question.help.to_string();
    match &question.kind {
        QuestionKind::Text { default, .. } => {
            let request = TextRequest { prompt, default: default.to_string() };
            Ok(Value::String(provider.ask_text(&request)?))
        }
        QuestionKind::SingleChoice { choices, default } => {
            let request = ChoiceRequest {
                prompt,
                choices: choices.iter().map(|choice| choice.to_string()).collect(),
                default_index: choices.iter().position(|choice| choice == default),
            };
            let index = provider.ask_choice(&request)?;
            let choice = choices.get(index).ok_or_else(|| Error::InvalidOption {
                question: question.key.to_string(),
                reason: format!("no choice at index {index}"),
            })?;
            Ok(Value::from(*choice))
        }
        QuestionKind::Confirm { default } => {
            let request = ConfirmRequest { prompt, default: *default };
            Ok(Value::Bool(provider.ask_confirm(&request)?))
        }
    }
}

/// Simple yes/no confirmation, answered with `true` when `skip` is set.
pub fn confirm(skip: bool, prompt: String) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    get_prompt_provider().ask_confirm(&ConfirmRequest { prompt, default: false })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::questions;

    /// Answers every prompt with its default, except choices, which pick the last entry.
    struct Scripted;

    impl TextInput for Scripted {
        fn ask_text(&self, request: &TextRequest) -> Result<String> {
            Ok(request.default.clone())
        }
    }

    impl ChoiceInput for Scripted {
        fn ask_choice(&self, request: &ChoiceRequest) -> Result<usize> {
            Ok(request.choices.len() - 1)
        }
    }

    impl ConfirmInput for Scripted {
        fn ask_confirm(&self, request: &ConfirmRequest) -> Result<bool> {
            Ok(!request.default)
        }
    }

    fn question(key: &str) -> Question {
        questions().into_iter().find(|q| q.key == key).unwrap()
    }

    #[test]
    fn choice_index_maps_back_to_value() {
        let answer = ask_question(&Scripted, &question("css_preprocessor")).unwrap();
        assert_eq!(answer, Value::from("stylus"));
    }

    #[test]
    fn text_and_confirm_answers_are_typed() {
        assert_eq!(ask_question(&Scripted, &question("project_name")).unwrap(), Value::from("landing"));
        assert_eq!(ask_question(&Scripted, &question("transpiler")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn skipped_confirmation_is_yes() {
        assert!(confirm(true, "Overwrite?".into()).unwrap());
    }
}
