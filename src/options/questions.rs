//! The scaffold question table

use crate::constants::questions::*;
use crate::options::types::{CssPreprocessor, TemplateEngine};

/// Shape of the answer a question expects
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Free text; `required` text may not be blank.
    Text { default: &'static str, required: bool },
    /// One value out of a declared choice set.
    SingleChoice { choices: Vec<&'static str>, default: &'static str },
    /// Yes/no question.
    Confirm { default: bool },
}

/// A single setup question
#[derive(Debug, Clone)]
pub struct Question {
    pub key: &'static str,
    pub help: &'static str,
    pub kind: QuestionKind,
}

impl Question {
    /// Default answer as JSON, used when the question is skipped.
    pub fn default_value(&self) -> serde_json::Value {
        match &self.kind {
            QuestionKind::Text { default, .. } => serde_json::Value::from(*default),
            QuestionKind::SingleChoice { default, .. } => serde_json::Value::from(*default),
            QuestionKind::Confirm { default } => serde_json::Value::Bool(*default),
        }
    }
}

/// Returns the questions in the order they are asked.
pub fn questions() -> Vec<Question> {
    vec![
        Question {
            key: PROJECT_NAME,
            help: "What is your project's name?",
            kind: QuestionKind::Text { default: DEFAULT_PROJECT_NAME, required: true },
        },
        Question {
            key: DESCRIPTION,
            help: "What is your project's description?",
            kind: QuestionKind::Text { default: DEFAULT_DESCRIPTION, required: false },
        },
        Question {
            key: TEMPLATE_ENGINE,
            help: "Which template engine would you use?",
            kind: QuestionKind::SingleChoice {
                choices: TemplateEngine::ALL.iter().map(|e| e.as_str()).collect(),
                default: TemplateEngine::default().as_str(),
            },
        },
        Question {
            key: CSS_PREPROCESSOR,
            help: "Which CSS preprocessor would you use?",
            kind: QuestionKind::SingleChoice {
                choices: CssPreprocessor::ALL.iter().map(|p| p.as_str()).collect(),
                default: CssPreprocessor::default().as_str(),
            },
        },
        Question {
            key: HELPER_LIBS,
            help: "Would you install modernizr and normalize libraries?",
            kind: QuestionKind::Confirm { default: DEFAULT_HELPER_LIBS },
        },
        Question {
            key: TRANSPILER,
            help: "Would you transpile scripts with babel?",
            kind: QuestionKind::Confirm { default: DEFAULT_TRANSPILER },
        },
        Question {
            key: REV,
            help: "Would you add content hashes to built asset names?",
            kind: QuestionKind::Confirm { default: DEFAULT_REV },
        },
    ]
}
