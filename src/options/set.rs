//! The validated option record and its normalization from raw answers

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::questions::*;
use crate::error::{Error, Result};
use crate::options::questions::{questions, Question, QuestionKind};
use crate::options::types::{CssPreprocessor, TemplateEngine};

/// Normalized user choices. Built once per scaffold run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    pub project_name: String,
    pub description: String,
    #[serde(default)]
    pub template_engine: TemplateEngine,
    #[serde(default)]
    pub css_preprocessor: CssPreprocessor,
    #[serde(default = "default_helper_libs")]
    pub include_helper_libs: bool,
    #[serde(default)]
    pub use_transpiler: bool,
    #[serde(default)]
    pub revision_hash_assets: bool,
}

fn default_helper_libs() -> bool {
    DEFAULT_HELPER_LIBS
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            template_engine: TemplateEngine::default(),
            css_preprocessor: CssPreprocessor::default(),
            include_helper_libs: DEFAULT_HELPER_LIBS,
            use_transpiler: DEFAULT_TRANSPILER,
            revision_hash_assets: DEFAULT_REV,
        }
    }
}

impl OptionSet {
    /// Normalizes raw answers keyed by question name.
    ///
    /// Defaults apply only to answers that are absent (or `null`); an answer
    /// that is present but falsy is kept as given. Unknown keys are ignored.
    ///
    /// # Errors
    /// * `InvalidOption` - an enumerated answer outside its choice set, a
    ///   yes/no answer that is not boolean-like, or a required text answer
    ///   that is blank after trimming
    pub fn from_answers(answers: &Map<String, Value>) -> Result<Self> {
        let mut normalized = Map::new();
        for question in questions() {
            let value = match answers.get(question.key) {
                None | Some(Value::Null) => question.default_value(),
                Some(raw) => normalize_answer(&question, raw)?,
            };
            normalized.insert(question.key.to_string(), value);
        }

        let text = |key: &str| normalized[key].as_str().unwrap_or_default().to_string();
        let flag = |key: &str| normalized[key].as_bool().unwrap_or_default();

        let template_engine = TemplateEngine::parse(&text(TEMPLATE_ENGINE))
            .ok_or_else(|| invalid(TEMPLATE_ENGINE, "unknown template engine"))?;
        let css_preprocessor = CssPreprocessor::parse(&text(CSS_PREPROCESSOR))
            .ok_or_else(|| invalid(CSS_PREPROCESSOR, "unknown css preprocessor"))?;

        let options = Self {
            project_name: text(PROJECT_NAME),
            description: text(DESCRIPTION),
            template_engine,
            css_preprocessor,
            include_helper_libs: flag(HELPER_LIBS),
            use_transpiler: flag(TRANSPILER),
            revision_hash_assets: flag(REV),
        };
        log::debug!("Normalized options: {options:?}");
        Ok(options)
    }

    /// Re-checks invariants for an option set loaded from disk.
    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(invalid(PROJECT_NAME, "must not be empty"));
        }
        Ok(())
    }

    /// Answers in raw form, suitable for the metadata file and `--answers`.
    pub fn to_answers(&self) -> Value {
        json!({
            PROJECT_NAME: self.project_name,
            DESCRIPTION: self.description,
            TEMPLATE_ENGINE: self.template_engine.as_str(),
            CSS_PREPROCESSOR: self.css_preprocessor.as_str(),
            HELPER_LIBS: self.include_helper_libs,
            TRANSPILER: self.use_transpiler,
            REV: self.revision_hash_assets,
        })
    }

    /// Rendering context for the boilerplate templates.
    pub fn to_context(&self) -> Value {
        json!({
            "name": self.project_name,
            "description": self.description,
            "template_engine": self.template_engine.as_str(),
            "uses_templates": self.template_engine.is_active(),
            "styles": self.css_preprocessor.as_str(),
            "styles_ext": self.css_preprocessor.extension(),
            "lint_config": self.css_preprocessor.lint_config(),
            "libs": self.include_helper_libs,
            "transpiler": self.use_transpiler,
            "rev": self.revision_hash_assets,
        })
    }
}

fn invalid(question: &str, reason: impl Into<String>) -> Error {
    Error::InvalidOption { question: question.to_string(), reason: reason.into() }
}

fn normalize_answer(question: &Question, raw: &Value) -> Result<Value> {
    match &question.kind {
        QuestionKind::Text { required, .. } => {
            let text = match raw {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return Err(invalid(question.key, "expected text")),
            };
            if *required && text.is_empty() {
                return Err(invalid(question.key, "must not be empty"));
            }
            Ok(Value::String(text))
        }
        QuestionKind::SingleChoice { choices, .. } => {
            let choice = raw
                .as_str()
                .map(str::trim)
                .ok_or_else(|| invalid(question.key, "expected one of the choices"))?;
            if !choices.contains(&choice) {
                return Err(invalid(
                    question.key,
                    format!("'{choice}' is not one of [{}]", choices.join(", ")),
                ));
            }
            Ok(Value::String(choice.to_string()))
        }
        QuestionKind::Confirm { .. } => {
            let flag = match raw {
                Value::Bool(b) => *b,
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "y" | "yes" | "true" => true,
                    "n" | "no" | "false" => false,
                    _ => return Err(invalid(question.key, format!("'{s}' is not yes/no"))),
                },
                _ => return Err(invalid(question.key, "expected yes/no")),
            };
            Ok(Value::Bool(flag))
        }
    }
}
