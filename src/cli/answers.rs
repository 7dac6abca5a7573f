use serde_json::{Map, Value};

use crate::constants::STDIN_INDICATOR;
use crate::error::{Error, Result};
use crate::options::{questions, OptionSet};
use crate::prompt::{ask_question, PromptProvider};

/// Collects raw answers from `--answers` and, unless disabled, from prompts.
pub struct AnswerCollector<'a> {
    provider: &'a dyn PromptProvider,
    non_interactive: bool,
}

impl<'a> AnswerCollector<'a> {
    pub fn new(provider: &'a dyn PromptProvider, non_interactive: bool) -> Self {
        Self { provider, non_interactive }
    }

    /// Read content from a reader into a string.
    fn read_from(&self, mut reader: impl std::io::Read) -> Result<String> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Ok(buf)
    }

    /// Answers given up front win; the remaining questions are asked in
    /// order. In non-interactive mode they are left out so their defaults apply.
    pub fn collect_answers(&self, cli_answers: Option<String>) -> Result<Map<String, Value>> {
        let mut answers = Map::new();

        if let Some(answers_arg) = cli_answers {
            let answers_str = if answers_arg == STDIN_INDICATOR {
                self.read_from(std::io::stdin())?
            } else {
                answers_arg
            };
            answers.extend(parse_answers(&answers_str)?);
            // Preset answers are never asked again, so a bad one is fatal.
            OptionSet::from_answers(&answers)?;
        }

        if self.non_interactive {
            log::debug!("Non-interactive mode, using defaults for unanswered questions");
            return Ok(answers);
        }

        for question in questions() {
            if answers.contains_key(question.key) {
                continue;
            }
            loop {
                let answer = ask_question(self.provider, &question)?;
                answers.insert(question.key.to_string(), answer);
                match OptionSet::from_answers(&answers) {
                    Ok(_) => break,
                    Err(err @ Error::InvalidOption { .. }) if is_about(&err, question.key) => {
                        println!("{err}");
                        answers.remove(question.key);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        Ok(answers)
    }
}

fn is_about(err: &Error, key: &str) -> bool {
    matches!(err, Error::InvalidOption { question, .. } if question == key)
}

/// Parses `--answers` content, which must be a JSON object.
fn parse_answers(buf: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(buf)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Other(anyhow::anyhow!(
            "answers must be a JSON object, got: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{
        ConfirmRequest, ConfirmInput, ChoiceRequest, ChoiceInput,
        TextRequest, TextInput,
    };
    use std::cell::RefCell;
    use test_log::test;

    /// Replays queued text answers; every other prompt takes its default.
    struct Replay {
        texts: RefCell<Vec<&'static str>>,
        asked: RefCell<Vec<String>>,
    }

    impl Replay {
        fn new(texts: &[&'static str]) -> Self {
            Self { texts: RefCell::new(texts.iter().rev().copied().collect()), asked: RefCell::default() }
        }
    }

    impl TextInput for Replay {
        fn ask_text(&self, request: &TextRequest) -> Result<String> {
            self.asked.borrow_mut().push(request.prompt.clone());
            Ok(self.texts.borrow_mut().pop().unwrap_or_default().to_string())
        }
    }

    impl ChoiceInput for Replay {
        fn ask_choice(&self, request: &ChoiceRequest) -> Result<usize> {
            self.asked.borrow_mut().push(request.prompt.clone());
            Ok(request.default_index.unwrap_or(0))
        }
    }

    impl ConfirmInput for Replay {
        fn ask_confirm(&self, request: &ConfirmRequest) -> Result<bool> {
            self.asked.borrow_mut().push(request.prompt.clone());
            Ok(request.default)
        }
    }

    #[test]
    fn given_answers_are_not_asked_again() {
        let replay = Replay::new(&["A shop"]);
        let collector = AnswerCollector::new(&replay, false);
        let answers = collector
            .collect_answers(Some(r#"{"project_name": "shop", "css_preprocessor": "less"}"#.into()))
            .unwrap();

        assert_eq!(answers["project_name"], "shop");
        assert_eq!(answers["description"], "A shop");
        assert_eq!(answers["css_preprocessor"], "less");
        assert_eq!(replay.asked.borrow().len(), 5);
    }

    #[test]
    fn blank_required_answer_is_asked_again() {
        let replay = Replay::new(&["  ", "shop", ""]);
        let collector = AnswerCollector::new(&replay, false);
        let answers = collector.collect_answers(None).unwrap();
        assert_eq!(answers["project_name"], "shop");
        assert_eq!(answers["description"], "");
    }

    #[test]
    fn non_interactive_asks_nothing() {
        let replay = Replay::new(&[]);
        let collector = AnswerCollector::new(&replay, true);
        let answers = collector.collect_answers(Some(r#"{"rev": true}"#.into())).unwrap();
        assert_eq!(answers.len(), 1);
        assert!(replay.asked.borrow().is_empty());

        let options = OptionSet::from_answers(&answers).unwrap();
        assert!(options.revision_hash_assets);
        assert_eq!(options.project_name, "landing");
    }

    #[test]
    fn invalid_preset_answer_fails_without_prompting() {
        let replay = Replay::new(&[]);
        let collector = AnswerCollector::new(&replay, false);
        let err = collector
            .collect_answers(Some(r#"{"css_preprocessor": "postcss"}"#.into()))
            .unwrap_err();

        assert!(is_about(&err, "css_preprocessor"), "got {err}");
        assert!(replay.asked.borrow().is_empty());
    }

    #[test]
    fn invalid_preset_answer_fails_non_interactively() {
        let replay = Replay::new(&[]);
        let collector = AnswerCollector::new(&replay, true);
        let result = collector.collect_answers(Some(r#"{"rev": "maybe"}"#.into()));
        assert!(matches!(result, Err(Error::InvalidOption { ref question, .. }) if question == "rev"));
    }

    #[test]
    fn answers_must_be_an_object() {
        assert!(parse_answers("[1, 2]").is_err());
        assert!(matches!(parse_answers("{"), Err(Error::JSONParseError(_))));
    }
}
