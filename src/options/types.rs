//! Enumerated scaffold choices

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Template engine compiled into HTML. `None` means plain HTML is authored directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngine {
    #[default]
    None,
    Jade,
}

/// CSS preprocessor used for the stylesheet sources. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssPreprocessor {
    #[default]
    Css,
    Less,
    Sass,
    Stylus,
}

impl TemplateEngine {
    pub const ALL: [TemplateEngine; 2] = [TemplateEngine::None, TemplateEngine::Jade];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateEngine::None => "none",
            TemplateEngine::Jade => "jade",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|engine| engine.as_str() == value)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, TemplateEngine::None)
    }

    /// File extension of authored templates, if any.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            TemplateEngine::None => None,
            TemplateEngine::Jade => Some("jade"),
        }
    }
}

impl CssPreprocessor {
    pub const ALL: [CssPreprocessor; 4] = [
        CssPreprocessor::Css,
        CssPreprocessor::Less,
        CssPreprocessor::Sass,
        CssPreprocessor::Stylus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CssPreprocessor::Css => "css",
            CssPreprocessor::Less => "less",
            CssPreprocessor::Sass => "sass",
            CssPreprocessor::Stylus => "stylus",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pre| pre.as_str() == value)
    }

    /// Extension of the authored stylesheet sources.
    pub fn extension(&self) -> &'static str {
        match self {
            CssPreprocessor::Css => "css",
            CssPreprocessor::Less => "less",
            CssPreprocessor::Sass => "scss",
            CssPreprocessor::Stylus => "styl",
        }
    }

    /// Glob matching the entry points handed to the compiler. Less and Stylus
    /// compile a single root file that imports the rest; CSS and Sass take
    /// every non-partial file.
    pub fn entry_glob(&self) -> &'static str {
        match self {
            CssPreprocessor::Css => "**/*.css",
            CssPreprocessor::Less => "style.less",
            CssPreprocessor::Sass => "**/[!_]*.scss",
            CssPreprocessor::Stylus => "style.styl",
        }
    }

    /// Lint configuration copied into the generated project.
    pub fn lint_config(&self) -> &'static str {
        match self {
            CssPreprocessor::Css => ".csslintrc",
            CssPreprocessor::Less => ".lesshintrc",
            CssPreprocessor::Sass => ".sass-lint.yml",
            CssPreprocessor::Stylus => ".stylintrc",
        }
    }

    /// Whether this preprocessor needs an external compiler. Plain CSS is
    /// concatenated natively.
    pub fn needs_compiler(&self) -> bool {
        !matches!(self, CssPreprocessor::Css)
    }
}

impl Display for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for CssPreprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_declared_choices() {
        for pre in CssPreprocessor::ALL {
            assert_eq!(CssPreprocessor::parse(pre.as_str()), Some(pre));
        }
        for engine in TemplateEngine::ALL {
            assert_eq!(TemplateEngine::parse(engine.as_str()), Some(engine));
        }
    }

    #[test]
    fn parse_rejects_unknown_choices() {
        assert_eq!(CssPreprocessor::parse("scss"), None);
        assert_eq!(CssPreprocessor::parse("Sass"), None);
        assert_eq!(TemplateEngine::parse("pug"), None);
    }

    #[test]
    fn each_preprocessor_has_its_own_lint_config() {
        let configs: std::collections::HashSet<_> =
            CssPreprocessor::ALL.iter().map(|pre| pre.lint_config()).collect();
        assert_eq!(configs.len(), 4);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let pre: CssPreprocessor = serde_json::from_str(r#""stylus""#).unwrap();
        assert_eq!(pre, CssPreprocessor::Stylus);
        assert_eq!(serde_json::to_string(&TemplateEngine::Jade).unwrap(), r#""jade""#);
    }
}
