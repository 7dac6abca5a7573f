use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::tools::*;
use crate::options::{CssPreprocessor, OptionSet, TemplateEngine};

/// An external command. Arguments and environment values are MiniJinja
/// templates; an argument that is exactly `{{ inputs }}` expands to one
/// argument per input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
}

impl ToolCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: IndexMap::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    fn npx<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("npx", args)
    }
}

/// Tool table of a generated project, matching its `package.json`.
pub fn default_tools(options: &OptionSet) -> IndexMap<String, ToolCommand> {
    let mut tools = IndexMap::new();
    let mut add = |name: &str, command: ToolCommand| {
        tools.insert(name.to_string(), command);
    };

    match options.css_preprocessor {
        CssPreprocessor::Css => {}
        CssPreprocessor::Less => {
            add(COMPILE_LESS, ToolCommand::npx(["lessc", "{{ input }}", "{{ output }}"]))
        }
        CssPreprocessor::Sass => add(
            COMPILE_SASS,
            ToolCommand::npx(["sass", "--no-source-map", "{{ input }}", "{{ output }}"]),
        ),
        CssPreprocessor::Stylus => add(
            COMPILE_STYLUS,
            ToolCommand::npx(["stylus", "{{ input }}", "--out", "{{ output }}"]),
        ),
    }
    let style_linter = match options.css_preprocessor {
        CssPreprocessor::Css => ToolCommand::npx(["csslint", "--quiet", "{{ inputs }}"]),
        CssPreprocessor::Less => ToolCommand::npx(["lesshint", "--config", "{{ config }}", "{{ inputs }}"]),
        CssPreprocessor::Sass => {
            ToolCommand::npx(["sass-lint", "--config", "{{ config }}", "--verbose", "{{ inputs }}"])
        }
        CssPreprocessor::Stylus => ToolCommand::npx(["stylint", "--config", "{{ config }}", "{{ inputs }}"]),
    };
    add(LINT_STYLES, style_linter);

    if options.template_engine == TemplateEngine::Jade {
        add(
            COMPILE_JADE,
            ToolCommand::npx(["jade", "--pretty", "--out", "{{ output_dir }}", "{{ input }}"]),
        );
    } else {
        add(LINT_HTML, ToolCommand::npx(["htmlhint", "--config", "{{ config }}", "{{ inputs }}"]));
    }

    if options.use_transpiler {
        add(TRANSPILE, ToolCommand::npx(["babel", "{{ input }}", "--out-file", "{{ output }}"]));
    }
    add(LINT_SCRIPTS, ToolCommand::npx(["jshint", "--config", "{{ config }}", "{{ inputs }}"]));

    if options.include_helper_libs {
        add(
            WIREDEP,
            ToolCommand::npx(["wiredep", "--directory", "{{ vendor_dir }}", "--src", "{{ input }}"]),
        );
    }

    add(
        OPTIMIZE_IMAGES,
        ToolCommand::npx(["imagemin", "{{ input }}", "--out-dir", "{{ output_dir }}"]),
    );
    // Browserslist reads the target browsers from the environment.
    add(
        MINIFY_CSS,
        ToolCommand::npx(["postcss", "--use", "autoprefixer", "--use", "cssnano", "--no-map"])
            .with_env("BROWSERSLIST", "{{ browsers }}"),
    );
    add(MINIFY_JS, ToolCommand::npx(["uglifyjs", "--compress", "--mangle"]));
    add(
        MINIFY_HTML,
        ToolCommand::npx(["html-minifier", "--collapse-whitespace", "--remove-comments"]),
    );
    add(
        SERVE,
        ToolCommand::npx(["http-server", "{{ root }}", "-p", "3000", "-c-1", "--silent"]),
    );

    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn only_the_active_compiler_is_configured() {
        let options =
            OptionSet { css_preprocessor: CssPreprocessor::Sass, ..OptionSet::default() };
        let tools = default_tools(&options);
        assert!(tools.contains_key(COMPILE_SASS));
        assert!(!tools.contains_key(COMPILE_LESS));
        assert!(!tools.contains_key(COMPILE_STYLUS));
    }

    #[test]
    fn plain_css_needs_no_compiler() {
        let tools = default_tools(&OptionSet::default());
        assert!(!tools.keys().any(|name| name.starts_with("compile-")));
        assert!(tools.contains_key(LINT_HTML));
        assert!(tools.contains_key(WIREDEP));
        assert!(!tools.contains_key(TRANSPILE));
    }

    #[test]
    fn template_engine_swaps_html_linter_for_compiler() {
        let options = OptionSet {
            template_engine: TemplateEngine::Jade,
            use_transpiler: true,
            include_helper_libs: false,
            ..OptionSet::default()
        };
        let tools = default_tools(&options);
        assert!(tools.contains_key(COMPILE_JADE));
        assert!(!tools.contains_key(LINT_HTML));
        assert!(tools.contains_key(TRANSPILE));
        assert!(!tools.contains_key(WIREDEP));
    }

    #[test]
    fn css_minifier_targets_the_configured_browsers() {
        let tools = default_tools(&OptionSet::default());
        let minify = &tools[MINIFY_CSS];
        assert!(minify.args.iter().any(|arg| arg == "autoprefixer"));
        assert_eq!(minify.env.get("BROWSERSLIST").map(String::as_str), Some("{{ browsers }}"));
    }

    #[test]
    fn commands_without_env_read_from_older_configs() {
        let command: ToolCommand = serde_yaml::from_str("program: npx\nargs: [csso]\n").unwrap();
        assert_eq!(command, ToolCommand::npx(["csso"]));
        assert!(!serde_yaml::to_string(&command).unwrap().contains("env"));
    }
}
