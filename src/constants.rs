//! Constants used throughout the lander application

/// Project configuration file written into every generated project
pub const PROJECT_CONFIG_FILE: &str = "lander.yaml";

/// Generation metadata file written next to the project configuration
pub const ANSWERS_FILE: &str = ".lander-answers.json";

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Placeholder argument expanded to the list of input files of a tool
pub const INPUTS_PLACEHOLDER: &str = "{{ inputs }}";

/// Question keys and defaults applied when an answer is omitted
pub mod questions {
    pub const PROJECT_NAME: &str = "project_name";
    pub const DESCRIPTION: &str = "description";
    pub const TEMPLATE_ENGINE: &str = "template_engine";
    pub const CSS_PREPROCESSOR: &str = "css_preprocessor";
    pub const HELPER_LIBS: &str = "helper_libs";
    pub const TRANSPILER: &str = "transpiler";
    pub const REV: &str = "rev";

    pub const DEFAULT_PROJECT_NAME: &str = "landing";
    pub const DEFAULT_DESCRIPTION: &str = "Landing page project";
    pub const DEFAULT_HELPER_LIBS: bool = true;
    pub const DEFAULT_TRANSPILER: bool = false;
    pub const DEFAULT_REV: bool = false;
}

/// Default project layout
pub mod layout {
    pub const SRC: &str = "app";
    pub const DIST: &str = "dist";
    pub const TMP: &str = ".tmp";
    pub const SCRIPTS: &str = "scripts";
    pub const VENDORS: &str = "bower_components";
    pub const TEMPLATES: &str = "jade";
    pub const STYLES: &str = "styles";
    pub const CSS_BUNDLE: &str = "styles/style.css";
    pub const JS_BUNDLE: &str = "scripts/main.js";
    pub const BUNDLE_MANIFEST: &str = "bundles.json";
}

/// Default live reload websocket port
pub const RELOAD_PORT: u16 = 35729;

/// Keys of the external tool table in the project configuration
pub mod tools {
    pub const COMPILE_LESS: &str = "compile-less";
    pub const COMPILE_SASS: &str = "compile-sass";
    pub const COMPILE_STYLUS: &str = "compile-stylus";
    pub const COMPILE_JADE: &str = "compile-jade";
    pub const TRANSPILE: &str = "transpile";
    pub const LINT_STYLES: &str = "lint-styles";
    pub const LINT_SCRIPTS: &str = "lint-scripts";
    pub const LINT_HTML: &str = "lint-html";
    pub const WIREDEP: &str = "wiredep";
    pub const OPTIMIZE_IMAGES: &str = "optimize-images";
    pub const MINIFY_CSS: &str = "minify-css";
    pub const MINIFY_JS: &str = "minify-js";
    pub const MINIFY_HTML: &str = "minify-html";
    pub const SERVE: &str = "serve";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
