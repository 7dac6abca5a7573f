//! Task names shared by the build and watch pipelines

use crate::options::CssPreprocessor;

pub const CLEAN: &str = "clean";
pub const COPY_STATIC_FILES: &str = "copy-static-files";
pub const COPY_FONTS: &str = "copy-fonts";
pub const OPTIMIZE_IMAGES: &str = "optimize-images";
pub const TRANSPILE_SCRIPTS: &str = "transpile-scripts";
pub const RESOLVE_VENDOR_DEPENDENCIES: &str = "resolve-vendor-dependencies";
pub const COMPILE_TEMPLATES: &str = "compile-templates";
pub const INJECT_ASSET_REFERENCES: &str = "inject-asset-references-into-html";
pub const CONCATENATE_AND_MINIFY: &str = "concatenate-and-minify-assets";
pub const MINIFY_HTML_AND_FINALIZE: &str = "minify-html-and-finalize";
pub const LINT_STYLES: &str = "lint-styles";
pub const LINT_SCRIPTS: &str = "lint-scripts";
pub const LINT_HTML: &str = "lint-html";
pub const START_DEV_SERVER: &str = "start-dev-server";

/// Prefix shared by the per-preprocessor style tasks.
pub const COMPILE_STYLES_PREFIX: &str = "compile-styles-for-";

pub fn compile_styles(preprocessor: CssPreprocessor) -> String {
    format!("{COMPILE_STYLES_PREFIX}{}", preprocessor.as_str())
}
