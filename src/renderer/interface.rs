use crate::error::Result;
use std::path::Path;

/// Renders the boilerplate of a generated project.
pub trait TemplateRenderer {
    /// Renders `template` with `context`. `name` only shows up in error messages.
    fn render(&self, template: &str, context: &serde_json::Value, name: Option<&str>) -> Result<String>;

    /// Renders each component of a target path, e.g. `{{ src }}/index.html`.
    fn render_path(&self, template_path: &Path, context: &serde_json::Value) -> Result<String>;
}
