//! Template rendering
//!
//! - `interface`: the `TemplateRenderer` trait the scaffolder and tool adapters depend on
//! - `minijinja`: the MiniJinja-backed implementation
//! - `filters`: string filters available inside templates

mod filters;
mod interface;
mod minijinja;

pub use interface::TemplateRenderer;
pub use minijinja::MiniJinjaRenderer;

/// Creates the default template renderer.
pub fn get_template_engine() -> MiniJinjaRenderer {
    MiniJinjaRenderer::new()
}
