use crate::{error::Result, ext::PathExt, renderer::filters, renderer::interface::TemplateRenderer};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde_json::{json, Map, Value};
use std::path::Path;

const ANONYMOUS: &str = "<boilerplate>";

/// MiniJinja-based renderer.
///
/// Boilerplate spans HTML, JSON and YAML, so nothing is escaped implicitly;
/// templates escape with `tojson` where they need to. Undefined variables
/// are errors, which catches typos in the embedded templates.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
    /// Variables every template sees. Caller context wins on conflicts.
    globals: Map<String, Value>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        filters::register(&mut env);

        let mut globals = Map::new();
        globals.insert(
            "generator".into(),
            json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }),
        );
        Self { env, globals }
    }

    fn context_with_globals(&self, context: &Value) -> Value {
        match context.as_object() {
            Some(vars) => {
                let mut merged = self.globals.clone();
                merged.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Object(merged)
            }
            None => context.clone(),
        }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &Value, name: Option<&str>) -> Result<String> {
        let name = name.unwrap_or(ANONYMOUS);
        log::trace!("Rendering {name}");
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())?;
        Ok(env.get_template(name)?.render(self.context_with_globals(context))?)
    }

    fn render_path(&self, template_path: &Path, context: &Value) -> Result<String> {
        let path = template_path.to_str_checked()?;
        Ok(self.env.render_str(path, self.context_with_globals(context))?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
    use serde_json::json;
    use std::path::Path;
    use test_log::test;

    fn render(template: &str, context: serde_json::Value) -> String {
        MiniJinjaRenderer::new().render(template, &context, None).unwrap()
    }

    #[test]
    fn package_name_filter_applies_to_project_names() {
        let name = json!({"name": "Summer Shop"});
        assert_eq!(render("{{ name | package_name }}", name), "summer-shop");
    }

    #[test]
    fn only_package_name_filter_is_registered() {
        let result = MiniJinjaRenderer::new().render(
            "{{ name | camel_case }}",
            &json!({"name": "Summer Shop"}),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn markup_is_left_unescaped() {
        let rendered = MiniJinjaRenderer::new()
            .render("<title>{{ name }}</title>", &json!({"name": "A & B"}), Some("index.html"))
            .unwrap();
        assert_eq!(rendered, "<title>A & B</title>");
    }

    #[test]
    fn tojson_quotes_descriptions() {
        assert_eq!(
            render("{{ description | tojson }}", json!({"description": "Say \"hi\""})),
            "\"Say \\\"hi\\\"\""
        );
    }

    #[test]
    fn generator_is_always_in_scope() {
        assert_eq!(render("{{ generator.name }}", json!({})), "lander");
        assert_eq!(render("{{ generator.name }}", json!({"generator": {"name": "x"}})), "x");
    }

    #[test]
    fn undefined_variables_are_errors() {
        let err = MiniJinjaRenderer::new().render("{{ missing }}", &json!({}), Some("readme.md")).unwrap_err();
        assert!(matches!(err, Error::MinijinjaError(_)));
    }

    #[test]
    fn target_paths_are_rendered() {
        let rendered = MiniJinjaRenderer::new()
            .render_path(Path::new("{{ src }}/{{ styles_dir }}/style.scss"), &json!({"src": "app", "styles_dir": "styles"}))
            .unwrap();
        assert_eq!(rendered, "app/styles/style.scss");
    }
}
