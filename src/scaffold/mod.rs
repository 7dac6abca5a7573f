//! Generates a new landing project.
//!
//! Generation is planned first, as a list of [`ScaffoldOperation`]s, so a dry
//! run can report exactly what a real run would write.

mod boilerplate;
mod install;
mod metadata;
mod operation;

pub use boilerplate::{selected, Boilerplate, BOILERPLATE};
pub use install::install_dependencies;
pub use metadata::GenerationMetadata;
pub use operation::ScaffoldOperation;

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::constants::{ANSWERS_FILE, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::project::ProjectConfig;
use crate::renderer::TemplateRenderer;

/// Refuses to generate into an existing directory unless forced.
pub fn get_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

pub struct Scaffolder<'a> {
    engine: &'a dyn TemplateRenderer,
    output_root: PathBuf,
    dry_run: bool,
}

impl<'a> Scaffolder<'a> {
    pub fn new(engine: &'a dyn TemplateRenderer, output_root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self { engine, output_root: output_root.into(), dry_run }
    }

    /// Rendering context: the chosen options plus the folder names of the layout.
    pub fn context(config: &ProjectConfig) -> Value {
        let mut context = config.options.to_context();
        let layout = &config.layout;
        if let Some(map) = context.as_object_mut() {
            map.insert("src".into(), layout.src.to_slash_string().into());
            map.insert("dist".into(), layout.dist.to_slash_string().into());
            map.insert("styles_dir".into(), layout.folders.styles.clone().into());
            map.insert("scripts_dir".into(), layout.folders.scripts.clone().into());
            map.insert("templates_dir".into(), layout.folders.templates.clone().into());
            map.insert("vendors_dir".into(), layout.folders.vendors.clone().into());
        }
        context
    }

    /// Every file of the new project, including its configuration and the
    /// generation metadata.
    pub fn plan(&self, config: &ProjectConfig, answers: &Value) -> Result<Vec<ScaffoldOperation>> {
        let context = Self::context(config);
        let mut operations = vec![ScaffoldOperation::CreateDirectory {
            target: self.output_root.clone(),
            target_exists: self.output_root.exists(),
        }];

        for file in selected(&config.options) {
            let target = self.engine.render_path(Path::new(file.target), &context)?;
            let content = if file.render {
                self.engine.render(file.content, &context, Some(file.target))?
            } else {
                file.content.to_string()
            };
            operations.push(self.write(PathBuf::from(target), content));
        }

        operations.push(self.write(PathBuf::from(PROJECT_CONFIG_FILE), config.to_yaml()?));
        operations.push(self.write(
            PathBuf::from(ANSWERS_FILE),
            GenerationMetadata::new(answers.clone()).to_json()?,
        ));
        Ok(operations)
    }

    fn write(&self, relative: PathBuf, content: String) -> ScaffoldOperation {
        let target = self.output_root.join(relative);
        let target_exists = target.exists();
        ScaffoldOperation::Write { target, content, target_exists }
    }

    /// Carries out planned operations. Nothing is touched on a dry run.
    pub fn apply(&self, operations: &[ScaffoldOperation]) -> Result<()> {
        for operation in operations {
            log::info!("{}", operation.get_message(self.dry_run));
            if self.dry_run {
                continue;
            }
            match operation {
                ScaffoldOperation::Write { target, content, .. } => {
                    if let Some(parent) = target.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(target, content)?;
                }
                ScaffoldOperation::CreateDirectory { target, target_exists } => {
                    if !target_exists {
                        std::fs::create_dir_all(target)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn generate(&self, config: &ProjectConfig, answers: &Value) -> Result<Vec<ScaffoldOperation>> {
        let operations = self.plan(config, answers)?;
        self.apply(&operations)?;
        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CssPreprocessor, OptionSet, TemplateEngine};
    use crate::renderer::get_template_engine;
    use std::fs;
    use test_log::test;

    fn config(options: OptionSet) -> ProjectConfig {
        ProjectConfig::new(options)
    }

    #[test]
    fn generates_a_loadable_project() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("shop");
        let engine = get_template_engine();
        let options = OptionSet {
            project_name: "Summer Shop".into(),
            description: "Say \"hi\"".into(),
            css_preprocessor: CssPreprocessor::Sass,
            ..OptionSet::default()
        };
        let config = config(options.clone());

        Scaffolder::new(&engine, &root, false).generate(&config, &options.to_answers()).unwrap();

        let package: Value =
            serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
        assert_eq!(package["name"], "summer-shop");
        assert_eq!(package["description"], "Say \"hi\"");
        assert!(package["devDependencies"]["sass"].is_string());

        assert!(root.join("app/styles/style.scss").is_file());
        assert!(root.join("app/styles/_variables.scss").is_file());
        assert!(root.join(".sass-lint.yml").is_file());
        assert!(fs::read_to_string(root.join("app/index.html")).unwrap().contains("<!-- inject:css -->"));
        assert!(fs::read_to_string(root.join(".bowerrc")).unwrap().contains("app/bower_components"));

        assert_eq!(ProjectConfig::load(&root).unwrap(), config);
        let metadata = GenerationMetadata::load(&root.join(ANSWERS_FILE)).unwrap();
        assert_eq!(metadata.answers["css_preprocessor"], "sass");
    }

    #[test]
    fn jade_projects_get_templates_instead_of_html() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = get_template_engine();
        let options = OptionSet { template_engine: TemplateEngine::Jade, ..OptionSet::default() };
        let operations = Scaffolder::new(&engine, tmp.path(), true)
            .plan(&config(options.clone()), &options.to_answers())
            .unwrap();

        let targets: Vec<_> = operations
            .iter()
            .map(|op| op.target_path().strip_prefix(tmp.path()).unwrap().to_slash_string())
            .collect();
        assert!(targets.contains(&"app/jade/index.jade".to_string()));
        assert!(targets.contains(&"app/jade/_layout.jade".to_string()));
        assert!(!targets.contains(&"app/index.html".to_string()));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("site");
        let engine = get_template_engine();
        let options = OptionSet::default();
        let operations = Scaffolder::new(&engine, &root, true)
            .generate(&config(options.clone()), &options.to_answers())
            .unwrap();

        assert!(operations.len() > 5);
        assert!(!root.exists());
    }

    #[test]
    fn existing_output_needs_force() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            get_output_dir(tmp.path(), false),
            Err(Error::OutputDirectoryExistsError { .. })
        ));
        assert_eq!(get_output_dir(tmp.path(), true).unwrap(), tmp.path());
    }
}
