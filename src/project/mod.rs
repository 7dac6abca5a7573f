//! The `lander.yaml` project configuration

mod layout;
mod tools;

pub use layout::{folder, Folders, Layout};
pub use tools::{default_tools, ToolCommand};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::PROJECT_CONFIG_FILE;
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::options::OptionSet;

/// Everything `build` and `watch` need to assemble their pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub options: OptionSet,
    #[serde(default)]
    pub layout: Layout,
    /// Browser list handed to the CSS minifier.
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
    /// Files below the source directory copied verbatim into the build output.
    #[serde(default = "default_copy_files")]
    pub copy_files: Vec<String>,
    #[serde(default)]
    pub tools: IndexMap<String, ToolCommand>,
}

fn default_browsers() -> Vec<String> {
    vec!["Firefox < 20".into(), "Chrome < 20".into(), "Opera < 12".into()]
}

fn default_copy_files() -> Vec<String> {
    vec!["favicon.ico".into()]
}

impl ProjectConfig {
    /// Configuration written into a freshly generated project.
    pub fn new(options: OptionSet) -> Self {
        Self {
            layout: Layout::for_options(&options),
            browsers: default_browsers(),
            copy_files: default_copy_files(),
            tools: default_tools(&options),
            options,
        }
    }

    pub fn load<P: AsRef<Path>>(project_dir: P) -> Result<Self> {
        let project_dir = project_dir.as_ref();
        let config_path = project_dir.join(PROJECT_CONFIG_FILE);
        if !config_path.is_file() {
            return Err(Error::ConfigNotFound {
                project_dir: project_dir.to_str_checked()?.to_string(),
                config_file: PROJECT_CONFIG_FILE.to_string(),
            });
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: ProjectConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded project configuration from {}", config_path.display());
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, project_dir: P) -> Result<()> {
        let config_path = project_dir.as_ref().join(PROJECT_CONFIG_FILE);
        std::fs::write(&config_path, self.to_yaml()?)?;
        log::debug!("Wrote project configuration to {}", config_path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;
        for (name, dir) in [("src", &self.layout.src), ("dist", &self.layout.dist), ("tmp", &self.layout.tmp)] {
            if dir.as_os_str().is_empty() {
                return Err(Error::ConfigValidation(format!("layout.{name} must not be empty")));
            }
        }
        if self.layout.src == self.layout.dist {
            return Err(Error::ConfigValidation("layout.src and layout.dist must differ".into()));
        }
        if let Some((name, _)) = self.tools.iter().find(|(_, tool)| tool.program.trim().is_empty()) {
            return Err(Error::ConfigValidation(format!("tool '{name}' has no program")));
        }
        Ok(())
    }
}
