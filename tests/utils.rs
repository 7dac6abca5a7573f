#![allow(dead_code)]

use lander::cli::{run, Commands, NewArgs};
use lander::project::{ProjectConfig, ToolCommand};
use std::path::{Path, PathBuf};

/// Generates a project below `parent` from `answers`, without prompts or installs.
pub fn generate(parent: &Path, name: &str, answers: serde_json::Value) -> PathBuf {
    let output_dir = parent.join(name);
    run(Commands::New(NewArgs {
        output_dir: output_dir.clone(),
        force: false,
        verbose: 0,
        answers: Some(answers.to_string()),
        non_interactive: true,
        dry_run: false,
        skip_install: true,
    }))
    .unwrap();
    output_dir
}

/// Replaces the tool table of a generated project.
pub fn set_tools(project_dir: &Path, tools: &[(&str, ToolCommand)]) {
    let mut config = ProjectConfig::load(project_dir).unwrap();
    config.tools = tools.iter().map(|(name, tool)| (name.to_string(), tool.clone())).collect();
    config.save(project_dir).unwrap();
}

pub fn read(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}
