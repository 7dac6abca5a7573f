use std::process::ExitStatus;
use thiserror::Error;

use crate::constants::exit_codes;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Failed to compile glob pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Prompt failed: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Failed to walk directory: {0}")]
    WalkDirError(#[from] walkdir::Error),

    #[error("File watcher error: {0}")]
    NotifyError(#[from] notify::Error),

    /// A scaffold answer is missing, empty or outside its choice set.
    #[error("Invalid answer for '{question}': {reason}.")]
    InvalidOption { question: String, reason: String },

    #[error("Task '{name}' is registered twice.")]
    DuplicateTask { name: String },

    #[error("Task '{task}' depends on unknown task '{dependency}'.")]
    UnknownDependency { task: String, dependency: String },

    #[error("Dependency cycle detected between tasks: {}.", tasks.join(" -> "))]
    CycleDetected { tasks: Vec<String> },

    #[error("No task named '{name}' in the graph.")]
    UnknownTask { name: String },

    #[error("Pipeline '{pipeline}' failed. Unsuccessful tasks: {}.", tasks.join(", "))]
    PipelineFailed { pipeline: String, tasks: Vec<String> },

    #[error("Tool '{tool}' is not configured in the project configuration.")]
    ToolNotConfigured { tool: String },

    #[error("Tool '{tool}' failed with status: {status}")]
    ToolExecutionError { tool: String, status: ExitStatus },

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    #[error("No project configuration found in '{project_dir}'. Expected: {config_file}.")]
    ConfigNotFound { project_dir: String, config_file: String },

    #[error("Cannot proceed: output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with lander's Error as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(exit_codes::FAILURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_tasks_in_order() {
        let err = Error::CycleDetected { tasks: vec!["x".into(), "y".into(), "x".into()] };
        assert_eq!(err.to_string(), "Dependency cycle detected between tasks: x -> y -> x.");
    }

    #[test]
    fn pipeline_failure_lists_every_task() {
        let err = Error::PipelineFailed {
            pipeline: "build".into(),
            tasks: vec!["compile-styles-for-sass".into(), "inject-asset-references-into-html".into()],
        };
        assert!(err.to_string().contains("compile-styles-for-sass, inject-asset"));
    }
}
