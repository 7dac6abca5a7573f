/// Handles argument parsing and command dispatch.
pub mod cli;

/// Interfaces to the external tools a pipeline drives, with their adapters.
pub mod collab;

pub mod constants;

/// Defines custom error types.
pub mod error;

/// Small extension traits over std types.
pub mod ext;

/// Dependency-ordered task execution.
pub mod graph;

/// Answers chosen when a project is generated.
pub mod options;

/// Build and watch task graphs for a project.
pub mod pipeline;

/// Project configuration and layout.
pub mod project;

/// User input and interaction handling.
pub mod prompt;

/// Template rendering for generated files.
pub mod renderer;

/// Runs pipelines against the real tools.
pub mod runner;

/// Generation of new projects.
pub mod scaffold;
