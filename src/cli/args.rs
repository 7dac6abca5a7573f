use crate::constants::{exit_codes, verbosity};
use crate::pipeline::PipelineKind;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Scaffolds landing page projects and runs their build and watch pipelines.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new project.
    New(NewArgs),
    /// Build the project into its dist folder.
    Build(BuildArgs),
    /// Serve the project and rebuild on change.
    Watch(WatchArgs),
    /// Print a pipeline's task graph as a Mermaid diagram.
    Graph(GraphArgs),
}

impl Commands {
    pub fn verbose(&self) -> u8 {
        match self {
            Commands::New(args) => args.verbose,
            Commands::Build(args) => args.verbose,
            Commands::Watch(args) => args.verbose,
            Commands::Graph(_) => verbosity::OFF,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Destination directory for the project.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Force overwrite of an existing output directory.
    #[arg(short, long)]
    pub force: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Predefined answers as JSON string or `-` to read from stdin.
    #[arg(short, long)]
    pub answers: Option<String>,

    /// Use defaults for every question not answered by `--answers`.
    #[arg(long = "non-interactive", alias = "defaults")]
    pub non_interactive: bool,

    /// Preview actions without touching the filesystem.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Do not run npm and bower after generation.
    #[arg(long = "skip-install")]
    pub skip_install: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Project directory.
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Reference bundles from the site root instead of relative to each page.
    #[arg(long = "abspaths")]
    pub absolute_paths: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Project directory.
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    #[arg(value_enum, default_value_t = PipelineKind::Build)]
    pub pipeline: PipelineKind,

    /// Project directory.
    #[arg(long, value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

/// Parse command line arguments, printing help instead of a bare error
/// when a required input is missing.
pub fn get_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument
                | ErrorKind::MissingSubcommand
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ) {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
