use crate::{
    cli::{answers::AnswerCollector, BuildArgs, Commands, GraphArgs, NewArgs, WatchArgs},
    error::Result,
    graph::CancelToken,
    options::OptionSet,
    project::ProjectConfig,
    prompt::{confirm, get_prompt_provider},
    renderer::get_template_engine,
    runner::{print_graph, run_build, run_watch},
    scaffold::{get_output_dir, install_dependencies, Scaffolder},
};
use serde_json::Value;

/// Runs the project generation workflow of `lander new`.
pub struct Runner {
    args: NewArgs,
}

impl Runner {
    pub fn new(args: NewArgs) -> Self {
        Self { args }
    }

    /// Executes the complete project generation workflow
    pub fn run(self) -> Result<()> {
        let engine = get_template_engine();
        let output_root = get_output_dir(&self.args.output_dir, self.args.force)?;

        let answers = self.collect_answers()?;
        let options = OptionSet::from_answers(&answers)?;
        let config = ProjectConfig::new(options);
        config.validate()?;

        let scaffolder = Scaffolder::new(&engine, &output_root, self.args.dry_run);
        scaffolder.generate(&config, &Value::Object(answers))?;

        if self.should_install()? {
            install_dependencies(&output_root, &config.options)?;
        }

        println!("Project generation completed successfully in {}.", output_root.display());
        Ok(())
    }

    fn collect_answers(&self) -> Result<serde_json::Map<String, Value>> {
        let provider = get_prompt_provider();
        let collector = AnswerCollector::new(&provider, self.args.non_interactive);
        collector.collect_answers(self.args.answers.clone())
    }

    /// Installing is skipped on dry runs and when declined.
    fn should_install(&self) -> Result<bool> {
        if self.args.skip_install || self.args.dry_run {
            return Ok(false);
        }
        confirm(self.args.non_interactive, "Install npm and bower dependencies now?".to_string())
    }
}

fn build(args: BuildArgs) -> Result<()> {
    let cancel = CancelToken::new();
    cancel.cancel_on_interrupt()?;
    run_build(&args.project_dir, args.absolute_paths, &cancel)?;
    Ok(())
}

fn watch(args: WatchArgs) -> Result<()> {
    let cancel = CancelToken::new();
    cancel.cancel_on_interrupt()?;
    run_watch(&args.project_dir, &cancel)
}

fn graph(args: GraphArgs) -> Result<()> {
    print_graph(&args.project_dir, args.pipeline)
}

/// Main entry point for CLI execution
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::New(args) => Runner::new(args).run(),
        Commands::Build(args) => build(args),
        Commands::Watch(args) => watch(args),
        Commands::Graph(args) => graph(args),
    }
}
