//! Assembles the build and watch task graphs from a project configuration.
//!
//! Which tasks exist depends on the options chosen at scaffold time; which
//! of them are enabled depends on the layout and, for vendor resolution, on
//! what is on disk when the pipeline is assembled.

mod action;
mod build;
pub mod names;
mod rules;
mod watch;

pub use action::Action;
pub use rules::{triggered_tasks, WatchRule};

use clap::ValueEnum;
use std::fmt::Display;
use std::path::PathBuf;

use crate::collab::FileSet;
use crate::constants::layout as defaults;
use crate::error::Result;
use crate::ext::PathExt;
use crate::graph::TaskGraph;
use crate::project::{folder, ProjectConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PipelineKind {
    /// One-shot production build into the dist folder.
    Build,
    /// Incremental development loop with live reload.
    Watch,
}

impl Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineKind::Build => write!(f, "build"),
            PipelineKind::Watch => write!(f, "watch"),
        }
    }
}

/// A task graph together with what to run first and, for watch, what to
/// re-run when files change.
#[derive(Debug)]
pub struct Pipeline {
    pub kind: PipelineKind,
    pub graph: TaskGraph<Action>,
    pub targets: Vec<String>,
    pub rules: Vec<WatchRule>,
}

impl Pipeline {
    pub fn targets(&self) -> Vec<&str> {
        self.targets.iter().map(String::as_str).collect()
    }

    /// Tasks to re-run for a batch of changed paths relative to the project directory.
    pub fn triggered_tasks(&self, changed: &[PathBuf]) -> Vec<String> {
        triggered_tasks(&self.rules, changed)
    }
}

/// Builds [`Pipeline`]s for one project.
pub struct PipelineBuilder<'a> {
    config: &'a ProjectConfig,
    project_dir: PathBuf,
    absolute_paths: bool,
    reload_port: Option<u16>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(config: &'a ProjectConfig, project_dir: impl Into<PathBuf>) -> Self {
        Self { config, project_dir: project_dir.into(), absolute_paths: false, reload_port: None }
    }

    /// Reference bundles from the site root instead of relative to each page.
    pub fn absolute_paths(mut self, absolute_paths: bool) -> Self {
        self.absolute_paths = absolute_paths;
        self
    }

    /// Port of the live reload server whose client script is injected while watching.
    pub fn reload_port(mut self, port: Option<u16>) -> Self {
        self.reload_port = port;
        self
    }

    pub fn build(&self, kind: PipelineKind) -> Result<Pipeline> {
        match kind {
            PipelineKind::Build => self.build_pipeline(),
            PipelineKind::Watch => self.watch_pipeline(),
        }
    }

    pub fn build_pipeline(&self) -> Result<Pipeline> {
        build::assemble(self.config, &self.paths(PipelineKind::Build), self.absolute_paths)
    }

    pub fn watch_pipeline(&self) -> Result<Pipeline> {
        watch::assemble(self.config, &self.paths(PipelineKind::Watch), self.reload_port)
    }

    fn paths(&self, kind: PipelineKind) -> Paths {
        let layout = &self.config.layout;
        let root = self.project_dir.clone();
        let tmp = match kind {
            PipelineKind::Build => layout.build_tmp_dir(&root),
            PipelineKind::Watch => layout.watch_tmp_dir(&root),
        };
        Paths {
            src: layout.src_dir(&root),
            dist: layout.dist_dir(&root),
            src_rel: layout.src.to_slash_string(),
            tmp,
            root,
        }
    }
}

/// Absolute locations a pipeline reads and writes.
pub(crate) struct Paths {
    pub root: PathBuf,
    pub src: PathBuf,
    /// Source directory relative to the project, for watch patterns.
    pub src_rel: String,
    pub dist: PathBuf,
    pub tmp: PathBuf,
}

impl Paths {
    fn src_folder(&self, name: &str) -> PathBuf {
        match folder(name) {
            Some(name) => self.src.join(name),
            None => self.src.clone(),
        }
    }

    /// Folders below the source directory that never hold authored pages.
    fn page_excludes(&self, config: &ProjectConfig) -> Vec<String> {
        let mut excludes = Vec::new();
        if let Some(vendors) = folder(&config.layout.folders.vendors) {
            excludes.push(format!("{vendors}/**"));
        }
        excludes.push(format!("{}/**", config.layout.tmp.to_slash_string()));
        excludes.push("node_modules/**".to_string());
        excludes
    }

    /// Authored HTML pages, including pages compiled from templates.
    fn html_pages(&self, config: &ProjectConfig) -> FileSet {
        FileSet::new(&self.src, ["**/*.html"]).excluding(self.page_excludes(config))
    }

    /// Markup the vendor injector rewrites: templates when an engine is
    /// active, HTML otherwise.
    fn vendor_pages(&self, config: &ProjectConfig) -> FileSet {
        match config.options.template_engine.extension() {
            Some(ext) => FileSet::new(
                self.src_folder(&config.layout.folders.templates),
                [format!("**/*.{ext}")],
            ),
            None => self.html_pages(config),
        }
    }

    fn style_entries(&self, config: &ProjectConfig) -> FileSet {
        FileSet::new(
            self.src_folder(&config.layout.folders.styles),
            [config.options.css_preprocessor.entry_glob()],
        )
    }

    /// Authored scripts.
    fn scripts(&self, config: &ProjectConfig) -> FileSet {
        FileSet::new(self.src_folder(&config.layout.folders.scripts), ["**/*.js"])
            .excluding(self.page_excludes(config))
    }

    fn transpiled_scripts_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.tmp.join(folder(&config.layout.folders.scripts).unwrap_or(defaults::SCRIPTS))
    }

    /// Scripts referenced from pages: transpiler output when transpiling.
    fn served_scripts(&self, config: &ProjectConfig) -> FileSet {
        if config.options.use_transpiler {
            FileSet::new(self.transpiled_scripts_dir(config), ["**/*.js"])
        } else {
            self.scripts(config)
        }
    }

    fn template_entries(&self, config: &ProjectConfig) -> Option<FileSet> {
        config.options.template_engine.extension().map(|ext| {
            FileSet::new(
                self.src_folder(&config.layout.folders.templates),
                [format!("**/[!_]*.{ext}")],
            )
        })
    }

    fn vendor_dir(&self, config: &ProjectConfig) -> Option<PathBuf> {
        config.layout.existing_vendor_dir(&self.root)
    }

    fn lint_config(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}
