//! Drives the build and watch pipelines of a generated project.

mod toolbox;

pub use toolbox::{Toolbox, Tools};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collab::{FileWatchTrigger, LiveReloadServer, NotifyWatcher, WebSocketReloadServer};
use crate::constants::RELOAD_PORT;
use crate::error::Result;
use crate::graph::{CancelToken, Executor, RunReport, TaskStatus};
use crate::pipeline::{Action, Pipeline, PipelineBuilder, PipelineKind};
use crate::project::ProjectConfig;

/// Quiet period before a burst of file events is handled as one change.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// How often the watch loop wakes up to check for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs the build pipeline once.
///
/// # Errors
/// * `ConfigNotFound` - the directory holds no project configuration
/// * `PipelineFailed` - a task failed, was blocked or was cancelled
pub fn run_build(project_dir: &Path, absolute_paths: bool, cancel: &CancelToken) -> Result<RunReport> {
    let config = ProjectConfig::load(project_dir)?;
    let pipeline =
        PipelineBuilder::new(&config, project_dir).absolute_paths(absolute_paths).build_pipeline()?;
    let toolbox = Toolbox::for_project(project_dir, &config);

    let report = pipeline.graph.run_targets(&pipeline.targets(), &toolbox, cancel)?;
    print_report(&report);
    report.into_result(&pipeline.kind.to_string())
}

/// Runs the watch pipeline, then re-runs affected tasks on every source
/// change until `cancel` is raised.
pub fn run_watch(project_dir: &Path, cancel: &CancelToken) -> Result<()> {
    let config = ProjectConfig::load(project_dir)?;

    let reload = WebSocketReloadServer::new(RELOAD_PORT);
    let port = reload.start()?;
    let pipeline =
        PipelineBuilder::new(&config, project_dir).reload_port(Some(port)).watch_pipeline()?;
    let toolbox = Toolbox::for_project(project_dir, &config);

    let mut watcher = NotifyWatcher::new(DEBOUNCE)?;
    watcher.watch(&config.layout.src_dir(project_dir))?;

    watch_loop(&pipeline, &toolbox, &mut watcher, &reload, project_dir, cancel)
}

/// The part of [`run_watch`] that does not touch the network or the real
/// filesystem watcher.
pub fn watch_loop<E, W, R>(
    pipeline: &Pipeline,
    executor: &E,
    watcher: &mut W,
    reload: &R,
    project_dir: &Path,
    cancel: &CancelToken,
) -> Result<()>
where
    E: Executor<Action>,
    W: FileWatchTrigger + ?Sized,
    R: LiveReloadServer + ?Sized,
{
    let report = pipeline.graph.run_targets(&pipeline.targets(), executor, cancel)?;
    log_failures(&report);
    if report.is_success() {
        println!("Watching for changes. Press Ctrl-C to stop.");
    }

    let canonical = project_dir.canonicalize().ok();
    while !cancel.is_cancelled() {
        let changed = match watcher.poll_changes(POLL_INTERVAL) {
            Ok(changed) => changed,
            Err(err) => {
                log::warn!("File watcher error: {err}");
                std::thread::sleep(POLL_INTERVAL);
                continue;
            }
        };
        if changed.is_empty() {
            continue;
        }

        let relative: Vec<PathBuf> = changed
            .iter()
            .filter_map(|path| relative_to_project(path, project_dir, canonical.as_deref()))
            .collect();
        let tasks = pipeline.triggered_tasks(&relative);
        if tasks.is_empty() {
            log::trace!("No rule matches {relative:?}");
            continue;
        }

        log::info!("Change detected, re-running {}", tasks.join(", "));
        let names: Vec<&str> = tasks.iter().map(String::as_str).collect();
        let report = pipeline.graph.rerun(&names, executor, cancel)?;
        log_failures(&report);
        if pipeline.graph.wants_reload(&report) {
            reload.reload();
        }
    }

    log::info!("Stopped watching");
    Ok(())
}

/// Watchers report absolute, often canonicalized, paths.
fn relative_to_project(path: &Path, project_dir: &Path, canonical: Option<&Path>) -> Option<PathBuf> {
    path.strip_prefix(project_dir)
        .ok()
        .or_else(|| canonical.and_then(|dir| path.strip_prefix(dir).ok()))
        .map(Path::to_path_buf)
}

fn print_report(report: &RunReport) {
    for (name, status) in report.iter() {
        match status {
            TaskStatus::Completed => println!("  ✓ {name}"),
            TaskStatus::SkippedDisabled => println!("  - {name} ({status})"),
            _ => eprintln!("  ✗ {name}: {status}"),
        }
    }
}

fn log_failures(report: &RunReport) {
    for (name, status) in report.iter().filter(|(_, status)| !status.is_satisfied()) {
        log::error!("{name}: {status}");
    }
}

/// Prints a pipeline's task graph as a Mermaid flowchart.
pub fn print_graph(project_dir: &Path, kind: PipelineKind) -> Result<()> {
    let config = ProjectConfig::load(project_dir)?;
    let pipeline = PipelineBuilder::new(&config, project_dir).build(kind)?;
    println!("{}", pipeline.graph);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Task;
    use crate::options::{CssPreprocessor, OptionSet, TemplateEngine};
    use crate::pipeline::names::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use test_log::test;

    /// Hands out queued batches, then cancels the run.
    struct QueuedChanges {
        batches: VecDeque<Vec<PathBuf>>,
        cancel: CancelToken,
    }

    impl FileWatchTrigger for QueuedChanges {
        fn watch(&mut self, _root: &Path) -> Result<()> {
            Ok(())
        }

        fn poll_changes(&mut self, _timeout: Duration) -> Result<Vec<PathBuf>> {
            match self.batches.pop_front() {
                Some(batch) => Ok(batch),
                None => {
                    self.cancel.cancel();
                    Ok(Vec::new())
                }
            }
        }
    }

    /// Fails the first poll, then behaves like [`QueuedChanges`].
    struct FlakyWatcher {
        failed: bool,
        queued: QueuedChanges,
    }

    impl FileWatchTrigger for FlakyWatcher {
        fn watch(&mut self, root: &Path) -> Result<()> {
            self.queued.watch(root)
        }

        fn poll_changes(&mut self, timeout: Duration) -> Result<Vec<PathBuf>> {
            if !self.failed {
                self.failed = true;
                return Err(anyhow::anyhow!("inotify queue overflow").into());
            }
            self.queued.poll_changes(timeout)
        }
    }

    #[derive(Default)]
    struct CountingReload {
        reloads: Cell<usize>,
    }

    impl LiveReloadServer for CountingReload {
        fn start(&self) -> anyhow::Result<u16> {
            Ok(0)
        }

        fn reload(&self) {
            self.reloads.set(self.reloads.get() + 1);
        }
    }

    fn watch_pipeline(project_dir: &Path) -> Pipeline {
        let options = OptionSet {
            template_engine: TemplateEngine::None,
            css_preprocessor: CssPreprocessor::Sass,
            include_helper_libs: false,
            ..OptionSet::default()
        };
        let config = ProjectConfig::new(options);
        PipelineBuilder::new(&config, project_dir).watch_pipeline().unwrap()
    }

    #[test]
    fn changes_rerun_downstream_and_reload() {
        let project = Path::new("/work/site");
        let pipeline = watch_pipeline(project);
        let cancel = CancelToken::new();
        let mut watcher = QueuedChanges {
            batches: VecDeque::from([
                vec![project.join("app/styles/main.scss")],
                vec![project.join("app/bower_components/x.scss"), PathBuf::from("/elsewhere/a.scss")],
            ]),
            cancel: cancel.clone(),
        };
        let reload = CountingReload::default();
        let ran = RefCell::new(Vec::new());
        let exec = |task: &Task<Action>| -> anyhow::Result<()> {
            ran.borrow_mut().push(task.name.clone());
            Ok(())
        };

        watch_loop(&pipeline, &exec, &mut watcher, &reload, project, &cancel).unwrap();

        let ran = ran.into_inner();
        let initial = pipeline.graph.len();
        assert_eq!(ran.len(), initial + 3);
        assert_eq!(
            ran[initial..],
            ["compile-styles-for-sass", LINT_STYLES, INJECT_ASSET_REFERENCES]
        );
        assert_eq!(reload.reloads.get(), 1);
    }

    #[test]
    fn failed_rerun_does_not_reload_or_stop() {
        let project = Path::new("/work/site");
        let pipeline = watch_pipeline(project);
        let cancel = CancelToken::new();
        let mut watcher = QueuedChanges {
            batches: VecDeque::from([vec![project.join("app/index.html")]]),
            cancel: cancel.clone(),
        };
        let reload = CountingReload::default();
        let exec = |task: &Task<Action>| -> anyhow::Result<()> {
            anyhow::ensure!(task.name != LINT_HTML, "htmlhint found 1 error");
            Ok(())
        };

        watch_loop(&pipeline, &exec, &mut watcher, &reload, project, &cancel).unwrap();
        assert_eq!(reload.reloads.get(), 0);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn watcher_error_does_not_end_the_session() {
        let project = Path::new("/work/site");
        let pipeline = watch_pipeline(project);
        let cancel = CancelToken::new();
        let mut watcher = FlakyWatcher {
            failed: false,
            queued: QueuedChanges {
                batches: VecDeque::from([vec![project.join("app/styles/main.scss")]]),
                cancel: cancel.clone(),
            },
        };
        let reload = CountingReload::default();
        let ran = RefCell::new(Vec::new());
        let exec = |task: &Task<Action>| -> anyhow::Result<()> {
            ran.borrow_mut().push(task.name.clone());
            Ok(())
        };

        watch_loop(&pipeline, &exec, &mut watcher, &reload, project, &cancel).unwrap();

        assert!(watcher.failed);
        assert_eq!(ran.borrow().len(), pipeline.graph.len() + 3);
        assert_eq!(reload.reloads.get(), 1);
    }

    #[test]
    fn paths_outside_the_project_are_dropped() {
        let project = Path::new("/work/site");
        assert_eq!(
            relative_to_project(Path::new("/work/site/app/a.js"), project, None),
            Some(PathBuf::from("app/a.js"))
        );
        assert_eq!(relative_to_project(Path::new("/tmp/a.js"), project, None), None);
        assert_eq!(
            relative_to_project(Path::new("/real/site/app/a.js"), project, Some(Path::new("/real/site"))),
            Some(PathBuf::from("app/a.js"))
        );
    }

    #[test]
    fn build_without_config_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_build(tmp.path(), false, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, crate::error::Error::ConfigNotFound { .. }));
    }
}
