mod utils;

use lander::error::Error;
use lander::graph::{CancelToken, TaskStatus};
use lander::options::CssPreprocessor;
use lander::pipeline::names::{self, INJECT_ASSET_REFERENCES, MINIFY_HTML_AND_FINALIZE};
use lander::project::ToolCommand;
use lander::runner::run_build;
use serde_json::json;
use test_log::test;
use utils::{generate, read, set_tools};

#[test]
fn plain_css_project_builds_without_external_tools() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "site", json!({"helper_libs": false}));
    set_tools(&project, &[]);
    std::fs::write(project.join("app/favicon.ico"), "icon").unwrap();

    let report = run_build(&project, false, &CancelToken::new()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.order().last(), Some(&MINIFY_HTML_AND_FINALIZE));

    let dist = project.join("dist");
    let html = read(dist.join("index.html"));
    assert!(html.contains("<link rel=\"stylesheet\" href=\"styles/style.css\">"));
    assert!(html.contains("<script src=\"scripts/main.js\"></script>"));
    assert!(!html.contains("Development build"));

    assert!(read(dist.join("styles/style.css")).contains(&read(project.join("app/styles/style.css"))));
    assert!(dist.join("scripts/main.js").is_file());
    assert_eq!(read(dist.join("favicon.ico")), "icon");
}

#[test]
fn absolute_paths_reference_bundles_from_the_root() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "abs", json!({"helper_libs": false}));
    set_tools(&project, &[]);

    run_build(&project, true, &CancelToken::new()).unwrap();
    let html = read(project.join("dist/index.html"));
    assert!(html.contains("href=\"/styles/style.css\""));
}

#[cfg(unix)]
#[test]
fn failing_compiler_blocks_everything_downstream() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "broken", json!({"css_preprocessor": "sass", "helper_libs": false}));
    set_tools(&project, &[("compile-sass", ToolCommand::new("false", Vec::<String>::new()))]);

    let err = run_build(&project, false, &CancelToken::new()).unwrap_err();
    let Error::PipelineFailed { tasks, .. } = err else { panic!("expected a pipeline failure, got {err}") };
    assert!(tasks.contains(&names::compile_styles(CssPreprocessor::Sass)));
    assert!(tasks.contains(&INJECT_ASSET_REFERENCES.to_string()));
    assert!(!project.join("dist/index.html").exists());
}

#[cfg(unix)]
#[test]
fn compiled_styles_end_up_in_the_bundle() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "sassy", json!({"css_preprocessor": "sass", "helper_libs": false}));
    set_tools(
        &project,
        &[("compile-sass", ToolCommand::new("sh", ["-c", "echo '.compiled{}' > \"$1\"", "sass", "{{ output }}"]))],
    );

    let report = run_build(&project, false, &CancelToken::new()).unwrap();
    assert_eq!(
        report.status(&names::compile_styles(CssPreprocessor::Sass)),
        Some(&TaskStatus::Completed)
    );
    assert!(read(project.join("dist/styles/style.css")).contains(".compiled{}"));
}

#[test]
fn cancelled_build_runs_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "stopped", json!({"helper_libs": false}));
    set_tools(&project, &[]);

    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(run_build(&project, false, &cancel), Err(Error::PipelineFailed { .. })));
    assert!(!project.join("dist").exists());
}
