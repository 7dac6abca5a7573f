mod utils;

use lander::cli::{run, Commands, NewArgs};
use lander::constants::{ANSWERS_FILE, PROJECT_CONFIG_FILE};
use lander::error::Error;
use lander::options::{CssPreprocessor, TemplateEngine};
use lander::project::ProjectConfig;
use lander::scaffold::GenerationMetadata;
use serde_json::json;
use test_log::test;
use utils::{generate, read};

fn new_args(output_dir: std::path::PathBuf) -> NewArgs {
    NewArgs {
        output_dir,
        force: false,
        verbose: 0,
        answers: None,
        non_interactive: true,
        dry_run: false,
        skip_install: true,
    }
}

#[test]
fn non_interactive_generation_uses_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "landing", json!({}));

    let config = ProjectConfig::load(&project).unwrap();
    assert_eq!(config.options.project_name, "landing");
    assert_eq!(config.options.css_preprocessor, CssPreprocessor::Css);
    assert_eq!(config.options.template_engine, TemplateEngine::None);
    assert!(config.options.include_helper_libs);

    assert!(project.join("app/index.html").is_file());
    assert!(project.join("app/styles/style.css").is_file());
    assert!(project.join("app/scripts/main.js").is_file());
    assert!(project.join("bower.json").is_file());
    assert!(read(project.join("app/index.html")).contains("<!-- bower:js -->"));
}

#[test]
fn answers_select_the_generated_files() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(
        tmp.path(),
        "promo",
        json!({
            "project_name": "Spring Promo",
            "template_engine": "jade",
            "css_preprocessor": "stylus",
            "helper_libs": false,
            "transpiler": true,
        }),
    );

    assert!(project.join("app/jade/index.jade").is_file());
    assert!(project.join("app/styles/style.styl").is_file());
    assert!(project.join(".stylintrc").is_file());
    assert!(project.join(".babelrc").is_file());
    assert!(!project.join("app/index.html").exists());
    assert!(!project.join("bower.json").exists());

    let package: serde_json::Value = serde_json::from_str(&read(project.join("package.json"))).unwrap();
    assert_eq!(package["name"], "spring-promo");
    assert!(package["devDependencies"]["stylus"].is_string());
    assert!(package["devDependencies"]["jade"].is_string());

    let metadata = GenerationMetadata::load(&project.join(ANSWERS_FILE)).unwrap();
    assert_eq!(metadata.answers["project_name"], "Spring Promo");
    assert_eq!(metadata.generator_version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn invalid_answer_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut args = new_args(tmp.path().join("bad"));
    args.answers = Some(json!({"css_preprocessor": "postcss"}).to_string());

    let err = run(Commands::New(args)).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref question, .. } if question == "css_preprocessor"));
    assert!(!tmp.path().join("bad").exists());
}

#[test]
fn existing_directory_requires_force() {
    let tmp = tempfile::tempdir().unwrap();
    let project = generate(tmp.path(), "again", json!({}));

    let err = run(Commands::New(new_args(project.clone()))).unwrap_err();
    assert!(matches!(err, Error::OutputDirectoryExistsError { .. }));

    let mut forced = new_args(project.clone());
    forced.force = true;
    forced.answers = Some(json!({"project_name": "Again"}).to_string());
    run(Commands::New(forced)).unwrap();
    assert_eq!(ProjectConfig::load(&project).unwrap().options.project_name, "Again");
}

#[test]
fn dry_run_leaves_no_trace() {
    let tmp = tempfile::tempdir().unwrap();
    let mut args = new_args(tmp.path().join("preview"));
    args.dry_run = true;

    run(Commands::New(args)).unwrap();
    assert!(!tmp.path().join("preview").exists());
    assert!(!tmp.path().join("preview").join(PROJECT_CONFIG_FILE).exists());
}
