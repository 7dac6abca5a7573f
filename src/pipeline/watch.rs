use crate::collab::{FileSet, LintTarget};
use crate::error::Result;
use crate::ext::PathExt;
use crate::graph::{Task, TaskGraphBuilder};
use crate::pipeline::names::*;
use crate::pipeline::{Action, Paths, Pipeline, PipelineKind, WatchRule};
use crate::project::{folder, ProjectConfig};

const SCRIPT_LINT_CONFIG: &str = ".jshintrc";
const HTML_LINT_CONFIG: &str = ".htmlhintrc";

/// Development loop. Nothing is cleaned; compiled output goes to the
/// temporary folder inside the sources, which the dev server serves.
pub(super) fn assemble(config: &ProjectConfig, paths: &Paths, reload_port: Option<u16>) -> Result<Pipeline> {
    let options = &config.options;
    let folders = &config.layout.folders;
    let mut graph = TaskGraphBuilder::new();

    let style_task = compile_styles(options.css_preprocessor);
    graph.register_task(
        Task::new(
            &style_task,
            Action::CompileStyles {
                preprocessor: options.css_preprocessor,
                entries: paths.style_entries(config),
                out_dir: paths.tmp.clone(),
            },
        )
        .enabled(folder(&folders.styles).is_some())
        .reloads(true),
    )?;

    graph.register_task(
        Task::new(
            LINT_STYLES,
            Action::Lint {
                target: LintTarget::Styles,
                files: FileSet::new(
                    paths.src_folder(&folders.styles),
                    [format!("**/*.{}", options.css_preprocessor.extension())],
                ),
                config: paths.lint_config(options.css_preprocessor.lint_config()),
            },
        )
        .after([&style_task])
        .enabled(folder(&folders.styles).is_some()),
    )?;

    let mut inject_deps = vec![LINT_STYLES.to_string()];

    if options.use_transpiler {
        graph.register_task(
            Task::new(
                TRANSPILE_SCRIPTS,
                Action::Transpile {
                    scripts: paths.scripts(config),
                    out_dir: paths.transpiled_scripts_dir(config),
                },
            )
            .reloads(true),
        )?;
        inject_deps.push(TRANSPILE_SCRIPTS.to_string());
    }

    let lint_scripts_deps: Vec<&str> =
        if options.use_transpiler { vec![TRANSPILE_SCRIPTS] } else { Vec::new() };
    graph.register_task(
        Task::new(
            LINT_SCRIPTS,
            Action::Lint {
                target: LintTarget::Scripts,
                files: paths.scripts(config),
                config: paths.lint_config(SCRIPT_LINT_CONFIG),
            },
        )
        .after(lint_scripts_deps)
        .enabled(folder(&folders.scripts).is_some())
        .reloads(true),
    )?;
    if !options.use_transpiler {
        // Scripts are served as written, so linting is the only step between
        // a script change and the page references.
        inject_deps.push(LINT_SCRIPTS.to_string());
    }

    let mut template_deps = Vec::new();
    if options.include_helper_libs {
        let vendor_dir = paths.vendor_dir(config);
        graph.register_task(
            Task::new(
                RESOLVE_VENDOR_DEPENDENCIES,
                Action::ResolveVendor {
                    pages: paths.vendor_pages(config),
                    vendor_dir: vendor_dir.clone().unwrap_or_else(|| paths.src.clone()),
                },
            )
            .enabled(vendor_dir.is_some())
            .reloads(true),
        )?;
        inject_deps.push(RESOLVE_VENDOR_DEPENDENCIES.to_string());
        template_deps.push(RESOLVE_VENDOR_DEPENDENCIES);
    }

    if let Some(entries) = paths.template_entries(config) {
        graph.register_task(
            Task::new(
                COMPILE_TEMPLATES,
                Action::CompileTemplates {
                    engine: options.template_engine,
                    entries,
                    out_dir: paths.src.clone(),
                },
            )
            .after(template_deps)
            .reloads(true),
        )?;
        inject_deps.push(COMPILE_TEMPLATES.to_string());
    }

    graph.register_task(
        Task::new(
            INJECT_ASSET_REFERENCES,
            Action::InjectAssets {
                pages: paths.html_pages(config),
                styles: FileSet::new(&paths.tmp, ["**/*.css"]),
                scripts: paths.served_scripts(config),
                reload_port,
            },
        )
        .after(inject_deps)
        .reloads(true),
    )?;

    if !options.template_engine.is_active() {
        graph.register_task(
            Task::new(
                LINT_HTML,
                Action::Lint {
                    target: LintTarget::Html,
                    files: paths.html_pages(config),
                    config: paths.lint_config(HTML_LINT_CONFIG),
                },
            )
            .reloads(true),
        )?;
    }

    graph.register_task(Task::new(START_DEV_SERVER, Action::Serve { root: paths.src.clone() }))?;

    let graph = graph.build()?;
    let targets = graph.sinks().into_iter().map(str::to_string).collect();
    Ok(Pipeline { kind: PipelineKind::Watch, graph, targets, rules: rules(config, paths)? })
}

fn rules(config: &ProjectConfig, paths: &Paths) -> Result<Vec<WatchRule>> {
    let options = &config.options;
    let folders = &config.layout.folders;
    let src = &paths.src_rel;

    let mut exclude = Vec::new();
    if let Some(vendors) = folder(&folders.vendors) {
        exclude.push(format!("{src}/{vendors}/**"));
    }
    exclude.push(format!("{src}/{}/**", config.layout.tmp.to_slash_string()));

    let mut rules = Vec::new();

    if let Some(styles) = folder(&folders.styles) {
        rules.push(WatchRule::new(
            "styles",
            vec![format!("{src}/{styles}/**/*.{{css,less,scss,sass,styl}}")],
            exclude.clone(),
            vec![compile_styles(options.css_preprocessor)],
        )?);
    }

    if let (Some(ext), Some(templates)) =
        (options.template_engine.extension(), folder(&folders.templates))
    {
        rules.push(WatchRule::new(
            "templates",
            vec![format!("{src}/{templates}/**/*.{ext}")],
            exclude.clone(),
            vec![COMPILE_TEMPLATES.to_string()],
        )?);
    }

    if let Some(scripts) = folder(&folders.scripts) {
        let task = if options.use_transpiler { TRANSPILE_SCRIPTS } else { LINT_SCRIPTS };
        rules.push(WatchRule::new(
            "scripts",
            vec![format!("{src}/{scripts}/**/*.js")],
            exclude.clone(),
            vec![task.to_string()],
        )?);
    }

    if !options.template_engine.is_active() {
        rules.push(WatchRule::new(
            "html",
            vec![format!("{src}/**/*.html")],
            exclude,
            vec![LINT_HTML.to_string()],
        )?);
    }

    Ok(rules)
}
