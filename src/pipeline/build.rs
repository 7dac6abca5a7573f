use crate::collab::FileSet;
use crate::constants::layout::BUNDLE_MANIFEST;
use crate::error::Result;
use crate::graph::TaskGraphBuilder;
use crate::pipeline::names::*;
use crate::pipeline::{Action, Paths, Pipeline, PipelineKind};
use crate::project::{folder, ProjectConfig};

/// Production build. Registration order is the default execution order;
/// every task that reads sources runs after `clean`.
pub(super) fn assemble(config: &ProjectConfig, paths: &Paths, absolute_paths: bool) -> Result<Pipeline> {
    let options = &config.options;
    let folders = &config.layout.folders;
    let mut graph = TaskGraphBuilder::new();

    graph.register(
        CLEAN,
        Vec::<String>::new(),
        true,
        Action::Clean { dirs: vec![paths.dist.clone(), paths.tmp.clone()] },
    )?;

    graph.register(
        COPY_STATIC_FILES,
        [CLEAN],
        !config.copy_files.is_empty(),
        Action::Copy {
            files: FileSet::new(&paths.src, config.copy_files.iter().cloned()),
            dest: paths.dist.clone(),
        },
    )?;

    let fonts = folder(&folders.fonts);
    graph.register(
        COPY_FONTS,
        [CLEAN],
        fonts.is_some(),
        Action::Copy {
            files: FileSet::new(
                &paths.src,
                fonts.map(|fonts| format!("{fonts}/**/*.{{eot,svg,ttf,woff,woff2}}")),
            ),
            dest: paths.dist.clone(),
        },
    )?;

    let image_folders = folders.image_folders();
    graph.register(
        OPTIMIZE_IMAGES,
        [CLEAN],
        !image_folders.is_empty(),
        Action::OptimizeImages {
            images: FileSet::new(
                &paths.src,
                image_folders.iter().map(|dir| format!("{dir}/**/*.{{jpg,jpeg,png,gif,svg}}")),
            ),
            dest: paths.dist.clone(),
        },
    )?;

    let style_task = compile_styles(options.css_preprocessor);
    graph.register(
        &style_task,
        [CLEAN],
        folder(&folders.styles).is_some(),
        Action::CompileStyles {
            preprocessor: options.css_preprocessor,
            entries: paths.style_entries(config),
            out_dir: paths.tmp.clone(),
        },
    )?;

    let mut inject_deps = vec![style_task];

    if options.use_transpiler {
        graph.register(
            TRANSPILE_SCRIPTS,
            [CLEAN],
            true,
            Action::Transpile {
                scripts: paths.scripts(config),
                out_dir: paths.transpiled_scripts_dir(config),
            },
        )?;
        inject_deps.push(TRANSPILE_SCRIPTS.to_string());
    }

    let mut template_deps = vec![CLEAN.to_string()];
    if options.include_helper_libs {
        let vendor_dir = paths.vendor_dir(config);
        graph.register(
            RESOLVE_VENDOR_DEPENDENCIES,
            [CLEAN],
            vendor_dir.is_some(),
            Action::ResolveVendor {
                pages: paths.vendor_pages(config),
                vendor_dir: vendor_dir.unwrap_or_else(|| paths.src.clone()),
            },
        )?;
        inject_deps.push(RESOLVE_VENDOR_DEPENDENCIES.to_string());
        template_deps.push(RESOLVE_VENDOR_DEPENDENCIES.to_string());
    }

    if let Some(entries) = paths.template_entries(config) {
        graph.register(
            COMPILE_TEMPLATES,
            template_deps,
            true,
            Action::CompileTemplates {
                engine: options.template_engine,
                entries,
                out_dir: paths.src.clone(),
            },
        )?;
        inject_deps.push(COMPILE_TEMPLATES.to_string());
    }

    graph.register(
        INJECT_ASSET_REFERENCES,
        inject_deps,
        true,
        Action::InjectAssets {
            pages: paths.html_pages(config),
            styles: FileSet::new(&paths.tmp, ["**/*.css"]),
            scripts: paths.served_scripts(config),
            reload_port: None,
        },
    )?;

    let manifest = paths.tmp.join(BUNDLE_MANIFEST);
    graph.register(
        CONCATENATE_AND_MINIFY,
        [INJECT_ASSET_REFERENCES],
        true,
        Action::Bundle {
            pages: paths.html_pages(config),
            dest: paths.dist.clone(),
            manifest: manifest.clone(),
            revision_hash: options.revision_hash_assets,
        },
    )?;

    graph.register(
        MINIFY_HTML_AND_FINALIZE,
        [COPY_STATIC_FILES, COPY_FONTS, OPTIMIZE_IMAGES, CONCATENATE_AND_MINIFY],
        true,
        Action::Finalize {
            pages: paths.html_pages(config),
            dest: paths.dist.clone(),
            manifest,
            absolute_paths,
        },
    )?;

    Ok(Pipeline {
        kind: PipelineKind::Build,
        graph: graph.build()?,
        targets: vec![MINIFY_HTML_AND_FINALIZE.to_string()],
        rules: Vec::new(),
    })
}
