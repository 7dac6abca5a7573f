use std::path::Path;
use std::sync::Arc;

use crate::collab::assets::{self, Bundles};
use crate::collab::{
    reload_snippet, CommandTools, ContentHasher, FileSystemCopier, FsCopier, ImageOptimizer,
    Linter, Minifier, Sha256Hasher, StaticServer, StyleCompiler, TemplateCompiler, Transpiler,
    VendorInjector,
};
use crate::graph::{Executor, Task};
use crate::pipeline::Action;
use crate::project::ProjectConfig;

/// Output of concatenating plain stylesheets, relative to the style output directory.
const PLAIN_CSS_OUTPUT: &str = "style.css";

/// Every external tool a pipeline needs, in one value.
pub trait Tools:
    StyleCompiler
    + TemplateCompiler
    + Transpiler
    + Linter
    + VendorInjector
    + ImageOptimizer
    + Minifier
    + StaticServer
{
}

impl<T> Tools for T where
    T: StyleCompiler
        + TemplateCompiler
        + Transpiler
        + Linter
        + VendorInjector
        + ImageOptimizer
        + Minifier
        + StaticServer
{
}

/// Runs pipeline actions by dispatching each to the collaborator that owns it.
pub struct Toolbox {
    copier: Arc<dyn FileSystemCopier>,
    styles: Arc<dyn StyleCompiler>,
    templates: Arc<dyn TemplateCompiler>,
    transpiler: Arc<dyn Transpiler>,
    linter: Arc<dyn Linter>,
    vendors: Arc<dyn VendorInjector>,
    images: Arc<dyn ImageOptimizer>,
    minifier: Arc<dyn Minifier>,
    hasher: Arc<dyn ContentHasher>,
    server: Arc<dyn StaticServer>,
}

impl Toolbox {
    /// Uses `tools` for every external step and the native copier and hasher.
    pub fn new<T: Tools + 'static>(tools: T) -> Self {
        let tools = Arc::new(tools);
        Self {
            copier: Arc::new(FsCopier),
            styles: tools.clone(),
            templates: tools.clone(),
            transpiler: tools.clone(),
            linter: tools.clone(),
            vendors: tools.clone(),
            images: tools.clone(),
            minifier: tools.clone(),
            hasher: Arc::new(Sha256Hasher::default()),
            server: tools,
        }
    }

    /// Toolbox running the commands of the project's tool table.
    pub fn for_project(project_dir: &Path, config: &ProjectConfig) -> Self {
        Self::new(CommandTools::new(project_dir, config))
    }
}

impl Executor<Action> for Toolbox {
    fn execute(&self, task: &Task<Action>) -> anyhow::Result<()> {
        match &task.action {
            Action::Clean { dirs } => {
                for dir in dirs {
                    self.copier.remove_dir(dir)?;
                }
            }
            Action::Copy { files, dest } => {
                let copied = self.copier.copy(files, dest)?;
                log::info!("Copied {copied} file(s) to {}", dest.display());
            }
            Action::OptimizeImages { images, dest } => self.images.optimize_images(images, dest)?,
            Action::CompileStyles { preprocessor, entries, out_dir } => {
                if preprocessor.needs_compiler() {
                    self.styles.compile_styles(*preprocessor, entries, out_dir)?;
                } else {
                    assets::concat_styles(entries, &out_dir.join(PLAIN_CSS_OUTPUT))?;
                }
            }
            Action::Transpile { scripts, out_dir } => self.transpiler.transpile(scripts, out_dir)?,
            Action::ResolveVendor { pages, vendor_dir } => {
                self.vendors.inject_vendors(pages, vendor_dir)?
            }
            Action::CompileTemplates { engine, entries, out_dir } => {
                self.templates.compile_templates(*engine, entries, out_dir)?
            }
            Action::InjectAssets { pages, styles, scripts, reload_port } => {
                let snippet = reload_port.map(reload_snippet);
                assets::inject_assets(pages, styles, scripts, snippet.as_deref())?;
            }
            Action::Bundle { pages, dest, manifest, revision_hash } => {
                assets::bundle(
                    pages,
                    dest,
                    manifest,
                    *revision_hash,
                    self.minifier.as_ref(),
                    self.hasher.as_ref(),
                )?;
            }
            Action::Finalize { pages, dest, manifest, absolute_paths } => {
                let bundles = Bundles::load(manifest)?;
                assets::finalize(pages, dest, &bundles, *absolute_paths, self.minifier.as_ref())?;
            }
            Action::Lint { target, files, config } => self.linter.lint(*target, files, config)?,
            Action::Serve { root } => self.server.serve(root)?,
        }
        Ok(())
    }
}
