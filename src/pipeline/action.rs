use std::path::PathBuf;

use crate::collab::{FileSet, LintTarget};
use crate::options::{CssPreprocessor, TemplateEngine};

/// What a pipeline task does. Paths are resolved against the project
/// directory when the pipeline is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Clean { dirs: Vec<PathBuf> },
    Copy { files: FileSet, dest: PathBuf },
    OptimizeImages { images: FileSet, dest: PathBuf },
    CompileStyles { preprocessor: CssPreprocessor, entries: FileSet, out_dir: PathBuf },
    Transpile { scripts: FileSet, out_dir: PathBuf },
    ResolveVendor { pages: FileSet, vendor_dir: PathBuf },
    CompileTemplates { engine: TemplateEngine, entries: FileSet, out_dir: PathBuf },
    InjectAssets { pages: FileSet, styles: FileSet, scripts: FileSet, reload_port: Option<u16> },
    Bundle { pages: FileSet, dest: PathBuf, manifest: PathBuf, revision_hash: bool },
    Finalize { pages: FileSet, dest: PathBuf, manifest: PathBuf, absolute_paths: bool },
    Lint { target: LintTarget, files: FileSet, config: PathBuf },
    Serve { root: PathBuf },
}
