//! Interfaces to the tools a pipeline drives, and the adapters shipped with lander.
//!
//! Each trait covers one concern of a front-end build. [`CommandTools`] runs
//! the external programs configured in the project's tool table; the other
//! adapters are native.

pub mod assets;
mod command;
mod fileset;
mod fs;
mod hasher;
mod reload;
mod watcher;

pub use command::CommandTools;
pub use fileset::{build_globset, FileSet};
pub use fs::FsCopier;
pub use hasher::Sha256Hasher;
pub use reload::{reload_snippet, WebSocketReloadServer};
pub use watcher::NotifyWatcher;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::options::{CssPreprocessor, TemplateEngine};

/// Kind of asset handed to a [`Minifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Css,
    Js,
    Html,
}

/// What a [`Linter`] is checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintTarget {
    Styles,
    Scripts,
    Html,
}

pub trait FileSystemCopier {
    /// Removes a directory tree. A missing directory is not an error.
    fn remove_dir(&self, dir: &Path) -> anyhow::Result<()>;

    /// Copies every selected file to `dest`, keeping its path relative to the
    /// file set root. Returns the number of files copied.
    fn copy(&self, files: &FileSet, dest: &Path) -> anyhow::Result<usize>;
}

pub trait StyleCompiler {
    /// Compiles every entry stylesheet into a `.css` file below `out_dir`.
    fn compile_styles(
        &self,
        preprocessor: CssPreprocessor,
        entries: &FileSet,
        out_dir: &Path,
    ) -> anyhow::Result<()>;
}

pub trait TemplateCompiler {
    /// Compiles every entry template into an `.html` file below `out_dir`.
    fn compile_templates(
        &self,
        engine: TemplateEngine,
        entries: &FileSet,
        out_dir: &Path,
    ) -> anyhow::Result<()>;
}

pub trait Transpiler {
    fn transpile(&self, scripts: &FileSet, out_dir: &Path) -> anyhow::Result<()>;
}

pub trait Linter {
    /// Fails when the linter reports problems.
    fn lint(&self, target: LintTarget, files: &FileSet, config: &Path) -> anyhow::Result<()>;
}

pub trait VendorInjector {
    /// Writes references to the installed vendor libraries into each page.
    fn inject_vendors(&self, pages: &FileSet, vendor_dir: &Path) -> anyhow::Result<()>;
}

pub trait ImageOptimizer {
    fn optimize_images(&self, images: &FileSet, dest: &Path) -> anyhow::Result<()>;
}

pub trait Minifier {
    fn minify(&self, kind: AssetKind, source: &str) -> anyhow::Result<String>;
}

pub trait ContentHasher {
    /// Short, filename-safe digest of `contents`.
    fn hash(&self, contents: &[u8]) -> String;
}

/// Source of file change notifications.
pub trait FileWatchTrigger {
    fn watch(&mut self, root: &Path) -> Result<()>;

    /// Waits up to `timeout` for a batch of changed paths. An empty batch
    /// means nothing changed in time.
    fn poll_changes(&mut self, timeout: Duration) -> Result<Vec<PathBuf>>;
}

pub trait StaticServer {
    /// Serves `root` over HTTP in the background until the server is dropped.
    fn serve(&self, root: &Path) -> anyhow::Result<()>;
}

pub trait LiveReloadServer {
    /// Starts accepting browser connections. Returns the bound port.
    fn start(&self) -> anyhow::Result<u16>;

    /// Tells every connected browser to reload.
    fn reload(&self);
}
