use indexmap::IndexMap;
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::collab::{
    AssetKind, FileSet, ImageOptimizer, LintTarget, Linter, Minifier, StaticServer,
    StyleCompiler, TemplateCompiler, Transpiler, VendorInjector,
};
use crate::constants::{tools, INPUTS_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::options::{CssPreprocessor, TemplateEngine};
use crate::project::{ProjectConfig, ToolCommand};
use crate::renderer::{get_template_engine, MiniJinjaRenderer, TemplateRenderer};

/// Runs the external programs of the project's tool table.
///
/// Commands run with the project directory as working directory. Every
/// argument is rendered as a template with `input`, `output`, `output_dir`,
/// `config`, `vendor_dir`, `root`, `browsers` and `project_dir` in scope.
pub struct CommandTools {
    project_dir: PathBuf,
    tools: IndexMap<String, ToolCommand>,
    browsers: Vec<String>,
    renderer: MiniJinjaRenderer,
    background: Mutex<Vec<Child>>,
}

impl CommandTools {
    pub fn new(project_dir: impl Into<PathBuf>, config: &ProjectConfig) -> Self {
        Self {
            project_dir: project_dir.into(),
            tools: config.tools.clone(),
            browsers: config.browsers.clone(),
            renderer: get_template_engine(),
            background: Mutex::new(Vec::new()),
        }
    }

    pub fn is_configured(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    fn tool(&self, name: &str) -> Result<&ToolCommand> {
        self.tools.get(name).ok_or_else(|| Error::ToolNotConfigured { tool: name.to_string() })
    }

    fn command(&self, name: &str, context: &Value, inputs: &[PathBuf]) -> Result<Command> {
        let tool = self.tool(name)?;

        let mut merged = json!({
            "project_dir": self.project_dir.to_str_checked()?,
            "browsers": self.browsers.join(", "),
        });
        if let (Some(base), Some(extra)) = (merged.as_object_mut(), context.as_object()) {
            base.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let mut args = Vec::with_capacity(tool.args.len() + inputs.len());
        for arg in &tool.args {
            if arg.trim() == INPUTS_PLACEHOLDER {
                for input in inputs {
                    args.push(input.to_str_checked()?.to_string());
                }
            } else {
                args.push(self.renderer.render(arg, &merged, Some(name))?);
            }
        }

        log::debug!("Tool '{name}': {} {}", tool.program, args.join(" "));
        let mut command = Command::new(&tool.program);
        command.args(&args).current_dir(&self.project_dir);
        for (key, value) in &tool.env {
            command.env(key, self.renderer.render(value, &merged, Some(name))?);
        }
        Ok(command)
    }

    /// Runs a tool to completion.
    pub fn run(&self, name: &str, context: &Value, inputs: &[PathBuf]) -> Result<()> {
        let status = self.command(name, context, inputs)?.stdin(Stdio::null()).status()?;
        if !status.success() {
            return Err(Error::ToolExecutionError { tool: name.to_string(), status });
        }
        Ok(())
    }

    /// Feeds `input` to the tool's stdin and returns its stdout.
    pub fn pipe(&self, name: &str, context: &Value, input: &str) -> Result<String> {
        let mut child = self
            .command(name, context, &[])?
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_string();
            std::thread::spawn(move || {
                if let Err(e) = stdin.write_all(input.as_bytes()) {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        log::warn!("Failed to write tool stdin: {e}");
                    }
                }
            })
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            if writer.join().is_err() {
                log::warn!("Tool '{name}' stdin writer panicked");
            }
        }
        if !output.status.success() {
            return Err(Error::ToolExecutionError { tool: name.to_string(), status: output.status });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Starts a long-running tool. It is killed when `self` is dropped.
    pub fn spawn(&self, name: &str, context: &Value) -> Result<()> {
        let child = self.command(name, context, &[])?.stdin(Stdio::null()).spawn()?;
        log::info!("Started '{name}' (pid {})", child.id());
        match self.background.lock() {
            Ok(mut children) => children.push(child),
            Err(poisoned) => poisoned.into_inner().push(child),
        }
        Ok(())
    }

    /// Runs `name` once per file of `entries`, writing below `out_dir` with
    /// the same relative path and the extension `ext`.
    fn run_per_file(&self, name: &str, entries: &FileSet, out_dir: &Path, ext: &str) -> Result<usize> {
        let files = entries.relative_files()?;
        for relative in &files {
            let input = entries.root.join(relative);
            let output = out_dir.join(relative).with_extension(ext);
            let output_dir = output.parent().unwrap_or(out_dir);
            std::fs::create_dir_all(output_dir)?;
            let context = json!({
                "input": input.to_str_checked()?,
                "output": output.to_str_checked()?,
                "output_dir": output_dir.to_str_checked()?,
            });
            self.run(name, &context, &[])?;
        }
        Ok(files.len())
    }
}

impl Drop for CommandTools {
    fn drop(&mut self) {
        let children = match self.background.get_mut() {
            Ok(children) => children,
            Err(poisoned) => poisoned.into_inner(),
        };
        for child in children.iter_mut() {
            if let Err(e) = child.kill() {
                log::debug!("Failed to stop background tool: {e}");
            }
            if let Err(e) = child.wait() {
                log::debug!("Failed to reap background tool: {e}");
            }
        }
    }
}

impl StyleCompiler for CommandTools {
    fn compile_styles(
        &self,
        preprocessor: CssPreprocessor,
        entries: &FileSet,
        out_dir: &Path,
    ) -> anyhow::Result<()> {
        let name = match preprocessor {
            CssPreprocessor::Css => anyhow::bail!("plain CSS is not compiled by an external tool"),
            CssPreprocessor::Less => tools::COMPILE_LESS,
            CssPreprocessor::Sass => tools::COMPILE_SASS,
            CssPreprocessor::Stylus => tools::COMPILE_STYLUS,
        };
        let count = self.run_per_file(name, entries, out_dir, "css")?;
        log::info!("Compiled {count} {preprocessor} stylesheet(s)");
        Ok(())
    }
}

impl TemplateCompiler for CommandTools {
    fn compile_templates(
        &self,
        engine: TemplateEngine,
        entries: &FileSet,
        out_dir: &Path,
    ) -> anyhow::Result<()> {
        let name = match engine {
            TemplateEngine::None => anyhow::bail!("no template engine selected"),
            TemplateEngine::Jade => tools::COMPILE_JADE,
        };
        let count = self.run_per_file(name, entries, out_dir, "html")?;
        log::info!("Compiled {count} {engine} template(s)");
        Ok(())
    }
}

impl Transpiler for CommandTools {
    fn transpile(&self, scripts: &FileSet, out_dir: &Path) -> anyhow::Result<()> {
        let count = self.run_per_file(tools::TRANSPILE, scripts, out_dir, "js")?;
        log::info!("Transpiled {count} script(s)");
        Ok(())
    }
}

impl Linter for CommandTools {
    fn lint(&self, target: LintTarget, files: &FileSet, config: &Path) -> anyhow::Result<()> {
        let name = match target {
            LintTarget::Styles => tools::LINT_STYLES,
            LintTarget::Scripts => tools::LINT_SCRIPTS,
            LintTarget::Html => tools::LINT_HTML,
        };
        if !self.is_configured(name) {
            log::warn!("No '{name}' tool configured, skipping lint");
            return Ok(());
        }
        let inputs = files.files()?;
        if inputs.is_empty() {
            log::debug!("Nothing to lint for '{name}'");
            return Ok(());
        }
        self.run(name, &json!({ "config": config.to_str_checked()? }), &inputs)?;
        Ok(())
    }
}

impl VendorInjector for CommandTools {
    fn inject_vendors(&self, pages: &FileSet, vendor_dir: &Path) -> anyhow::Result<()> {
        for page in pages.files()? {
            let context = json!({
                "input": page.to_str_checked()?,
                "vendor_dir": vendor_dir.to_str_checked()?,
            });
            self.run(tools::WIREDEP, &context, &[])?;
        }
        Ok(())
    }
}

impl ImageOptimizer for CommandTools {
    fn optimize_images(&self, images: &FileSet, dest: &Path) -> anyhow::Result<()> {
        if !self.is_configured(tools::OPTIMIZE_IMAGES) {
            log::warn!("No '{}' tool configured, copying images as they are", tools::OPTIMIZE_IMAGES);
            for relative in images.relative_files()? {
                let target = dest.join(&relative);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(images.root.join(&relative), &target)?;
            }
            return Ok(());
        }
        for relative in images.relative_files()? {
            let input = images.root.join(&relative);
            let output_dir = dest.join(&relative);
            let output_dir = output_dir.parent().unwrap_or(dest);
            std::fs::create_dir_all(output_dir)?;
            let context = json!({
                "input": input.to_str_checked()?,
                "output_dir": output_dir.to_str_checked()?,
            });
            self.run(tools::OPTIMIZE_IMAGES, &context, &[])?;
        }
        Ok(())
    }
}

impl Minifier for CommandTools {
    fn minify(&self, kind: AssetKind, source: &str) -> anyhow::Result<String> {
        let name = match kind {
            AssetKind::Css => tools::MINIFY_CSS,
            AssetKind::Js => tools::MINIFY_JS,
            AssetKind::Html => tools::MINIFY_HTML,
        };
        if !self.is_configured(name) {
            log::debug!("No '{name}' tool configured, leaving {kind:?} unminified");
            return Ok(source.to_string());
        }
        Ok(self.pipe(name, &json!({}), source)?)
    }
}

impl StaticServer for CommandTools {
    fn serve(&self, root: &Path) -> anyhow::Result<()> {
        if !self.is_configured(tools::SERVE) {
            log::warn!("No '{}' tool configured, not serving {}", tools::SERVE, root.display());
            return Ok(());
        }
        self.spawn(tools::SERVE, &json!({ "root": root.to_str_checked()? }))?;
        Ok(())
    }
}
