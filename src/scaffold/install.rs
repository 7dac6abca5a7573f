use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::options::OptionSet;

/// Installs the generated project's npm packages and, with helper
/// libraries, its bower components.
pub fn install_dependencies(project_dir: &Path, options: &OptionSet) -> Result<()> {
    run_installer(project_dir, "npm", &["install"])?;
    if options.include_helper_libs {
        run_installer(project_dir, "npx", &["bower", "install"])?;
    }
    Ok(())
}

fn run_installer(project_dir: &Path, program: &str, args: &[&str]) -> Result<()> {
    let command_line = format!("{program} {}", args.join(" "));
    log::info!("Running '{command_line}' in {}", project_dir.display());
    let status = Command::new(program).args(args).current_dir(project_dir).status()?;
    if !status.success() {
        return Err(Error::ToolExecutionError { tool: command_line, status });
    }
    Ok(())
}
