use std::path::PathBuf;

/// One step of generating a project.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaffoldOperation {
    Write { target: PathBuf, content: String, target_exists: bool },
    CreateDirectory { target: PathBuf, target_exists: bool },
}

impl ScaffoldOperation {
    pub fn target_path(&self) -> &PathBuf {
        match self {
            ScaffoldOperation::Write { target, .. } => target,
            ScaffoldOperation::CreateDirectory { target, .. } => target,
        }
    }

    /// Describes the operation for the log.
    pub fn get_message(&self, dry_run: bool) -> String {
        let prefix = if dry_run { "[DRY RUN] " } else { "" };
        match self {
            ScaffoldOperation::Write { target, target_exists: true, .. } => {
                format!("{prefix}Writing to '{}' (overwriting existing file)", target.display())
            }
            ScaffoldOperation::Write { target, .. } => {
                format!("{prefix}Writing to '{}'", target.display())
            }
            ScaffoldOperation::CreateDirectory { target, target_exists: true } => {
                format!("{prefix}Skipping directory creation '{}' (already exists)", target.display())
            }
            ScaffoldOperation::CreateDirectory { target, .. } => {
                format!("{prefix}Creating directory '{}'", target.display())
            }
        }
    }
}
