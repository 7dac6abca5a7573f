use globset::GlobSet;
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

use crate::collab::build_globset;
use crate::error::Result;

/// Maps changed files to the watch tasks they invalidate.
///
/// Patterns match `/`-separated paths relative to the project directory.
#[derive(Debug, Clone)]
pub struct WatchRule {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub tasks: Vec<String>,
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl WatchRule {
    pub fn new(name: &str, include: Vec<String>, exclude: Vec<String>, tasks: Vec<String>) -> Result<Self> {
        let include_set = build_globset(&include)?;
        let exclude_set = build_globset(&exclude)?;
        Ok(Self { name: name.to_string(), include, exclude, tasks, include_set, exclude_set })
    }

    pub fn matches(&self, relative: &Path) -> bool {
        self.include_set.is_match(relative) && !self.exclude_set.is_match(relative)
    }
}

/// Tasks triggered by a batch of changed paths, deduplicated, in rule order.
pub fn triggered_tasks(rules: &[WatchRule], changed: &[PathBuf]) -> Vec<String> {
    let mut tasks = IndexSet::new();
    for rule in rules {
        if let Some(path) = changed.iter().find(|path| rule.matches(path)) {
            log::debug!("Rule '{}' triggered by {}", rule.name, path.display());
            tasks.extend(rule.tasks.iter().cloned());
        }
    }
    tasks.into_iter().collect()
}
