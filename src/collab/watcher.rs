use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};

use crate::collab::FileWatchTrigger;
use crate::error::{Error, Result};

/// Debounced recursive filesystem watcher.
pub struct NotifyWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    events: Receiver<DebounceEventResult>,
}

impl NotifyWatcher {
    pub fn new(debounce: Duration) -> Result<Self> {
        let (tx, events) = channel();
        let debouncer = new_debouncer(debounce, None, tx)?;
        Ok(Self { debouncer, events })
    }
}

impl FileWatchTrigger for NotifyWatcher {
    fn watch(&mut self, root: &Path) -> Result<()> {
        log::info!("Watching {}", root.display());
        self.debouncer.watch(root, RecursiveMode::Recursive)?;
        Ok(())
    }

    fn poll_changes(&mut self, timeout: Duration) -> Result<Vec<PathBuf>> {
        match self.events.recv_timeout(timeout) {
            Ok(Ok(events)) => {
                let paths: BTreeSet<PathBuf> =
                    events.into_iter().flat_map(|de| de.event.paths).collect();
                log::debug!("{} path(s) changed", paths.len());
                Ok(paths.into_iter().collect())
            }
            Ok(Err(errors)) => {
                for e in errors {
                    log::error!("Watch error: {e}");
                }
                Ok(Vec::new())
            }
            Err(RecvTimeoutError::Timeout) => Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::Other(anyhow::anyhow!("file watcher stopped")))
            }
        }
    }
}
