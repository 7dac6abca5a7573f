use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// Shared flag that stops a run from scheduling further tasks.
///
/// The task in flight when the flag is raised finishes normally; every task
/// that has not started yet is reported as cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raises the flag on Ctrl-C. Only one handler may exist per process.
    pub fn cancel_on_interrupt(&self) -> Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            log::warn!("Interrupt received, stopping after the current task");
            token.cancel();
        })
        .map_err(|e| anyhow::anyhow!("Failed to install Ctrl-C handler: {e}"))?;
        Ok(())
    }
}
