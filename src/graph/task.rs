use indexmap::IndexSet;

/// A named unit of work in a [`TaskGraph`](crate::graph::TaskGraph).
///
/// Dependencies are fixed once the task is registered. A disabled task still
/// occupies its node so dependents can resolve it, but its action never runs.
#[derive(Debug, Clone)]
pub struct Task<A> {
    pub name: String,
    pub depends_on: IndexSet<String>,
    pub enabled: bool,
    /// Completing this task asks connected browsers to reload.
    pub notify_reload: bool,
    pub action: A,
}

impl<A> Task<A> {
    pub fn new(name: impl Into<String>, action: A) -> Self {
        Self {
            name: name.into(),
            depends_on: IndexSet::new(),
            enabled: true,
            notify_reload: false,
            action,
        }
    }

    pub fn after<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn reloads(mut self, notify_reload: bool) -> Self {
        self.notify_reload = notify_reload;
        self
    }
}

/// Runs the action of a task.
///
/// Failures are reported back as a task status, never propagated out of a run.
pub trait Executor<A> {
    fn execute(&self, task: &Task<A>) -> anyhow::Result<()>;
}

impl<A, F> Executor<A> for F
where
    F: Fn(&Task<A>) -> anyhow::Result<()>,
{
    fn execute(&self, task: &Task<A>) -> anyhow::Result<()> {
        self(task)
    }
}
