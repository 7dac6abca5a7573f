//! Dependency graph of named tasks.
//!
//! Tasks are registered on a [`TaskGraphBuilder`]; [`TaskGraphBuilder::build`]
//! resolves every dependency name and rejects cycles, so a [`TaskGraph`]
//! is always runnable. Execution is sequential, in topological order with
//! ties broken by registration order.

mod cancel;
mod report;
mod task;

pub use cancel::CancelToken;
pub use report::{RunReport, TaskStatus};
pub use task::{Executor, Task};

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt::Display;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;

use crate::error::{Error, Result};

/// Collects tasks before they are wired into a [`TaskGraph`].
#[derive(Debug)]
pub struct TaskGraphBuilder<A> {
    tasks: IndexMap<String, Task<A>>,
}

impl<A> Default for TaskGraphBuilder<A> {
    fn default() -> Self {
        Self { tasks: IndexMap::new() }
    }
}

impl<A> TaskGraphBuilder<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task. Dependency names are resolved later, in [`Self::build`].
    ///
    /// # Errors
    /// * `DuplicateTask` - a task with the same name is already registered
    pub fn register<I, S>(
        &mut self,
        name: &str,
        depends_on: I,
        enabled: bool,
        action: A,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_task(Task::new(name, action).after(depends_on).enabled(enabled))
    }

    pub fn register_task(&mut self, task: Task<A>) -> Result<&mut Self> {
        if self.tasks.contains_key(&task.name) {
            return Err(Error::DuplicateTask { name: task.name });
        }
        log::trace!("Registered task '{}' after {:?}", task.name, task.depends_on);
        self.tasks.insert(task.name.clone(), task);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Resolves dependencies and checks the graph for cycles.
    ///
    /// # Errors
    /// * `UnknownDependency` - a task names a dependency that was never registered
    /// * `CycleDetected` - the dependencies form a cycle; the error names its tasks
    pub fn build(self) -> Result<TaskGraph<A>> {
        let mut graph = DiGraph::with_capacity(self.tasks.len(), self.tasks.len());
        let mut index = IndexMap::with_capacity(self.tasks.len());
        for (name, task) in self.tasks {
            let node = graph.add_node(task);
            index.insert(name, node);
        }

        let mut edges = Vec::new();
        for node in graph.node_indices() {
            let task = &graph[node];
            for dependency in &task.depends_on {
                let Some(&dep) = index.get(dependency) else {
                    return Err(Error::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dependency.clone(),
                    });
                };
                edges.push((dep, node));
            }
        }
        for (dep, node) in edges {
            graph.add_edge(dep, node, ());
        }

        let order = topological_order(&graph)?;
        Ok(TaskGraph { graph, index, order })
    }
}

/// Kahn's algorithm with a min-heap on node index, which is registration order.
fn topological_order<A>(graph: &DiGraph<Task<A>, ()>) -> Result<Vec<NodeIndex>> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.neighbors_directed(node, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(i)) = ready.pop() {
        let node = NodeIndex::new(i);
        order.push(node);
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.push(Reverse(next.index()));
            }
        }
    }

    if order.len() == graph.node_count() {
        Ok(order)
    } else {
        let done: HashSet<NodeIndex> = order.into_iter().collect();
        Err(Error::CycleDetected { tasks: find_cycle(graph, &done) })
    }
}

/// Every node Kahn's algorithm left behind still has an unprocessed
/// dependency, so walking those dependencies must revisit a node.
fn find_cycle<A>(graph: &DiGraph<Task<A>, ()>, done: &HashSet<NodeIndex>) -> Vec<String> {
    let Some(mut current) = graph.node_indices().find(|node| !done.contains(node)) else {
        return Vec::new();
    };
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut seen: HashMap<NodeIndex, usize> = HashMap::new();

    loop {
        if let Some(&start) = seen.get(&current) {
            let mut cycle: Vec<String> =
                path[start..].iter().map(|node| graph[*node].name.clone()).collect();
            cycle.push(graph[current].name.clone());
            return cycle;
        }
        seen.insert(current, path.len());
        path.push(current);

        let next = graph
            .neighbors_directed(current, Direction::Incoming)
            .filter(|dep| !done.contains(dep))
            .min();
        match next {
            Some(next) => current = next,
            None => return path.iter().map(|node| graph[*node].name.clone()).collect(),
        }
    }
}

/// An acyclic, immutable set of tasks ready to run.
#[derive(Debug)]
pub struct TaskGraph<A> {
    graph: DiGraph<Task<A>, ()>,
    index: IndexMap<String, NodeIndex>,
    order: Vec<NodeIndex>,
}

impl<A> TaskGraph<A> {
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn task(&self, name: &str) -> Option<&Task<A>> {
        self.index.get(name).map(|node| &self.graph[*node])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tasks in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task<A>> {
        self.graph.node_indices().map(move |node| &self.graph[node])
    }

    /// Task names in execution order.
    pub fn execution_order(&self) -> Vec<&str> {
        self.order.iter().map(|node| self.graph[*node].name.as_str()).collect()
    }

    /// Tasks nothing else depends on.
    pub fn sinks(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|node| self.graph.neighbors_directed(*node, Direction::Outgoing).next().is_none())
            .map(|node| self.graph[node].name.as_str())
            .collect()
    }

    /// Names of the tasks that depend on `name`, directly or transitively.
    pub fn dependents(&self, name: &str) -> Result<Vec<&str>> {
        let start = self.lookup(name)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut found = HashSet::new();
        while let Some(node) = dfs.next(&self.graph) {
            if node != start {
                found.insert(node);
            }
        }
        Ok(self.names_in_order(&found))
    }

    /// Runs `target` and everything it depends on.
    pub fn run<E: Executor<A>>(&self, target: &str, executor: &E) -> Result<RunReport> {
        self.run_targets(&[target], executor, &CancelToken::new())
    }

    /// Runs the targets and the transitive closure of their dependencies,
    /// each task at most once.
    ///
    /// # Errors
    /// * `UnknownTask` - a target is not part of the graph
    ///
    /// Task failures are never returned as errors; they are recorded in the
    /// [`RunReport`].
    pub fn run_targets<E: Executor<A>>(
        &self,
        targets: &[&str],
        executor: &E,
        cancel: &CancelToken,
    ) -> Result<RunReport> {
        let mut selected = HashSet::new();
        for target in targets {
            let start = self.lookup(target)?;
            let reversed = Reversed(&self.graph);
            let mut dfs = Dfs::new(reversed, start);
            while let Some(node) = dfs.next(reversed) {
                selected.insert(node);
            }
        }
        Ok(self.execute(&selected, executor, cancel))
    }

    /// Runs the named tasks and every task downstream of them. Dependencies
    /// outside that set are assumed satisfied by an earlier run.
    pub fn rerun<E: Executor<A>>(
        &self,
        tasks: &[&str],
        executor: &E,
        cancel: &CancelToken,
    ) -> Result<RunReport> {
        let mut selected = HashSet::new();
        for name in tasks {
            let start = self.lookup(name)?;
            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(node) = dfs.next(&self.graph) {
                selected.insert(node);
            }
        }
        Ok(self.execute(&selected, executor, cancel))
    }

    /// Whether a completed task in the report asked for a browser reload.
    pub fn wants_reload(&self, report: &RunReport) -> bool {
        report.iter().any(|(name, status)| {
            *status == TaskStatus::Completed && self.task(name).is_some_and(|task| task.notify_reload)
        })
    }

    fn lookup(&self, name: &str) -> Result<NodeIndex> {
        self.index.get(name).copied().ok_or_else(|| Error::UnknownTask { name: name.to_string() })
    }

    fn names_in_order(&self, nodes: &HashSet<NodeIndex>) -> Vec<&str> {
        self.order
            .iter()
            .filter(|node| nodes.contains(node))
            .map(|node| self.graph[*node].name.as_str())
            .collect()
    }

    fn execute<E: Executor<A>>(
        &self,
        selected: &HashSet<NodeIndex>,
        executor: &E,
        cancel: &CancelToken,
    ) -> RunReport {
        let mut report = RunReport::default();

        for node in self.order.iter().filter(|node| selected.contains(node)) {
            let task = &self.graph[*node];

            let blocker = task.depends_on.iter().find(|dep| {
                report.status(dep).is_some_and(|status| !status.is_satisfied())
            });

            let status = if cancel.is_cancelled() {
                TaskStatus::Cancelled
            } else if let Some(dependency) = blocker {
                log::warn!("Task '{}' blocked by '{dependency}'", task.name);
                TaskStatus::Blocked { dependency: dependency.clone() }
            } else if !task.enabled {
                log::debug!("Skipping disabled task '{}'", task.name);
                TaskStatus::SkippedDisabled
            } else {
                log::info!("Running '{}'", task.name);
                match executor.execute(task) {
                    Ok(()) => TaskStatus::Completed,
                    Err(err) => {
                        log::error!("Task '{}' failed: {err:#}", task.name);
                        TaskStatus::Failed(format!("{err:#}"))
                    }
                }
            };
            report.record(&task.name, status);
        }

        report
    }
}

/// Renders the graph as a Mermaid flowchart.
impl<A> Display for TaskGraph<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "graph LR")?;

        for node in self.graph.node_indices() {
            let task = &self.graph[node];
            let name = task.name.replace('"', "\\\"");
            if task.enabled {
                writeln!(f, "    {}[\"{}\"]", node.index(), name)?;
            } else {
                writeln!(f, "    {}[\"{} (disabled)\"]", node.index(), name)?;
            }
        }

        for edge in self.graph.raw_edges() {
            writeln!(f, "    {} --> {}", edge.source().index(), edge.target().index())?;
        }

        Ok(())
    }
}
