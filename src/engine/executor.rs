use std::any::Any;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::ExecutorOptions;
use crate::engine::worker_pool::{Completion, CompletionWait, WorkerPool};
use crate::errors::{DomainFault, ExecutionError};
use crate::graph::{DependencyGraph, TaskValue};
use crate::observability::messages::engine::{
    RunCompleted, RunFailed, RunStarted, TaskCompleted, TaskFailed,
};
use crate::observability::messages::worker::{
    CompletionDiscarded, FailureAbsorbed, WorkerPanicked, WorkersSubmitted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::WorkerFactory;

/// Aggregate result of one executor run.
///
/// On success the error message is absent; on failure it carries the first
/// failing worker's message. Failures past the first are absorbed during
/// the drain and never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub error_message: Option<String>,
}

impl RunOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Drives a dependency graph of tasks to completion over a bounded pool.
///
/// The executor owns the graph for the duration of the run and is its sole
/// mutator: workers only ever receive task values by clone. Each cycle of
/// the driver loop submits the current free frontier (minus everything
/// already submitted), waits for a single completion, and on success removes
/// the completed node — which is what exposes its dependents as newly free.
/// The first failure abandons the run: no further submissions happen,
/// outstanding workers are drained, and their late results are discarded.
///
/// Completion waits are bounded; an elapsed wait just re-evaluates the
/// loop's termination condition. The pool is shut down on every exit path,
/// including the re-raise of a [`DomainFault`](crate::errors::DomainFault).
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use dagrun::engine::GraphExecutor;
/// use dagrun::graph::DependencyGraph;
/// use dagrun::traits::{TaskOutcome, Worker, WorkerFactory};
///
/// struct Echo(String);
///
/// #[async_trait]
/// impl Worker<String> for Echo {
///     async fn call(&self) -> TaskOutcome<String> {
///         TaskOutcome::succeeded(self.0.clone())
///     }
/// }
///
/// struct EchoFactory;
///
/// impl WorkerFactory<String> for EchoFactory {
///     fn create_workers(&self, tasks: Vec<String>) -> Vec<Box<dyn Worker<String>>> {
///         tasks
///             .into_iter()
///             .map(|task| Box::new(Echo(task)) as Box<dyn Worker<String>>)
///             .collect()
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("package".to_string(), "compile".to_string());
///
/// let mut executor = GraphExecutor::new(graph, Box::new(EchoFactory));
/// let outcome = executor.run().await;
///
/// assert!(outcome.success);
/// assert!(executor.graph().is_empty());
/// # }
/// ```
pub struct GraphExecutor<T: TaskValue> {
    graph: DependencyGraph<T>,
    worker_factory: Box<dyn WorkerFactory<T>>,
    options: ExecutorOptions,
}

impl<T: TaskValue> GraphExecutor<T> {
    /// Create an executor with default options over `graph`.
    pub fn new(graph: DependencyGraph<T>, worker_factory: Box<dyn WorkerFactory<T>>) -> Self {
        Self::with_options(graph, worker_factory, ExecutorOptions::default())
    }

    /// Create an executor with explicit options.
    pub fn with_options(
        graph: DependencyGraph<T>,
        worker_factory: Box<dyn WorkerFactory<T>>,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            graph,
            worker_factory,
            options,
        }
    }

    /// The graph in its current state: full before a run, drained to empty
    /// after a fully successful one.
    pub fn graph(&self) -> &DependencyGraph<T> {
        &self.graph
    }

    /// Drive the graph until it drains, or until the first failure.
    pub async fn run(&mut self) -> RunOutcome {
        let started = Instant::now();
        let worker_count = self
            .options
            .worker_count
            .unwrap_or(ExecutorOptions::DEFAULT_WORKER_COUNT)
            .max(1);
        let wait = Duration::from_millis(
            self.options
                .completion_wait_ms
                .unwrap_or(ExecutorOptions::DEFAULT_COMPLETION_WAIT_MS),
        );

        RunStarted {
            node_count: self.graph.node_count(),
            worker_count,
        }
        .log();

        let mut pool: WorkerPool<T> = WorkerPool::new(worker_count);
        let mut running: usize = 0;
        let mut nodes_run: HashSet<T> = HashSet::new();
        let mut new_free: HashSet<T> = self.graph.free_nodes();
        let mut failure: Option<RunOutcome> = None;
        let mut domain_fault: Option<Box<dyn Any + Send>> = None;

        while failure.is_none()
            && domain_fault.is_none()
            && (running > 0 || !new_free.is_empty())
        {
            if !new_free.is_empty() {
                let batch: Vec<T> = new_free.drain().collect();
                let task_count = batch.len();
                nodes_run.extend(batch.iter().cloned());

                let workers = self.worker_factory.create_workers(batch);
                let created = workers.len();
                for worker in workers {
                    match pool.submit(worker) {
                        Ok(()) => running += 1,
                        Err(error) => {
                            failure = Some(RunOutcome::failed(error.to_string()));
                            break;
                        }
                    }
                }
                WorkersSubmitted {
                    task_count,
                    worker_count: created,
                    running,
                }
                .log();
            }

            if failure.is_some() || running == 0 {
                continue;
            }

            match pool.next_completion(wait).await {
                // An elapsed wait is not an error; re-evaluate and wait again.
                CompletionWait::TimedOut => continue,
                CompletionWait::Closed => {
                    failure = Some(RunOutcome::failed(
                        ExecutionError::CompletionStreamClosed {
                            outstanding: running,
                        }
                        .to_string(),
                    ));
                    running = 0;
                }
                CompletionWait::Received(Completion::Finished(outcome)) => {
                    running -= 1;
                    if outcome.success {
                        self.graph.remove_node(&outcome.value);
                        let task = format!("{:?}", outcome.value);
                        TaskCompleted {
                            task: &task,
                            remaining: self.graph.node_count(),
                        }
                        .log();
                        // A task can reappear in the frontier during the
                        // cycle it was submitted in, since removal happens
                        // only on success; nodes_run keeps it from being
                        // submitted twice.
                        new_free = self
                            .graph
                            .free_nodes()
                            .into_iter()
                            .filter(|value| !nodes_run.contains(value))
                            .collect();
                    } else {
                        let message = outcome
                            .error_message
                            .clone()
                            .unwrap_or_else(|| "task failed".to_string());
                        let task = format!("{:?}", outcome.value);
                        TaskFailed {
                            task: &task,
                            message: &message,
                        }
                        .log();
                        new_free.clear();
                        failure = Some(RunOutcome::failed(message));
                    }
                }
                CompletionWait::Received(Completion::Panicked(payload)) => {
                    running -= 1;
                    new_free.clear();
                    if payload.is::<DomainFault>() {
                        domain_fault = Some(payload);
                    } else {
                        let message = panic_message(payload.as_ref());
                        WorkerPanicked { message: &message }.log();
                        failure = Some(RunOutcome::failed(message));
                    }
                }
            }
        }

        // Outstanding workers run to completion, but the run is already
        // abandoning: successes no longer mutate the graph and failures past
        // the first are absorbed.
        while running > 0 {
            match pool.next_completion(wait).await {
                CompletionWait::TimedOut => continue,
                CompletionWait::Closed => break,
                CompletionWait::Received(Completion::Finished(outcome)) => {
                    running -= 1;
                    let task = format!("{:?}", outcome.value);
                    if outcome.success {
                        CompletionDiscarded { task: &task }.log();
                    } else {
                        let message = outcome
                            .error_message
                            .unwrap_or_else(|| "task failed".to_string());
                        FailureAbsorbed {
                            task: &task,
                            message: &message,
                        }
                        .log();
                    }
                }
                CompletionWait::Received(Completion::Panicked(payload)) => {
                    running -= 1;
                    let message = panic_message(payload.as_ref());
                    WorkerPanicked { message: &message }.log();
                }
            }
        }

        pool.shutdown();

        if let Some(payload) = domain_fault {
            if let Some(fault) = payload.downcast_ref::<DomainFault>() {
                RunFailed {
                    message: fault.message(),
                }
                .log();
            }
            std::panic::resume_unwind(payload);
        }

        match failure {
            Some(outcome) => {
                RunFailed {
                    message: outcome.error_message.as_deref().unwrap_or("task failed"),
                }
                .log();
                outcome
            }
            None => {
                RunCompleted {
                    tasks_run: nodes_run.len(),
                    duration: started.elapsed(),
                }
                .log();
                RunOutcome::succeeded()
            }
        }
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
