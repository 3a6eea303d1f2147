use async_trait::async_trait;

/// Outcome of running one worker.
///
/// The `value` field echoes the task identity back to the executor, which
/// uses it to locate the corresponding graph entry — no submission-order
/// bookkeeping is needed on the executor side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome<T> {
    pub success: bool,
    pub error_message: Option<String>,
    pub value: T,
}

impl<T> TaskOutcome<T> {
    /// Successful outcome for `value`
    pub fn succeeded(value: T) -> Self {
        Self {
            success: true,
            error_message: None,
            value,
        }
    }

    /// Failed outcome for `value`, carrying the reason
    pub fn failed(value: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            value,
        }
    }
}

/// One executable unit of work wrapping a single task value.
///
/// Workers are produced by a [`WorkerFactory`] from the runnable frontier
/// and run on the executor's bounded pool. A worker reports cleanly through
/// its [`TaskOutcome`]; panicking instead is treated as a worker fault (see
/// [`DomainFault`](crate::errors::DomainFault) for the one panic kind that
/// propagates to the caller unchanged).
#[async_trait]
pub trait Worker<T>: Send + Sync {
    /// Execute the unit of work and report its outcome.
    async fn call(&self) -> TaskOutcome<T>;

    /// Scheduling hint for future refinement.
    ///
    /// Part of the public contract, but not consulted by the current
    /// scheduler: all free tasks of a cycle are submitted together.
    fn priority(&self) -> i32 {
        0
    }
}

/// Converts a batch of runnable task values into workers.
///
/// The factory owns the mapping from task identity to executable work; the
/// executor never inspects task values itself. A factory is free to emit
/// fewer or more workers than it was handed tasks — it may coalesce several
/// tasks into one worker or fan a task out into several. The executor
/// tracks in-flight work by the number of workers actually submitted, and
/// maps completions back to the graph through each outcome's `value`.
pub trait WorkerFactory<T>: Send + Sync {
    fn create_workers(&self, tasks: Vec<T>) -> Vec<Box<dyn Worker<T>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(u32);

    #[async_trait]
    impl Worker<u32> for Constant {
        async fn call(&self) -> TaskOutcome<u32> {
            TaskOutcome::succeeded(self.0)
        }
    }

    #[test]
    fn outcome_constructors_set_the_flag_and_message() {
        let ok = TaskOutcome::succeeded("a");
        assert!(ok.success);
        assert_eq!(ok.error_message, None);
        assert_eq!(ok.value, "a");

        let failed = TaskOutcome::failed("b", "boom");
        assert!(!failed.success);
        assert_eq!(failed.error_message.as_deref(), Some("boom"));
        assert_eq!(failed.value, "b");
    }

    #[tokio::test]
    async fn priority_defaults_to_zero() {
        let worker = Constant(7);
        assert_eq!(worker.priority(), 0);
        assert_eq!(worker.call().await, TaskOutcome::succeeded(7));
    }
}
