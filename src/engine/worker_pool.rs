use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::time::timeout;

use crate::errors::ExecutionError;
use crate::graph::TaskValue;
use crate::traits::{TaskOutcome, Worker};

/// One finished unit of work drained from the completion stream.
pub enum Completion<T> {
    /// The worker ran to completion and returned an outcome
    Finished(TaskOutcome<T>),
    /// The worker panicked; the payload is carried for inspection
    Panicked(Box<dyn Any + Send + 'static>),
}

impl<T: fmt::Debug> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Finished(outcome) => f.debug_tuple("Finished").field(outcome).finish(),
            Completion::Panicked(_) => f.write_str("Panicked(..)"),
        }
    }
}

/// Result of one bounded wait on the completion stream.
#[derive(Debug)]
pub enum CompletionWait<T> {
    /// A completion arrived within the wait
    Received(Completion<T>),
    /// The wait elapsed with nothing to consume; not an error
    TimedOut,
    /// The stream closed; only possible once the pool itself is gone
    Closed,
}

/// Bounded worker pool with a completion stream in finish order.
///
/// Submissions spawn the worker onto the runtime immediately, but a
/// semaphore permit acquired inside each worker task caps the number of
/// *executing* workers at the pool width; excess submissions queue on the
/// permits. A forwarder task per worker awaits its join handle and pushes
/// the result — outcome or captured panic — into an unbounded channel, so
/// the driver consumes completions in the order they finish, one bounded
/// wait at a time.
///
/// Shutting down stops further submissions only. In-flight workers are
/// detached tasks and always run to completion; their late completions are
/// dropped once the receiving half is gone. Dropping the pool shuts it
/// down, which covers unwinding exits.
pub struct WorkerPool<T> {
    width: usize,
    permits: Arc<Semaphore>,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<T>>,
    shut_down: bool,
}

impl<T: TaskValue> WorkerPool<T> {
    /// Create a pool of the given width. Will be clamped to a minimum of 1.
    pub fn new(width: usize) -> Self {
        let width = width.max(1); // Ensure at least 1
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            width,
            permits: Arc::new(Semaphore::new(width)),
            completion_tx,
            completion_rx,
            shut_down: false,
        }
    }

    /// Maximum number of concurrently executing workers
    pub fn width(&self) -> usize {
        self.width
    }

    /// Spawn `worker`, routing its outcome or panic into the completion
    /// stream. Refused once the pool is shut down.
    pub fn submit(&mut self, worker: Box<dyn Worker<T>>) -> Result<(), ExecutionError> {
        if self.shut_down {
            return Err(ExecutionError::PoolShutDown);
        }

        let permits = Arc::clone(&self.permits);
        let worker_task = tokio::spawn(async move {
            // Holding a permit for the duration of the call is what bounds
            // concurrently executing workers at the pool width. `acquire`
            // only fails on a closed semaphore, which this pool never does.
            let _permit = permits.acquire_owned().await.ok();
            worker.call().await
        });

        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let completion = match worker_task.await {
                Ok(outcome) => Completion::Finished(outcome),
                Err(join_error) => match join_error.try_into_panic() {
                    Ok(payload) => Completion::Panicked(payload),
                    Err(join_error) => Completion::Panicked(Box::new(join_error.to_string())),
                },
            };
            // Completions arriving after the driver returned are dropped.
            let _ = completions.send(completion);
        });

        Ok(())
    }

    /// Wait up to `wait` for the next completion in finish order.
    pub async fn next_completion(&mut self, wait: Duration) -> CompletionWait<T> {
        match timeout(wait, self.completion_rx.recv()).await {
            Ok(Some(completion)) => CompletionWait::Received(completion),
            Ok(None) => CompletionWait::Closed,
            Err(_) => CompletionWait::TimedOut,
        }
    }

    /// Refuse further submissions. In-flight workers keep running.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
    }

    /// Whether the pool still accepts submissions
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.shut_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    struct SleepyWorker {
        value: u32,
        delay: Duration,
        executing: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Worker<u32> for SleepyWorker {
        async fn call(&self) -> TaskOutcome<u32> {
            let now = self.executing.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            sleep(self.delay).await;
            self.executing.fetch_sub(1, Ordering::SeqCst);
            TaskOutcome::succeeded(self.value)
        }
    }

    struct PanickingWorker;

    #[async_trait]
    impl Worker<u32> for PanickingWorker {
        async fn call(&self) -> TaskOutcome<u32> {
            panic!("kaboom");
        }
    }

    #[tokio::test]
    async fn completions_arrive_in_finish_order() {
        let executing = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut pool = WorkerPool::new(4);

        for (value, delay_ms) in [(1u32, 40u64), (2, 5)] {
            pool.submit(Box::new(SleepyWorker {
                value,
                delay: Duration::from_millis(delay_ms),
                executing: Arc::clone(&executing),
                peak: Arc::clone(&peak),
            }))
            .expect("pool accepts submissions");
        }

        let mut order = Vec::new();
        for _ in 0..2 {
            match pool.next_completion(Duration::from_secs(5)).await {
                CompletionWait::Received(Completion::Finished(outcome)) => {
                    order.push(outcome.value);
                }
                other => panic!("expected a finished completion, got {:?}", other),
            }
        }

        // The shorter worker finishes first regardless of submission order.
        assert_eq!(order, vec![2, 1]);
    }

    #[tokio::test]
    async fn executing_workers_never_exceed_the_width() {
        let executing = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut pool = WorkerPool::new(2);

        for value in 0..6u32 {
            pool.submit(Box::new(SleepyWorker {
                value,
                delay: Duration::from_millis(20),
                executing: Arc::clone(&executing),
                peak: Arc::clone(&peak),
            }))
            .expect("pool accepts submissions");
        }

        for _ in 0..6 {
            match pool.next_completion(Duration::from_secs(5)).await {
                CompletionWait::Received(Completion::Finished(_)) => {}
                other => panic!("expected a finished completion, got {:?}", other),
            }
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn panics_are_captured_as_completions() {
        let mut pool: WorkerPool<u32> = WorkerPool::new(1);
        pool.submit(Box::new(PanickingWorker))
            .expect("pool accepts submissions");

        match pool.next_completion(Duration::from_secs(5)).await {
            CompletionWait::Received(Completion::Panicked(payload)) => {
                assert_eq!(payload.downcast_ref::<&str>(), Some(&"kaboom"));
            }
            other => panic!("expected a captured panic, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn waits_time_out_when_nothing_completes() {
        let mut pool: WorkerPool<u32> = WorkerPool::new(1);

        match pool.next_completion(Duration::from_millis(10)).await {
            CompletionWait::TimedOut => {}
            other => panic!("expected a timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn shutdown_refuses_new_submissions() {
        let mut pool: WorkerPool<u32> = WorkerPool::new(1);
        pool.shutdown();

        let refused = pool.submit(Box::new(PanickingWorker));
        assert!(matches!(refused, Err(ExecutionError::PoolShutDown)));
        assert!(pool.is_shut_down());
    }

    #[tokio::test]
    async fn zero_width_is_clamped_to_one() {
        let pool: WorkerPool<u32> = WorkerPool::new(0);
        assert_eq!(pool.width(), 1);
    }
}
