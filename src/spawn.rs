// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Where resource builds run.

Caches never await their builds; they hand a boxed future to a [Spawner] and learn about the
outcome through a channel.  [SomeExecutorSpawner] is the production choice.
[DeferredSpawner] queues work until [DeferredSpawner::run_all] is called, which makes the
order of events in tests explicit.
*/

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use some_executor::task::{Configuration, Task};

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub trait Spawner: Send + Sync + 'static {
    fn spawn(&self, label: &str, task: BoxFuture);
}

/// Spawns onto the current some_executor executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SomeExecutorSpawner;

impl Spawner for SomeExecutorSpawner {
    fn spawn(&self, label: &str, task: BoxFuture) {
        Task::without_notifications(label.to_string(), Configuration::default(), task).spawn_static_current();
    }
}

/**
Holds tasks until asked to run them.

Clones share one queue.
*/
#[derive(Clone, Default)]
pub struct DeferredSpawner {
    queue: Arc<Mutex<VecDeque<(String, BoxFuture)>>>,
}

impl DeferredSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Labels of waiting tasks, oldest first.
    pub fn pending_labels(&self) -> Vec<String> {
        self.queue.lock().unwrap().iter().map(|(label, _)| label.clone()).collect()
    }

    /**
    Runs the oldest task to completion.  Returns `false` if the queue was empty.
    */
    pub fn run_one(&self) -> bool {
        //the lock must not be held while the task runs; it may spawn more work
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some((label, task)) => {
                logwise::trace_sync!("Running deferred task {label}", label = label.as_str());
                test_executors::spin_on(task);
                true
            }
            None => false,
        }
    }

    /// Runs tasks until the queue is empty, including any they spawn.  Returns how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_one() {
            ran += 1;
        }
        ran
    }
}

impl Spawner for DeferredSpawner {
    fn spawn(&self, label: &str, task: BoxFuture) {
        self.queue.lock().unwrap().push_back((label.to_string(), task));
    }
}

impl std::fmt::Debug for DeferredSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredSpawner")
            .field("pending", &self.pending_labels())
            .finish()
    }
}
