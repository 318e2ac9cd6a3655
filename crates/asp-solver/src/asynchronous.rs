//! Model generation on a worker thread
//!
//! [`AsynchronousModelGenerator`] moves any [`ModelGenerator`] onto its own
//! thread. The worker pushes models into a bounded queue and blocks while
//! the queue is full; the consumer blocks while it is empty. Dropping the
//! generator asks the worker to stop and joins it. Stopping is cooperative:
//! a worker inside a long `next_model` call finishes that call first.

use crate::ground_solver::GroundAspSolver;
use asp_core::Interpretation;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Anything that enumerates models one at a time
pub trait ModelGenerator: Send {
    /// Next model, or `None` once there are no more
    fn next_model(&mut self) -> Option<Interpretation>;

    /// Free-form diagnostic text
    fn statistics(&self) -> String {
        String::new()
    }
}

impl ModelGenerator for GroundAspSolver {
    fn next_model(&mut self) -> Option<Interpretation> {
        GroundAspSolver::next_model(self)
    }

    fn statistics(&self) -> String {
        GroundAspSolver::statistics(self)
    }
}

#[derive(Default)]
struct Queue {
    models: VecDeque<Interpretation>,
    finished: bool,
    statistics: String,
}

struct Shared {
    queue: Mutex<Queue>,
    /// Signalled when a model was taken out of a full queue
    space: Condvar,
    /// Signalled when a model arrived or the worker finished
    available: Condvar,
    terminate: AtomicBool,
    capacity: usize,
}

pub struct AsynchronousModelGenerator {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl AsynchronousModelGenerator {
    pub fn new<G: ModelGenerator + 'static>(generator: G, capacity: usize) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue::default()),
            space: Condvar::new(),
            available: Condvar::new(),
            terminate: AtomicBool::new(false),
            capacity: capacity.max(1),
        });
        let worker = {
            let shared = shared.clone();
            thread::spawn(move || produce(generator, &shared))
        };
        AsynchronousModelGenerator {
            shared,
            worker: Some(worker),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Ask the worker to stop after its current model
    pub fn terminate(&self) {
        // set under the lock so a producer about to wait cannot miss it
        let _queue = self.shared.queue.lock();
        self.shared.terminate.store(true, Ordering::Release);
        self.shared.space.notify_all();
    }
}

fn produce<G: ModelGenerator>(mut generator: G, shared: &Shared) {
    loop {
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }
        let model = generator.next_model();

        let mut queue = shared.queue.lock();
        queue.statistics = generator.statistics();
        let model = match model {
            Some(model) => model,
            None => break,
        };
        while queue.models.len() >= shared.capacity && !shared.terminate.load(Ordering::Acquire) {
            shared.space.wait(&mut queue);
        }
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }
        queue.models.push_back(model);
        shared.available.notify_one();
    }

    log::debug!("model generator worker finished");
    shared.queue.lock().finished = true;
    shared.available.notify_all();
}

impl ModelGenerator for AsynchronousModelGenerator {
    fn next_model(&mut self) -> Option<Interpretation> {
        let mut queue = self.shared.queue.lock();
        loop {
            if let Some(model) = queue.models.pop_front() {
                self.shared.space.notify_one();
                return Some(model);
            }
            if queue.finished {
                return None;
            }
            self.shared.available.wait(&mut queue);
        }
    }

    fn statistics(&self) -> String {
        let queue = self.shared.queue.lock();
        format!(
            "{}\nqueue capacity: {}, buffered models: {}",
            queue.statistics,
            self.shared.capacity,
            queue.models.len()
        )
    }
}

impl Drop for AsynchronousModelGenerator {
    fn drop(&mut self) {
        self.terminate();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("model generator worker panicked");
            }
        }
    }
}
