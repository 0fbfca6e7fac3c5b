//! Tick-driven task queue.
//!
//! An external driver calls [`Scheduler::tick`] at a fixed cadence. Each tick
//! walks the tasks in registration order on the calling thread: tasks still
//! waiting out their delay are counted down, cancelled tasks are dropped, and
//! due tasks run. There is no implicit parallelism; a task that starts a long
//! scan hands it to a background pool and returns.
//!
//! `tick` must not be called concurrently with itself. Adding and cancelling
//! are safe from any thread at any time, including from inside a task body.
//! A body that panics is logged and dropped; the other tasks keep running.

pub mod task;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

pub use task::{Task, TaskHandle};

pub struct Scheduler {
    tasks: Mutex<Vec<Task>>,
    /// Added since the last tick; merged (in order) when the next tick starts.
    queued: Mutex<Vec<Task>>,
    /// Bumped by `cancel_all` so an in-flight tick drops what it holds.
    generation: AtomicU64,
    /// Held by `tick` around each generation check and body run.
    gate: Mutex<()>,
    /// Thread currently inside `tick`.
    ticking: Mutex<Option<ThreadId>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            queued: Mutex::new(Vec::new()),
            generation: AtomicU64::new(0),
            gate: Mutex::new(()),
            ticking: Mutex::new(None),
        }
    }

    /// Advance every task by one tick. Returns the number of task bodies run.
    pub fn tick(&self) -> usize {
        *self.ticking.lock().expect("scheduler poisoned") = Some(thread::current().id());
        let executed = self.tick_tasks();
        *self.ticking.lock().expect("scheduler poisoned") = None;
        executed
    }

    fn tick_tasks(&self) -> usize {
        let generation = self.generation.load(Ordering::Acquire);
        let mut tasks = std::mem::take(&mut *self.tasks.lock().expect("scheduler poisoned"));
        tasks.append(&mut self.queued.lock().expect("scheduler poisoned"));

        let mut kept = Vec::with_capacity(tasks.len());
        let mut executed = 0;

        for mut task in tasks {
            let _gate = self.gate.lock().expect("scheduler poisoned");
            if self.generation.load(Ordering::Acquire) != generation {
                task.cancel();
                continue;
            }
            if task.tick < task.delay {
                task.tick += 1;
                kept.push(task);
                continue;
            }
            if task.is_cancelled() {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.run()));
            executed += 1;
            if let Err(payload) = outcome {
                tracing::error!("Scheduled task panicked and was dropped: {}", panic_message(&*payload));
                task.cancel();
                continue;
            }

            if task.repeat {
                task.tick = 0;
                kept.push(task);
            }
        }

        // Checked under the lock `cancel_all` bumps the generation with, so a
        // concurrent cancel either sees these tasks or is seen here.
        let mut slot = self.tasks.lock().expect("scheduler poisoned");
        if self.generation.load(Ordering::Acquire) != generation {
            kept.iter().for_each(Task::cancel);
        } else {
            kept.append(&mut slot);
            *slot = kept;
        }

        executed
    }

    /// Cancel and remove every task. Called from another thread, this waits
    /// for a running body to finish; no body starts after it returns.
    pub fn cancel_all(&self) {
        let on_ticking_thread = *self.ticking.lock().expect("scheduler poisoned") == Some(thread::current().id());
        // A body calling this already holds the gate on this thread.
        let _gate = (!on_ticking_thread).then(|| self.gate.lock().expect("scheduler poisoned"));
        {
            let mut tasks = self.tasks.lock().expect("scheduler poisoned");
            self.generation.fetch_add(1, Ordering::AcqRel);
            tasks.drain(..).for_each(|t| t.cancel());
        }
        self.queued
            .lock()
            .expect("scheduler poisoned")
            .drain(..)
            .for_each(|t| t.cancel());
    }

    pub fn add_task(&self, task: Task) -> TaskHandle {
        let handle = task.handle();
        self.queued.lock().expect("scheduler poisoned").push(task);
        handle
    }

    /// Run `body` after `delay` ticks, repeating if `repeat` is set.
    pub fn add(&self, delay: u32, repeat: bool, body: impl FnMut() + Send + 'static) -> TaskHandle {
        self.add_task(Task::new(delay, repeat, body))
    }

    /// Run `body` once, after `delay` ticks.
    pub fn add_delayed(&self, delay: u32, body: impl FnMut() + Send + 'static) -> TaskHandle {
        self.add(delay, false, body)
    }

    /// Number of live tasks, including ones added since the last tick.
    pub fn len(&self) -> usize {
        self.tasks.lock().expect("scheduler poisoned").len()
            + self.queued.lock().expect("scheduler poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic")
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
