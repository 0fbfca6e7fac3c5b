use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag for a scheduled task.
///
/// Cloning is cheap; every clone observes the same flag.
#[derive(Clone, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the scheduler to drop the task. Takes effect the next time the
    /// task's delay elapses; a body that is already running finishes.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// A unit of scheduled work.
pub struct Task {
    pub(super) delay: u32,
    pub(super) repeat: bool,
    /// Ticks elapsed since the task was added or last ran.
    pub(super) tick: u32,
    handle: TaskHandle,
    body: Box<dyn FnMut() + Send>,
}

impl Task {
    /// Run `body` once `delay` ticks have passed; again every `delay + 1`
    /// ticks after that if `repeat` is set.
    pub fn new(delay: u32, repeat: bool, body: impl FnMut() + Send + 'static) -> Self {
        Self {
            delay,
            repeat,
            tick: 0,
            handle: TaskHandle::new(),
            body: Box::new(body),
        }
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn repeats(&self) -> bool {
        self.repeat
    }

    pub fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    pub(super) fn run(&mut self) {
        (self.body)();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("delay", &self.delay)
            .field("repeat", &self.repeat)
            .field("tick", &self.tick)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
