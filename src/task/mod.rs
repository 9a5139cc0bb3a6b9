//! Monitored background work.
//!
//! A [`Task`] runs one closure on a named worker thread. The closure
//! reports progress through a [`TaskMonitor`] and checks for cancellation
//! at its stage boundaries. The outcome travels back over a one-slot
//! channel and is kept on the task, so errors can be observed through
//! [`Task::join`] and [`Task::get`].
//!
//! ```
//! use hmsa::task::{Task, TaskState};
//!
//! let mut task = Task::spawn("sum", |monitor| {
//!     monitor.update(0.5, "Adding");
//!     monitor.check_cancelled()?;
//!     Ok(2 + 2)
//! })
//! .unwrap();
//! assert_eq!(task.get().unwrap(), 4);
//! assert_eq!(task.state(), TaskState::Completed);
//! assert_eq!(task.progress(), 1.0);
//! ```

#[cfg(test)]
mod tests;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use log::{debug, warn};

use crate::error::{HmsaError, Result};

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not started
    Idle,
    /// Started and not finished
    Running,
    /// Finished with a value
    Completed,
    /// Finished with an error
    Error,
    /// Stopped on request
    Cancelled,
}

#[derive(Debug)]
struct Progress {
    fraction: f64,
    status: String,
    state: TaskState,
}

#[derive(Debug)]
struct Shared {
    progress: Mutex<Progress>,
    cancelled: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle given to the work closure.
#[derive(Debug, Clone)]
pub struct TaskMonitor {
    shared: Arc<Shared>,
}

impl TaskMonitor {
    /// Report progress in `[0, 1]` and a status line. Progress never
    /// moves backwards.
    pub fn update(&self, progress: f64, status: impl Into<String>) {
        let mut state = self.shared.lock();
        state.fraction = state.fraction.max(progress.clamp(0.0, 1.0));
        state.status = status.into();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`HmsaError::Cancelled`] once cancellation was requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(HmsaError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Work running on a background thread.
pub struct Task<T> {
    shared: Arc<Shared>,
    receiver: Receiver<Result<T>>,
    handle: Option<JoinHandle<()>>,
    outcome: Option<Result<T>>,
}

impl<T: Send + 'static> Task<T> {
    /// Start `work` on a thread named `name`.
    pub fn spawn<F>(name: &str, work: F) -> Result<Self>
    where
        F: FnOnce(&TaskMonitor) -> Result<T> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            progress: Mutex::new(Progress {
                fraction: 0.0,
                status: "Running".to_string(),
                state: TaskState::Running,
            }),
            cancelled: AtomicBool::new(false),
        });
        let monitor = TaskMonitor {
            shared: Arc::clone(&shared),
        };
        let (sender, receiver) = bounded(1);
        let task_name = name.to_string();

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(&monitor)))
                    .unwrap_or(Err(HmsaError::WorkerPanicked));

                {
                    let mut state = monitor.shared.lock();
                    match &outcome {
                        Ok(_) => {
                            state.fraction = 1.0;
                            state.status = "Completed".to_string();
                            state.state = TaskState::Completed;
                        }
                        Err(HmsaError::Cancelled) => {
                            warn!("Task {} cancelled", task_name);
                            state.fraction = 1.0;
                            state.status = "Cancelled".to_string();
                            state.state = TaskState::Cancelled;
                        }
                        Err(e) => {
                            debug!("Task {} failed: {}", task_name, e);
                            state.status = e.to_string();
                            state.state = TaskState::Error;
                        }
                    }
                }
                // The receiver only disappears with the task itself.
                let _ = sender.send(outcome);
            })?;

        Ok(Self {
            shared,
            receiver,
            handle: Some(handle),
            outcome: None,
        })
    }

    /// Wait for the work to finish, at most `timeout` when given.
    ///
    /// Returns `Ok(false)` when the timeout expires first, `Ok(true)` once
    /// the work succeeded, and the stored error when it failed.
    pub fn join(&mut self, timeout: Option<Duration>) -> Result<bool> {
        if self.outcome.is_none() {
            let received = match timeout {
                Some(timeout) => match self.receiver.recv_timeout(timeout) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => return Ok(false),
                    Err(RecvTimeoutError::Disconnected) => Err(HmsaError::WorkerPanicked),
                },
                None => self
                    .receiver
                    .recv()
                    .unwrap_or(Err(HmsaError::WorkerPanicked)),
            };
            if let Some(handle) = self.handle.take() {
                if handle.join().is_err() {
                    return Err(HmsaError::WorkerPanicked);
                }
            }
            self.outcome = Some(received);
        }
        match &self.outcome {
            Some(Err(e)) => Err(e.clone()),
            _ => Ok(true),
        }
    }

    /// Block until the work finishes and take its result.
    ///
    /// # Errors
    ///
    /// The error of the work, or [`HmsaError::NotStarted`] when the result
    /// was already taken.
    pub fn get(&mut self) -> Result<T> {
        self.join(None)?;
        self.outcome.take().unwrap_or(Err(HmsaError::NotStarted))
    }
}

impl<T> Task<T> {
    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
    }

    /// Last reported progress, between 0 and 1.
    pub fn progress(&self) -> f64 {
        self.shared.lock().fraction
    }

    /// Last reported status message.
    pub fn status(&self) -> String {
        self.shared.lock().status.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        self.shared.lock().state
    }

    /// Whether the worker thread is still running.
    pub fn is_alive(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                warn!("Task dropped while running; waiting for it to finish");
            }
            let _ = handle.join();
        }
    }
}

/// The background-task surface shared by the reader and the writer.
pub trait Monitorable {
    /// Fraction of the work done, in `[0, 1]`.
    fn progress(&self) -> f64;

    /// Human-readable description of the current stage.
    fn status(&self) -> String;

    /// [`TaskState::Idle`] until a task was started.
    fn state(&self) -> TaskState;

    /// Whether the task is running.
    fn is_alive(&self) -> bool;

    /// Request cancellation. The task stops at its next checkpoint.
    fn cancel(&self);
}
