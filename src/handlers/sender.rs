//! Reporting of task outcomes.

use parking_lot::Mutex;
use uuid::Uuid;

/// Sink for the outcome of analysis tasks.
pub trait TaskResponseSender: Send + Sync {
    fn send_success(&self, task_id: Uuid);
    fn send_failure(&self, task_id: Uuid, message: &str);
}

/// Reports task outcomes through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResponseSender;

impl TaskResponseSender for LogResponseSender {
    fn send_success(&self, task_id: Uuid) {
        log::info!("Task {} finished successfully", task_id);
    }

    fn send_failure(&self, task_id: Uuid, message: &str) {
        log::error!("Task {} failed: {}", task_id, message);
    }
}

/// Outcome of one task as seen by a [`TaskResponseSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResponse {
    Success { task_id: Uuid },
    Failure { task_id: Uuid, message: String },
}

/// Keeps every response in memory.
#[derive(Debug, Default)]
pub struct RecordingResponseSender {
    responses: Mutex<Vec<TaskResponse>>,
}

impl RecordingResponseSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn responses(&self) -> Vec<TaskResponse> {
        self.responses.lock().clone()
    }
}

impl TaskResponseSender for RecordingResponseSender {
    fn send_success(&self, task_id: Uuid) {
        self.responses.lock().push(TaskResponse::Success { task_id });
    }

    fn send_failure(&self, task_id: Uuid, message: &str) {
        self.responses.lock().push(TaskResponse::Failure {
            task_id,
            message: message.to_string(),
        });
    }
}

impl<T: TaskResponseSender + ?Sized> TaskResponseSender for &T {
    fn send_success(&self, task_id: Uuid) {
        (**self).send_success(task_id)
    }

    fn send_failure(&self, task_id: Uuid, message: &str) {
        (**self).send_failure(task_id, message)
    }
}
