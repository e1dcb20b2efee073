//! Task notification side channel
//!
//! Mutating scheduler operations hand events to a bounded channel drained
//! by an independent worker task. The hand-off uses `try_send`, so a slow
//! or dead worker can never block the caller, and a dispatch failure never
//! fails the originating operation.

use crate::tools::implementations::scheduler::Task;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events queued beyond this are dropped rather than blocking the caller
pub const CHANNEL_CAPACITY: usize = 64;

/// A mutation event with a snapshot of the task it concerns
#[derive(Debug, Clone, Serialize)]
pub struct TaskEvent {
    pub event: String,
    pub task: Task,
}

/// Handle for fire-and-forget event dispatch
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<TaskEvent>,
}

impl Notifier {
    /// Spawn the notification worker and return a dispatch handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::channel::<TaskEvent>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                // TODO: wire a real delivery sink (webhook, mail); the log
                // line stands in until the config grows a sink section.
                info!(
                    event = %event.event,
                    task_id = %event.task.id,
                    title = %event.task.title,
                    "task notification"
                );
            }
        });

        Self { tx }
    }

    /// Best-effort dispatch; drops the event when the queue is full
    pub fn dispatch(&self, event: &str, task: &Task) {
        let event = TaskEvent {
            event: event.to_string(),
            task: task.clone(),
        };

        if let Err(err) = self.tx.try_send(event) {
            warn!(%err, "dropping task notification");
        }
    }
}
