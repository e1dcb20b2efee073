//! Task store tool
//!
//! In-memory CRUD over schedulable tasks with a capacity ceiling and a
//! best-effort notification side channel. All mutations go through the
//! store's lock; notification dispatch happens strictly after the lock is
//! released. The whole population is lost on process restart.

use crate::config::SchedulerConfig;
use crate::errors::{Result, ToolError};
use crate::tools::notify::Notifier;
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolArgs, ToolDescriptor};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Cancelled,
}

impl FromStr for TaskStatus {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(ToolError::InvalidParameter {
                name: "status".to_string(),
                reason: format!("unknown status: {other}"),
            }),
        }
    }
}

/// A schedulable record, owned and mutated only through this store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<DateTime<Utc>>,

    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SchedulerTool {
    tasks: RwLock<HashMap<String, Task>>,
    config: SchedulerConfig,
    notifier: Option<Notifier>,
}

impl SchedulerTool {
    /// Build the store; spawns the notification worker when enabled.
    ///
    /// Must be called from within a tokio runtime when notifications are
    /// enabled.
    pub fn new(config: SchedulerConfig) -> Self {
        let notifier = config.enable_notifications.then(Notifier::spawn);
        Self {
            tasks: RwLock::new(HashMap::new()),
            config,
            notifier,
        }
    }

    /// Number of live tasks in the store
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }

    fn notify(&self, event: &str, task: &Task) {
        if let Some(notifier) = &self.notifier {
            notifier.dispatch(event, task);
        }
    }

    fn next_task_id() -> String {
        // Time-derived: monotonic in practice, unique within this process's
        // lifetime, not guaranteed unique across processes.
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        format!("task_{nanos}")
    }

    async fn create(&self, args: &ToolArgs) -> Result<Value> {
        // Cheap pre-check under the read lock; re-checked below once the
        // write lock is held.
        if self.tasks.read().await.len() >= self.config.max_tasks {
            return Err(ToolError::CapacityExceeded {
                limit: self.config.max_tasks,
            });
        }

        let title = args
            .get_str("title")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ToolError::MissingParameter("title".to_string()))?;
        let due_time = parse_due_time(args)?;

        let now = Utc::now();
        let task = Task {
            id: Self::next_task_id(),
            title: title.to_string(),
            description: args.get_str("description").unwrap_or_default().to_string(),
            due_time,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        {
            let mut tasks = self.tasks.write().await;
            if tasks.len() >= self.config.max_tasks {
                return Err(ToolError::CapacityExceeded {
                    limit: self.config.max_tasks,
                });
            }
            tasks.insert(task.id.clone(), task.clone());
        }

        self.notify("task_created", &task);
        Ok(serde_json::to_value(&task)?)
    }

    async fn update(&self, args: &ToolArgs) -> Result<Value> {
        let task_id = required_task_id(args)?;

        // Parse every supplied field up front so a malformed one cannot
        // leave a half-updated record behind.
        let status = match args.get_str("status").filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<TaskStatus>()?),
            None => None,
        };
        let due_time = parse_due_time(args)?;
        let title = args
            .get_str("title")
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let description = args.get_str("description").map(str::to_string);

        let updated = {
            let mut tasks = self.tasks.write().await;
            let task = tasks
                .get_mut(&task_id)
                .ok_or_else(|| ToolError::TaskNotFound(task_id.clone()))?;

            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(status) = status {
                task.status = status;
            }
            if let Some(due_time) = due_time {
                task.due_time = Some(due_time);
            }

            let mut now = Utc::now();
            if now <= task.updated_at {
                // Clock granularity can hand out equal stamps; updated_at
                // must stay strictly increasing.
                now = task.updated_at + Duration::nanoseconds(1);
            }
            task.updated_at = now;
            task.clone()
        };

        self.notify("task_updated", &updated);
        Ok(serde_json::to_value(&updated)?)
    }

    async fn delete(&self, args: &ToolArgs) -> Result<Value> {
        let task_id = required_task_id(args)?;

        let removed = self
            .tasks
            .write()
            .await
            .remove(&task_id)
            .ok_or_else(|| ToolError::TaskNotFound(task_id.clone()))?;

        self.notify("task_deleted", &removed);
        Ok(json!({
            "success": true,
            "message": format!("Task {task_id} deleted"),
        }))
    }

    async fn list(&self) -> Result<Value> {
        let tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        Ok(serde_json::to_value(tasks)?)
    }

    async fn get(&self, args: &ToolArgs) -> Result<Value> {
        let task_id = required_task_id(args)?;

        let task = self
            .tasks
            .read()
            .await
            .get(&task_id)
            .cloned()
            .ok_or_else(|| ToolError::TaskNotFound(task_id))?;

        Ok(serde_json::to_value(&task)?)
    }
}

fn required_task_id(args: &ToolArgs) -> Result<String> {
    args.get_str("task_id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ToolError::MissingParameter("task_id".to_string()))
}

fn parse_due_time(args: &ToolArgs) -> Result<Option<DateTime<Utc>>> {
    match args.get_str("due_time").filter(|s| !s.is_empty()) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|err| ToolError::InvalidParameter {
                name: "due_time".to_string(),
                reason: format!("invalid due_time format: {err}"),
            }),
        None => Ok(None),
    }
}

#[async_trait]
impl Tool for SchedulerTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            id: "scheduler".to_string(),
            name: "Task Scheduler".to_string(),
            description: "Manage tasks and schedules".to_string(),
            version: "1.0.0".to_string(),
            category: "Productivity".to_string(),
        }
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required(
                "operation",
                ParamType::String,
                "Operation to perform (create, update, delete, list, get)",
            ),
            ParamSpec::optional(
                "task_id",
                ParamType::String,
                "Task ID for update, delete, get operations",
            ),
            ParamSpec::optional(
                "title",
                ParamType::String,
                "Task title for create/update operations",
            ),
            ParamSpec::optional(
                "description",
                ParamType::String,
                "Task description for create/update operations",
            ),
            ParamSpec::optional(
                "due_time",
                ParamType::String,
                "Task due time in RFC3339 format",
            ),
            ParamSpec::optional(
                "status",
                ParamType::String,
                "Task status (pending, completed, cancelled)",
            ),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let operation = args
            .get_str("operation")
            .ok_or_else(|| ToolError::MissingParameter("operation".to_string()))?;

        match operation {
            "create" => self.create(&args).await,
            "update" => self.update(&args).await,
            "delete" => self.delete(&args).await,
            "list" => self.list().await,
            "get" => self.get(&args).await,
            other => Err(ToolError::InvalidParameter {
                name: "operation".to_string(),
                reason: format!("unsupported operation: {other}"),
            }),
        }
    }
}
