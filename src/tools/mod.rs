//! Tool registry and dispatch core
//!
//! Provides the uniform tool contract:
//! - Self-describing tools (descriptor + parameter schema + execute)
//! - Concurrent-safe registry (register, lookup, enumerate, remove)
//! - Typed validate-then-invoke dispatch
//! - Built-in tools: file manager, shell executor, task scheduler

pub mod dispatch;
pub mod implementations;
pub mod notify;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use implementations::{FileTool, SchedulerTool, ShellTool, Task, TaskStatus};
pub use notify::{Notifier, TaskEvent};
pub use registry::ToolRegistry;
pub use types::{ParamSpec, ParamType, ParamValue, Tool, ToolArgs, ToolDescriptor};
