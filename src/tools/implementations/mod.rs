//! Built-in tool implementations
//!
//! Each tool is self-contained and only reads the configuration section
//! handed to it at construction.

pub mod filesystem;
pub mod process;
pub mod scheduler;

pub use filesystem::FileTool;
pub use process::{ExecutionOutput, ShellTool};
pub use scheduler::{SchedulerTool, Task, TaskStatus};
