//! Toolhost - pluggable tool-execution service
//!
//! Exposes heterogeneous capabilities (filesystem operations, subprocess
//! execution, task bookkeeping) behind one uniform request/response
//! contract: a registry of self-describing tools, a typed
//! validate-then-invoke dispatch protocol, and an HTTP surface for
//! discovery and invocation. Every tool is statically compiled into the
//! registry at startup.

pub mod config;
pub mod errors;
pub mod server;
pub mod tools;

// Re-export commonly used types
pub use config::Config;
pub use errors::{ErrorKind, Result, ToolError};
