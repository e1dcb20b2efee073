//! Error types for the toolhost service
//!
//! Every core operation returns a typed failure instead of raising an
//! unrecoverable fault. `ErrorKind` is the coarse classification the HTTP
//! boundary maps onto response codes.

use thiserror::Error;

/// Main error type for tool registration, dispatch and execution
#[derive(Error, Debug)]
pub enum ToolError {
    /// A parameter the tool declares as required was not supplied
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// A supplied parameter failed type or value validation
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Registration with an empty or already-taken tool id
    #[error("tool id {0:?} is empty or already registered")]
    DuplicateId(String),

    /// Lookup of an unknown tool id
    #[error("tool with id {0} not found")]
    ToolNotFound(String),

    /// Lookup of an unknown task id
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Path outside every allow-listed root
    #[error("access to path {0} is not allowed")]
    PathNotAllowed(String),

    /// Program name not on the command allow-list
    #[error("command not allowed: {0}")]
    CommandNotAllowed(String),

    /// Task store is at its configured ceiling
    #[error("maximum number of tasks ({limit}) reached")]
    CapacityExceeded { limit: usize },

    /// Requested timeout is above the configured maximum
    #[error("timeout {requested}s exceeds maximum allowed value of {max}s")]
    TimeoutExceedsLimit { requested: u64, max: u64 },

    /// Source file above the configured copy ceiling
    #[error("file size {size} exceeds maximum allowed size of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// Process outlived its deadline and was killed
    #[error("command timed out after {0} seconds")]
    ExecutionTimeout(u64),

    /// Killing a timed-out process failed; supersedes the timeout error
    #[error("failed to kill process: {0}")]
    TerminationFailed(String),

    /// Process could not be started
    #[error("failed to start command: {0}")]
    SpawnFailed(std::io::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse failure classification used by the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Permission,
    Capacity,
    Timeout,
    Execution,
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::MissingParameter(_)
            | ToolError::InvalidParameter { .. }
            | ToolError::DuplicateId(_) => ErrorKind::Validation,
            ToolError::ToolNotFound(_) | ToolError::TaskNotFound(_) => ErrorKind::NotFound,
            ToolError::PathNotAllowed(_) | ToolError::CommandNotAllowed(_) => ErrorKind::Permission,
            ToolError::CapacityExceeded { .. }
            | ToolError::TimeoutExceedsLimit { .. }
            | ToolError::FileTooLarge { .. } => ErrorKind::Capacity,
            ToolError::ExecutionTimeout(_) => ErrorKind::Timeout,
            ToolError::TerminationFailed(_)
            | ToolError::SpawnFailed(_)
            | ToolError::Io(_)
            | ToolError::Serialization(_)
            | ToolError::Config(_) => ErrorKind::Execution,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, ToolError>;
