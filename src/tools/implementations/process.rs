//! Process execution tool
//!
//! Spawns an allow-listed external command with piped output and a
//! deadline. The deadline forcibly terminates the child, so a process
//! that outlives its timeout is never left running. Matching against the
//! allow-list is on the program name only, not on arguments.

use crate::config::ShellExecutorConfig;
use crate::errors::{Result, ToolError};
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolArgs, ToolDescriptor};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::{sleep, Duration};

/// Applied when the caller does not supply a timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Outcome of one completed execution; never stored or shared
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

#[derive(Debug)]
pub struct ShellTool {
    config: ShellExecutorConfig,
}

impl ShellTool {
    pub fn new(config: ShellExecutorConfig) -> Self {
        Self { config }
    }

    fn is_command_allowed(&self, program: &str) -> bool {
        self.config
            .allowed_commands
            .iter()
            .any(|allowed| allowed == program)
    }

    async fn run(&self, args: &ToolArgs) -> Result<ExecutionOutput> {
        let command_line = args
            .get_str("command")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ToolError::MissingParameter("command".to_string()))?;

        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ToolError::MissingParameter("command".to_string()))?;

        if !self.is_command_allowed(program) {
            return Err(ToolError::CommandNotAllowed(program.to_string()));
        }

        let requested = args.get_i64("timeout").unwrap_or(DEFAULT_TIMEOUT_SECS as i64);
        let timeout = u64::try_from(requested).map_err(|_| ToolError::InvalidParameter {
            name: "timeout".to_string(),
            reason: "timeout must be non-negative".to_string(),
        })?;
        if timeout > self.config.max_timeout {
            return Err(ToolError::TimeoutExceedsLimit {
                requested: timeout,
                max: self.config.max_timeout,
            });
        }

        let mut cmd = Command::new(program);
        cmd.args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = args.get_str("working_dir").filter(|d| !d.is_empty()) {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(ToolError::SpawnFailed)?;

        // Drain both pipes concurrently so a chatty child cannot stall on a
        // full pipe while we wait on its exit status.
        let stdout_task = tokio::spawn(read_to_end(child.stdout.take()));
        let stderr_task = tokio::spawn(read_to_end(child.stderr.take()));

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = sleep(Duration::from_secs(timeout)) => {
                if let Err(err) = child.kill().await {
                    return Err(ToolError::TerminationFailed(err.to_string()));
                }
                return Err(ToolError::ExecutionTimeout(timeout));
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(ExecutionOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            success: status.success(),
        })
    }
}

async fn read_to_end<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}

#[async_trait]
impl Tool for ShellTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            id: "shell-executor".to_string(),
            name: "Shell Executor".to_string(),
            description: "Execute shell commands with timeout and output capture".to_string(),
            version: "1.0.0".to_string(),
            category: "System".to_string(),
        }
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("command", ParamType::String, "Shell command to execute"),
            ParamSpec::optional(
                "timeout",
                ParamType::Integer,
                "Command execution timeout in seconds",
            )
            .with_default(json!(DEFAULT_TIMEOUT_SECS)),
            ParamSpec::optional(
                "working_dir",
                ParamType::String,
                "Working directory for command execution",
            ),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let output = self.run(&args).await?;
        Ok(serde_json::to_value(output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::dispatch;
    use serde_json::Map;
    use std::time::Instant;

    fn tool() -> ShellTool {
        ShellTool::new(ShellExecutorConfig {
            allowed_commands: ["echo", "sleep", "false", "pwd", "ls"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_timeout: 300,
        })
    }

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    async fn invoke(tool: &ShellTool, params: Value) -> Result<Value> {
        dispatch::invoke(tool, bag(params)).await
    }

    #[tokio::test]
    async fn test_allowed_command_captures_stdout() {
        let result = invoke(&tool(), json!({"command": "echo hello"}))
            .await
            .unwrap();

        assert_eq!(result["success"], true);
        assert_eq!(result["exit_code"], 0);
        assert!(result["stdout"].as_str().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn test_disallowed_command_is_rejected() {
        let err = invoke(&tool(), json!({"command": "rm -rf /tmp/x"}))
            .await
            .unwrap_err();

        match err {
            ToolError::CommandNotAllowed(program) => assert_eq!(program, "rm"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_the_child() {
        let start = Instant::now();
        let err = invoke(&tool(), json!({"command": "sleep 5", "timeout": 1}))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::ExecutionTimeout(1)));
        // Well under the sleep duration: the child was killed, not waited out.
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_timeout_above_limit_is_rejected() {
        let err = invoke(&tool(), json!({"command": "echo hi", "timeout": 301}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ToolError::TimeoutExceedsLimit {
                requested: 301,
                max: 300
            }
        ));
    }

    #[tokio::test]
    async fn test_negative_timeout_is_rejected() {
        let err = invoke(&tool(), json!({"command": "echo hi", "timeout": -1}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_an_error() {
        let result = invoke(&tool(), json!({"command": "false"})).await.unwrap();

        assert_eq!(result["success"], false);
        assert_ne!(result["exit_code"], 0);
    }

    #[tokio::test]
    async fn test_stderr_is_captured_separately() {
        let result = invoke(&tool(), json!({"command": "ls /definitely-not-here-12345"}))
            .await
            .unwrap();

        assert_eq!(result["success"], false);
        assert!(!result["stderr"].as_str().unwrap().is_empty());
        assert!(result["stdout"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_working_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let result = invoke(
            &tool(),
            json!({"command": "pwd", "working_dir": dir.path().to_str().unwrap()}),
        )
        .await
        .unwrap();

        assert_eq!(result["success"], true);
        assert!(result["stdout"]
            .as_str()
            .unwrap()
            .contains(dir.path().file_name().unwrap().to_str().unwrap()));
    }

    #[tokio::test]
    async fn test_empty_command_is_a_validation_failure() {
        let err = invoke(&tool(), json!({"command": "  "})).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(_)));
    }

    #[tokio::test]
    async fn test_spawn_failure_surfaces() {
        let permissive = ShellTool::new(ShellExecutorConfig {
            allowed_commands: vec!["no-such-binary-on-any-path".to_string()],
            max_timeout: 300,
        });

        let err = invoke(&permissive, json!({"command": "no-such-binary-on-any-path"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::SpawnFailed(_)));
    }
}
