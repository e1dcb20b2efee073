//! Service configuration
//!
//! Loaded once at startup and never reloaded. Each tool receives an owned
//! copy of its own section at construction, so there is no process-global
//! configuration state to reach for at execution time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecurityConfig {
    /// When false, every request passes without an API key
    #[serde(default)]
    pub enable_auth: bool,

    #[serde(default)]
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    #[serde(default)]
    pub file_manager: FileManagerConfig,

    #[serde(default)]
    pub shell_executor: ShellExecutorConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileManagerConfig {
    /// Directory roots file operations are confined to
    #[serde(default)]
    pub allowed_paths: Vec<PathBuf>,

    /// Copy ceiling for a single regular file, in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellExecutorConfig {
    /// Program names allowed to run; matching is on the leading token only
    #[serde(default = "default_allowed_commands")]
    pub allowed_commands: Vec<String>,

    /// Upper bound on a caller-requested timeout, in seconds
    #[serde(default = "default_max_timeout")]
    pub max_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Ceiling on live tasks in the store
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,

    #[serde(default)]
    pub enable_notifications: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_commands() -> Vec<String> {
    ["echo", "ls", "cat", "pwd", "date"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_timeout() -> u64 {
    300
}

fn default_max_tasks() -> usize {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FileManagerConfig {
    fn default() -> Self {
        Self {
            allowed_paths: Vec::new(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for ShellExecutorConfig {
    fn default() -> Self {
        Self {
            allowed_commands: default_allowed_commands(),
            max_timeout: default_max_timeout(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_tasks: default_max_tasks(),
            enable_notifications: false,
        }
    }
}

impl Config {
    /// Load configuration from the given path, or from the default location.
    ///
    /// An explicitly supplied path must exist. The default file is created
    /// with defaults on first run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read_from(path),
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    let config = Config::default();
                    config.save(&path)?;
                    return Ok(config);
                }
                Self::read_from(&path)
            }
        }
    }

    fn read_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".toolhost").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(!config.security.enable_auth);
        assert_eq!(config.tools.scheduler.max_tasks, 100);
        assert_eq!(config.tools.shell_executor.max_timeout, 300);
        assert!(config
            .tools
            .shell_executor
            .allowed_commands
            .contains(&"echo".to_string()));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [tools.scheduler]
            max_tasks = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.tools.scheduler.max_tasks, 5);
        assert_eq!(
            config.tools.file_manager.max_file_size,
            default_max_file_size()
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.security.enable_auth = true;
        config.security.api_keys = vec!["secret".to_string()];
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(path.as_path())).unwrap();
        assert!(reloaded.security.enable_auth);
        assert_eq!(reloaded.security.api_keys, vec!["secret".to_string()]);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/toolhost.toml")));
        assert!(result.is_err());
    }
}
