//! Path-scoped file tool
//!
//! File operations confined to the allow-listed directory roots from
//! configuration. Paths are made absolute and lexically normalized before
//! the containment check, so `..` segments cannot step outside a root and
//! paths that do not exist yet (copy/move destinations) are still checked.

use crate::config::FileManagerConfig;
use crate::errors::{Result, ToolError};
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolArgs, ToolDescriptor};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub struct FileTool {
    config: FileManagerConfig,
}

impl FileTool {
    pub fn new(config: FileManagerConfig) -> Self {
        Self { config }
    }

    /// Resolve to an absolute, normalized path and enforce that one of the
    /// allow-listed roots is an ancestor.
    fn resolve_allowed(&self, raw: &str) -> Result<PathBuf> {
        let resolved = normalize(&absolute(Path::new(raw))?);

        for root in &self.config.allowed_paths {
            let root = normalize(&absolute(root)?);
            if resolved.starts_with(&root) {
                return Ok(resolved);
            }
        }

        Err(ToolError::PathNotAllowed(raw.to_string()))
    }

    fn list(&self, dir: &Path) -> Result<Value> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };

            let modified = metadata
                .modified()
                .ok()
                .map(|time| DateTime::<Utc>::from(time).to_rfc3339());

            entries.push(json!({
                "name": entry.file_name().to_string_lossy(),
                "size": metadata.len(),
                "is_dir": metadata.is_dir(),
                "modified": modified,
            }));
        }

        Ok(Value::Array(entries))
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        let metadata = fs::metadata(src)?;

        if metadata.is_dir() {
            return copy_dir(src, dst);
        }

        if metadata.len() > self.config.max_file_size {
            return Err(ToolError::FileTooLarge {
                size: metadata.len(),
                max: self.config.max_file_size,
            });
        }

        fs::copy(src, dst)?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        if fs::metadata(path)?.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Resolve `.` and `..` components without touching the filesystem, so the
/// containment check also covers paths that do not exist yet.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dest = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }

    Ok(())
}

#[async_trait]
impl Tool for FileTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            id: "file-manager".to_string(),
            name: "File Manager".to_string(),
            description: "Provides file system operations like list, copy, move, delete"
                .to_string(),
            version: "1.0.0".to_string(),
            category: "System".to_string(),
        }
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required(
                "operation",
                ParamType::String,
                "Operation to perform (list, copy, move, delete)",
            ),
            ParamSpec::required("path", ParamType::String, "File or directory path"),
            ParamSpec::optional(
                "destination",
                ParamType::String,
                "Destination path for copy/move operations",
            ),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let operation = args
            .get_str("operation")
            .ok_or_else(|| ToolError::MissingParameter("operation".to_string()))?;
        let raw_path = args
            .get_str("path")
            .ok_or_else(|| ToolError::MissingParameter("path".to_string()))?;
        let path = self.resolve_allowed(raw_path)?;

        match operation {
            "list" => self.list(&path),
            "delete" => {
                self.delete(&path)?;
                Ok(json!({"success": true}))
            }
            "copy" | "move" => {
                let raw_destination = args
                    .get_str("destination")
                    .ok_or_else(|| ToolError::MissingParameter("destination".to_string()))?;
                let destination = self.resolve_allowed(raw_destination)?;

                if operation == "copy" {
                    self.copy(&path, &destination)?;
                } else {
                    fs::rename(&path, &destination)?;
                }
                Ok(json!({"success": true}))
            }
            other => Err(ToolError::InvalidParameter {
                name: "operation".to_string(),
                reason: format!("unsupported operation: {other}"),
            }),
        }
    }
}
