//! toolhost server entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use toolhost::config::Config;
use toolhost::tools::{FileTool, SchedulerTool, ShellTool, Tool, ToolRegistry};

#[derive(Parser)]
#[command(name = "toolhost")]
#[command(about = "Pluggable tool-execution service", long_about = None)]
struct Args {
    /// Path to the configuration file (default: ~/.toolhost/config.toml,
    /// created on first run)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,toolhost=debug")),
        )
        .init();

    let config = Arc::new(Config::load(args.config.as_deref())?);

    let registry = Arc::new(ToolRegistry::new());
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(FileTool::new(config.tools.file_manager.clone())),
        Arc::new(ShellTool::new(config.tools.shell_executor.clone())),
        Arc::new(SchedulerTool::new(config.tools.scheduler.clone())),
    ];
    for tool in tools {
        registry.register(tool).await?;
    }

    toolhost::server::serve(registry, config).await
}
