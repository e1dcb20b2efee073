//! End-to-end tests for the HTTP boundary, against a server bound to an
//! ephemeral port.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use toolhost::config::{Config, SchedulerConfig, ShellExecutorConfig};
use toolhost::server;
use toolhost::tools::{SchedulerTool, ShellTool, Tool, ToolRegistry};

async fn spawn_server(config: Config) -> SocketAddr {
    let registry = Arc::new(ToolRegistry::new());
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(ShellTool::new(config.tools.shell_executor.clone())),
        Arc::new(SchedulerTool::new(config.tools.scheduler.clone())),
    ];
    for tool in tools {
        registry.register(tool).await.unwrap();
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(registry, Arc::new(config));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.tools.shell_executor = ShellExecutorConfig {
        allowed_commands: vec!["echo".to_string()],
        max_timeout: 60,
    };
    config.tools.scheduler = SchedulerConfig {
        max_tasks: 10,
        enable_notifications: false,
    };
    config
}

#[tokio::test]
async fn test_list_tools_returns_descriptors() {
    let addr = spawn_server(test_config()).await;

    let body: Value = reqwest::get(format!("http://{addr}/api/v1/tools"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let descriptors = body.as_array().unwrap();
    assert_eq!(descriptors.len(), 2);
    assert!(descriptors.iter().all(|d| d["id"].is_string()));
}

#[tokio::test]
async fn test_describe_tool_and_parameter_schema() {
    let addr = spawn_server(test_config()).await;

    let descriptor: Value = reqwest::get(format!("http://{addr}/api/v1/tools/scheduler"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(descriptor["name"], "Task Scheduler");

    let params: Value = reqwest::get(format!("http://{addr}/api/v1/tools/scheduler?params=true"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let specs = params.as_array().unwrap();
    assert!(specs.iter().any(|p| p["name"] == "operation"));
    assert!(specs
        .iter()
        .find(|p| p["name"] == "operation")
        .map(|p| p["required"] == true)
        .unwrap());
}

#[tokio::test]
async fn test_unknown_tool_is_404() {
    let addr = spawn_server(test_config()).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/tools/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_invoke_executes_tool() {
    let addr = spawn_server(test_config()).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("http://{addr}/api/v1/tools/scheduler"))
        .json(&json!({"operation": "create", "title": "over http"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["title"], "over http");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn test_missing_parameter_is_400() {
    let addr = spawn_server(test_config()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/v1/tools/scheduler"))
        .json(&json!({"title": "no operation"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "validation");
}

#[tokio::test]
async fn test_permission_failure_is_403() {
    let addr = spawn_server(test_config()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/v1/tools/shell-executor"))
        .json(&json!({"command": "rm -rf /"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_auth_gates_requests_when_enabled() {
    let mut config = test_config();
    config.security.enable_auth = true;
    config.security.api_keys = vec!["secret".to_string()];
    let addr = spawn_server(config).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/api/v1/tools"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("http://{addr}/api/v1/tools"))
        .header("x-api-key", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("http://{addr}/api/v1/tools"))
        .header("x-api-key", "secret")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
