//! HTTP boundary
//!
//! Maps the registry/dispatch contract onto a small REST surface:
//! - `GET  /api/v1/tools` — descriptors of every registered tool
//! - `GET  /api/v1/tools/{id}` — one descriptor (`?params=true` for the
//!   parameter schema)
//! - `POST /api/v1/tools/{id}` — validate the JSON body against the tool's
//!   schema, execute, return the tool's result
//!
//! The boundary only translates: lookup failures become 404, typed core
//! failures become their `ErrorKind`-mapped status. No tool logic lives
//! here.

pub mod error;
pub mod middleware;

use crate::config::Config;
use crate::server::error::ApiError;
use crate::tools::types::{ParamSpec, ToolDescriptor};
use crate::tools::{dispatch, ToolRegistry};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{middleware as layers, Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub config: Arc<Config>,
}

/// Build the API router over a populated registry
pub fn router(registry: Arc<ToolRegistry>, config: Arc<Config>) -> Router {
    let state = Arc::new(AppState { registry, config });

    Router::new()
        .route("/api/v1/tools", get(list_tools))
        .route("/api/v1/tools/:id", get(describe_tool).post(invoke_tool))
        .layer(layers::from_fn_with_state(
            state.clone(),
            middleware::require_api_key,
        ))
        .layer(layers::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Bind the configured address and serve until ctrl-c
pub async fn serve(registry: Arc<ToolRegistry>, config: Arc<Config>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "server listening");

    axum::serve(listener, router(registry, config))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolDescriptor>> {
    let descriptors = state
        .registry
        .list()
        .await
        .iter()
        .map(|tool| tool.descriptor())
        .collect();
    Json(descriptors)
}

#[derive(Debug, Deserialize)]
struct DescribeQuery {
    #[serde(default)]
    params: bool,
}

#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
enum DescribeResponse {
    Descriptor(ToolDescriptor),
    Params(Vec<ParamSpec>),
}

async fn describe_tool(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DescribeQuery>,
) -> Result<Json<DescribeResponse>, ApiError> {
    let tool = state.registry.get(&id).await?;

    let response = if query.params {
        DescribeResponse::Params(tool.parameters())
    } else {
        DescribeResponse::Descriptor(tool.descriptor())
    };
    Ok(Json(response))
}

async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(params): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let tool = state.registry.get(&id).await?;
    let result = dispatch::invoke(tool.as_ref(), params).await?;
    Ok(Json(result))
}
