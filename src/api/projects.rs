/// Project and pipeline REST API endpoints
///
/// Thin translation between HTTP requests and [`ProjectStore`] operations.
/// Missing fields are accepted by the extractors and rejected by the store so
/// that every validation failure produces the same 400 body.

use crate::api::error::ApiError;
use crate::project::{PipelineEntry, Pipelines, ProjectStore};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Project store over the configured persistence service
    pub store: ProjectStore,
}

/// Body of POST/PUT/DELETE /api/pipelines
///
/// `pipelineUrl` is ignored by DELETE. Fields are kept as raw JSON so that
/// numbers and booleans are accepted and stored in their string form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineRequest {
    pub project_name: Option<Value>,
    pub pipeline_name: Option<Value>,
    pub pipeline_url: Option<Value>,
}

impl PipelineRequest {
    pub fn project_name(&self) -> String {
        field_text(&self.project_name)
    }

    pub fn pipeline_name(&self) -> String {
        field_text(&self.pipeline_name)
    }

    pub fn pipeline_url(&self) -> String {
        field_text(&self.pipeline_url)
    }
}

/// String form of a scalar body field; null, arrays and objects count as missing
fn field_text(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Query of GET /api/pipeline-url
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineUrlQuery {
    pub project_name: Option<String>,
    pub pipeline_name: Option<String>,
}

/// Response for create/update operations
#[derive(Debug, Serialize)]
pub struct PipelinesResponse {
    pub message: String,
    pub data: Pipelines,
}

/// Create project/pipeline routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/pipelines/{project_name}", get(get_pipelines))
        .route("/api/pipeline-url", get(get_pipeline_url))
        .route("/api/all-pipelines", get(list_all_pipelines))
        .route(
            "/api/pipelines",
            post(upsert_pipeline)
                .put(update_pipeline)
                .delete(delete_pipeline),
        )
}

/// Treat an unparsable body like an empty one so validation reports it
fn body_or_default(payload: Result<Json<PipelineRequest>, JsonRejection>) -> PipelineRequest {
    match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("⚠️ Unreadable pipeline request body: {}", rejection);
            PipelineRequest::default()
        }
    }
}

/// Same as [`body_or_default`] for the query string
fn query_or_default(query: Result<Query<PipelineUrlQuery>, QueryRejection>) -> PipelineUrlQuery {
    match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!("⚠️ Unreadable pipeline URL query: {}", rejection);
            PipelineUrlQuery::default()
        }
    }
}

/// List all project names
///
/// GET /api/projects
/// Returns: { "projects": ["alpha", "beta"] }
async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let projects = state
        .store
        .list_project_names()
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch projects"))?;

    Ok(Json(json!({ "projects": projects })))
}

/// Get every pipeline of a project
///
/// GET /api/pipelines/{project_name}
/// Returns: { "pipelines": { "build": "http://..." } }
async fn get_pipelines(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let pipelines = state
        .store
        .get_pipelines(&project_name)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch pipelines"))?;

    Ok(Json(json!({ "pipelines": pipelines })))
}

/// Get one pipeline URL
///
/// GET /api/pipeline-url?projectName=...&pipelineName=...
/// Returns: { "pipelineUrl": "http://..." }
async fn get_pipeline_url(
    State(state): State<AppState>,
    query: Result<Query<PipelineUrlQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let query = query_or_default(query);

    let url = state
        .store
        .get_pipeline_url(
            query.project_name.as_deref().unwrap_or_default(),
            query.pipeline_name.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch pipeline URL"))?;

    Ok(Json(json!({ "pipelineUrl": url })))
}

/// List every pipeline across projects
///
/// GET /api/all-pipelines
/// Returns: { "pipelines": [{ "projectName": "...", "pipelineName": "...", "url": "..." }] }
async fn list_all_pipelines(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pipelines: Vec<PipelineEntry> = state
        .store
        .list_all_pipelines()
        .await
        .map_err(|e| ApiError::from_store(e, "Error fetching pipelines"))?;

    Ok(Json(json!({ "pipelines": pipelines })))
}

/// Create or update a pipeline, creating the project when needed
///
/// POST /api/pipelines
/// Body: { "projectName": "...", "pipelineName": "...", "pipelineUrl": "..." }
async fn upsert_pipeline(
    State(state): State<AppState>,
    payload: Result<Json<PipelineRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PipelinesResponse>), ApiError> {
    let request = body_or_default(payload);

    let data = state
        .store
        .upsert_pipeline(
            &request.project_name(),
            &request.pipeline_name(),
            &request.pipeline_url(),
        )
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to save pipeline"))?;

    Ok((
        StatusCode::CREATED,
        Json(PipelinesResponse {
            message: "Pipeline URL added/updated successfully".to_string(),
            data,
        }),
    ))
}

/// Set a pipeline URL in an existing project
///
/// PUT /api/pipelines
/// Body: { "projectName": "...", "pipelineName": "...", "pipelineUrl": "..." }
async fn update_pipeline(
    State(state): State<AppState>,
    payload: Result<Json<PipelineRequest>, JsonRejection>,
) -> Result<Json<PipelinesResponse>, ApiError> {
    let request = body_or_default(payload);

    let data = state
        .store
        .update_pipeline(
            &request.project_name(),
            &request.pipeline_name(),
            &request.pipeline_url(),
        )
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update pipeline"))?;

    Ok(Json(PipelinesResponse {
        message: "Pipeline updated successfully".to_string(),
        data,
    }))
}

/// Delete a pipeline
///
/// DELETE /api/pipelines
/// Body: { "projectName": "...", "pipelineName": "..." }
async fn delete_pipeline(
    State(state): State<AppState>,
    payload: Result<Json<PipelineRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = body_or_default(payload);

    state
        .store
        .delete_pipeline(
            &request.project_name(),
            &request.pipeline_name(),
        )
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete pipeline"))?;

    Ok(Json(json!({ "message": "Pipeline deleted successfully" })))
}
