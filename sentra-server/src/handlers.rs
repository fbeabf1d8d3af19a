use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use sentra_core::{ScanLifecycle, ScanQueue};
use sentra_model::ScanId;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ScanLifecycle>,
    pub queue: Arc<dyn ScanQueue>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/scans", get(list_scans).post(create_scan))
        .route("/api/scans/{id}", get(get_scan))
        .route("/api/scans/{id}/results", get(get_results))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct CreateScanRequest {
    target: String,
}

async fn create_scan(
    State(state): State<AppState>,
    Json(request): Json<CreateScanRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let scan = state.lifecycle.submit(&request.target).await?;
    state.queue.enqueue(scan.id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Scan created and queued",
            "scan": scan,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    50
}

async fn list_scans(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Value>> {
    let limit = pagination.limit.clamp(1, 100);
    let offset = pagination.offset.max(0);
    let scans = state.lifecycle.list_scans(limit, offset).await?;
    let count = scans.len();
    Ok(Json(json!({
        "scans": scans,
        "pagination": {
            "limit": limit,
            "offset": offset,
            "count": count,
        },
    })))
}

async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let scan = state.lifecycle.scan(parse_scan_id(&id)?).await?;
    Ok(Json(json!({ "scan": scan })))
}

async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let results = state.lifecycle.results(parse_scan_id(&id)?).await?;
    Ok(Json(json!({
        "scan": results.scan,
        "findings": results.findings,
        "summary": results.summary,
    })))
}

fn parse_scan_id(raw: &str) -> Result<ScanId, AppError> {
    raw.parse::<Uuid>()
        .map(ScanId::from)
        .map_err(|_| AppError::not_found("Scan not found"))
}
