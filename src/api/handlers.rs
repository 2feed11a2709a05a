//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::{Arc, MutexGuard, PoisonError};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::core::{analyze_bytes, Analysis, AnalysisCache};
use crate::error::{RangeGraphError, RangeGraphResult};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "RangeGraph API Server".to_string(),
        version: state.version.clone(),
        description: "Named range dependency analysis for Excel workbooks".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new(
                "POST",
                "/api/v1/analyze",
                "Upload .xlsx bytes; returns references, dependencies, graph and documentation",
            ),
            EndpointInfo::new(
                "POST",
                "/api/v1/translate",
                "Document and translate a single formula",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["analyze".to_string(), "translate".to_string()],
    }))
}

/// Analyze query parameters
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    /// Skip the analysis cache for this request
    #[serde(default)]
    pub nocache: bool,
}

/// POST /api/v1/analyze - Analyze an uploaded workbook
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<Analysis>>) {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err("Request body is empty; upload an .xlsx file")),
        );
    }

    let result = if params.nocache {
        analyze_off_thread(body).await
    } else {
        let key = AnalysisCache::key(&body);
        let hit = lock_cache(&state).get(&key);
        match hit {
            Some(analysis) => Ok(analysis),
            None => {
                let result = analyze_off_thread(body).await;
                if let Ok(analysis) = &result {
                    lock_cache(&state).insert(key, Arc::clone(analysis));
                }
                result
            }
        }
    };

    match result {
        Ok(analysis) => (StatusCode::OK, Json(ApiResponse::ok(analysis.as_ref().clone()))),
        Err(e) => {
            warn!(error = %e, "workbook analysis failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::err(format!("Failed to process file: {}", e))),
            )
        }
    }
}

/// Parse and analyze on the blocking pool, outside the cache lock
async fn analyze_off_thread(body: Bytes) -> RangeGraphResult<Arc<Analysis>> {
    tokio::task::spawn_blocking(move || analyze_bytes(&body).map(Arc::new))
        .await
        .map_err(|e| RangeGraphError::WorkbookLoad(format!("analysis task failed: {}", e)))?
}

fn lock_cache(state: &AppState) -> MutexGuard<'_, AnalysisCache> {
    state.cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Translate request
#[derive(Deserialize)]
pub struct TranslateRequest {
    pub formula: Option<String>,
}

/// Translate response
#[derive(Serialize, Default)]
pub struct TranslateResponse {
    pub formula: String,
    pub documentation: String,
    pub expression: String,
}

/// POST /api/v1/translate - Document and translate one formula
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> impl IntoResponse {
    let row = state.annotator.annotate_formula("", req.formula.as_deref());
    Json(ApiResponse::ok(TranslateResponse {
        formula: row.excel_formula,
        documentation: row.documentation,
        expression: row.translated_expression,
    }))
}
