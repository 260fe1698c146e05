use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::warn;

use adoptsignal_common::{AdoptSignalError, CompanyRef, SourceId};
use adoptsignal_scan::batch;

use crate::AppState;

// --- Query structs ---

#[derive(Deserialize)]
pub struct CompanyQuery {
    domain: Option<String>,
    org: Option<String>,
}

#[derive(Deserialize)]
pub struct ScanQuery {
    domain: Option<String>,
    org: Option<String>,
    /// Comma-separated source subset.
    sources: Option<String>,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    /// CRM-style records: bare names or objects with name/domain fields.
    companies: Vec<serde_json::Value>,
    sources: Option<Vec<String>>,
}

// --- Helpers ---

fn company_ref(name: String, domain: Option<String>, org: Option<String>) -> CompanyRef {
    CompanyRef {
        name,
        domain,
        github_org: org,
    }
}

fn parse_source_list(raw: &str) -> Result<Vec<SourceId>, Response> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            SourceId::from_str_loose(s).ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": format!("unknown source: {s}") })),
                )
                    .into_response()
            })
        })
        .collect()
}

fn error_response(err: AdoptSignalError) -> Response {
    let status = match &err {
        AdoptSignalError::Config(_) => StatusCode::BAD_REQUEST,
        AdoptSignalError::SourceUnavailable { .. } => StatusCode::BAD_GATEWAY,
        AdoptSignalError::Precondition(_) | AdoptSignalError::Anyhow(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(error = %err, "Request failed");
    }
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

// --- Handlers ---

pub async fn api_check(
    State(state): State<Arc<AppState>>,
    Path(company): Path<String>,
    Query(params): Query<CompanyQuery>,
) -> Response {
    let company = company_ref(company, params.domain, params.org);
    match state.scanner.scan_fast(&company).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_scan(
    State(state): State<Arc<AppState>>,
    Path(company): Path<String>,
    Query(params): Query<ScanQuery>,
) -> Response {
    let sources = match params.sources.as_deref().map(parse_source_list) {
        Some(Ok(sources)) => Some(sources),
        Some(Err(response)) => return response,
        None => None,
    };

    let company = company_ref(company, params.domain, params.org);
    match state.scanner.scan(&company, sources.as_deref()).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Response {
    let sources = match request.sources.as_deref() {
        Some(raw) => {
            let mut sources = Vec::new();
            for s in raw {
                let Some(source) = SourceId::from_str_loose(s) else {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({ "error": format!("unknown source: {s}") })),
                    )
                        .into_response();
                };
                sources.push(source);
            }
            Some(sources)
        }
        None => None,
    };

    let companies = match batch::parse_crm_records(&request.companies) {
        Ok(companies) => companies,
        Err(e) => return error_response(e),
    };

    match batch::scan_companies(&state.scanner, &companies, sources.as_deref()).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_source_findings(
    State(state): State<Arc<AppState>>,
    Path((source, company)): Path<(String, String)>,
    Query(params): Query<CompanyQuery>,
) -> Response {
    let Some(source) = SourceId::from_str_loose(&source) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("unknown source: {source}") })),
        )
            .into_response();
    };

    let company = company_ref(company, params.domain, params.org);
    match state.scanner.raw_findings(source, &company).await {
        Ok(findings) => Json(findings).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_status(State(state): State<Arc<AppState>>) -> Response {
    let status = state.scanner.status().await;
    Json(status).into_response()
}
