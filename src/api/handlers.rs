use crate::error::{ExtractError, MatchError};
use crate::extract::parse_payload;
use crate::models::{DeliveryNote, Document, DocumentTriple, Invoice, MatchReport, PurchaseOrder};
use crate::service::{export_csv, MatchOutcome, ParsedDocuments};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;

/// 请求体: 三份已结构化的单据 (JSON 对象，或带代码块的字符串)
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub po: Value,
    pub dn: Value,
    pub inv: Value,
}

/// 请求体: 批量三单
#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub triples: Vec<MatchRequest>,
}

/// 请求体: base64 编码的三份 PDF
#[derive(Debug, Deserialize)]
pub struct PdfMatchRequest {
    pub po: String,
    pub dn: String,
    pub inv: String,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub success: bool,
    pub report: MatchReport,
    pub summary: String,
    pub parsed_data: ParsedDocuments,
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub success: bool,
    pub message: String,
    pub reports: Vec<MatchReport>,
}

/// 失败响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    let response = ErrorResponse {
        success: false,
        message: format!("Error: {}", message),
    };
    (status, Json(response)).into_response()
}

fn match_error(e: MatchError) -> Response {
    tracing::warn!(error = %e, "Rejected malformed payload");
    error_response(StatusCode::BAD_REQUEST, e.to_string())
}

fn extract_error(e: ExtractError) -> Response {
    match e {
        ExtractError::Malformed(inner) => match_error(inner),
        other => {
            tracing::error!(error = %other, "Extraction failed");
            error_response(StatusCode::BAD_GATEWAY, other.to_string())
        }
    }
}

fn ingest<D: Document>(value: Value) -> Result<D, MatchError> {
    match value {
        Value::String(raw) => parse_payload(&raw),
        other => D::from_value(other),
    }
}

fn ingest_triple(req: MatchRequest) -> Result<ParsedDocuments, MatchError> {
    Ok(ParsedDocuments {
        po: ingest::<PurchaseOrder>(req.po)?,
        dn: ingest::<DeliveryNote>(req.dn)?,
        inv: ingest::<Invoice>(req.inv)?,
    })
}

fn outcome_response(outcome: MatchOutcome) -> Response {
    let response = MatchResponse {
        success: true,
        report: outcome.report,
        summary: outcome.summary,
        parsed_data: outcome.documents,
        matched_at: Utc::now(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 对已结构化的三单对账
pub async fn match_documents(State(state): State<AppState>, Json(req): Json<MatchRequest>) -> Response {
    match ingest_triple(req) {
        Ok(documents) => outcome_response(MatchOutcome::from_documents(&state.engine, documents)),
        Err(e) => match_error(e),
    }
}

/// 批量对账
pub async fn batch_match(State(state): State<AppState>, Json(req): Json<BatchMatchRequest>) -> Response {
    let triples = match req
        .triples
        .into_iter()
        .map(|t| ingest_triple(t).map(|d| DocumentTriple { po: d.po, dn: d.dn, inv: d.inv }))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(triples) => triples,
        Err(e) => return match_error(e),
    };

    // rayon 并行计算放到阻塞线程池，避免占用异步 worker
    let engine = state.engine.clone();
    let reports = match tokio::task::spawn_blocking(move || engine.cross_reference_batch(&triples)).await {
        Ok(reports) => reports,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let mismatched = reports.iter().filter(|r| !r.all_matched()).count();
    let response = BatchMatchResponse {
        success: true,
        message: format!(
            "Matched {} document sets, {} with discrepancies",
            reports.len(),
            mismatched
        ),
        reports,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 上传三份 PDF，抽取后对账
pub async fn match_pdfs(State(state): State<AppState>, Json(req): Json<PdfMatchRequest>) -> Response {
    let Some(workflow) = state.workflow.clone() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "document extraction is not configured".to_string(),
        );
    };

    let mut decoded = Vec::with_capacity(3);
    for (label, data) in [("po", &req.po), ("dn", &req.dn), ("inv", &req.inv)] {
        match STANDARD.decode(data.trim()) {
            Ok(bytes) => decoded.push(bytes),
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, format!("invalid base64 in `{}`: {}", label, e))
            }
        }
    }

    match workflow.run(&decoded[0], &decoded[1], &decoded[2]).await {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => extract_error(e),
    }
}

/// 导出对账明细 CSV
pub async fn match_csv(State(state): State<AppState>, Json(req): Json<MatchRequest>) -> Response {
    let documents = match ingest_triple(req) {
        Ok(documents) => documents,
        Err(e) => return match_error(e),
    };

    let report = state
        .engine
        .cross_reference(&documents.po, &documents.dn, &documents.inv);
    match export_csv(&report) {
        Ok(csv) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
