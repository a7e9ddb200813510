use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use chrono::NaiveDate;
use cobranca_db::models::NotificationLog;
use cobranca_services::dao::base::PaginationParams;
use cobranca_services::notification::stats::{DailyStats, Forecast};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

use super::tenant::parse_tenant_id;

#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub id: String,
    pub invoice_id: String,
    pub student_name: String,
    pub tutor_name: Option<String>,
    pub target_phone: String,
    pub category: String,
    pub status: String,
    pub scheduled_for: String,
    pub sent_at: Option<String>,
    pub attempts: u32,
    pub error_message: Option<String>,
    pub created_at: String,
}

impl From<NotificationLog> for LogEntryResponse {
    fn from(e: NotificationLog) -> Self {
        Self {
            id: e.id.map(|id| id.to_hex()).unwrap_or_default(),
            invoice_id: e.invoice_id.to_hex(),
            student_name: e.student_name,
            tutor_name: e.tutor_name,
            target_phone: e.target_phone,
            category: e.category.as_str().to_string(),
            status: e.status.as_str().to_string(),
            scheduled_for: e.scheduled_for.try_to_rfc3339_string().unwrap_or_default(),
            sent_at: e.sent_at.and_then(|t| t.try_to_rfc3339_string().ok()),
            attempts: e.attempts,
            error_message: e.error_message,
            created_at: e.created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    let result = state.logs.list(tid, &params).await?;

    let items: Vec<LogEntryResponse> = result.items.into_iter().map(Into::into).collect();
    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn stats(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<DailyStats>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    Ok(Json(state.reporter.daily_stats(tid).await?))
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// "YYYY-MM-DD"; serde rejects anything else with a 400.
    pub date: NaiveDate,
}

pub async fn forecast(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Forecast>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    Ok(Json(state.reporter.forecast(tid, query.date).await?))
}

/// Manual trigger: one scan pass followed by one drain cycle. The drain's
/// reentrancy guard makes this safe alongside the cron jobs.
pub async fn run(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.scanner.scan().await;
    state.processor.drain().await;
    Ok(Json(serde_json::json!({ "triggered": true })))
}

pub async fn retry_failed(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    let requeued = state.processor.retry_failed_today(tid).await?;
    Ok(Json(serde_json::json!({ "requeued": requeued })))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(String, String)>,
) -> Result<Json<LogEntryResponse>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    let eid = ObjectId::parse_str(&entry_id)
        .map_err(|_| ApiError::BadRequest("Invalid entry_id".to_string()))?;

    state.logs.cancel(tid, eid).await?;
    let entry = state.logs.get_in_tenant(tid, eid).await?;
    state.events.emit_updated(entry.clone());
    Ok(Json(entry.into()))
}
