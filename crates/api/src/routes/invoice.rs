use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use cobranca_db::models::{Invoice, PaymentChannel};
use cobranca_services::dao::base::PaginationParams;
use cobranca_services::dao::invoice::NewInvoice;
use cobranca_services::notification::clock;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

use super::tenant::parse_tenant_id;

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub description: String,
    pub amount_cents: i64,
    /// Tenant-local due date, "YYYY-MM-DD".
    pub due_date: NaiveDate,
    pub payment_channel: PaymentChannel,
    pub payment_code: Option<String>,
    pub document_url: Option<String>,
    pub student_name: String,
    pub student_phone: Option<String>,
    pub tutor_name: Option<String>,
    pub tutor_phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub description: String,
    pub amount_cents: i64,
    pub due_date: String,
    pub status: String,
    pub payment_channel: String,
    pub student_name: String,
    pub tutor_name: Option<String>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        Self {
            id: i.id.map(|id| id.to_hex()).unwrap_or_default(),
            description: i.description,
            amount_cents: i.amount_cents,
            due_date: i.due_date.try_to_rfc3339_string().unwrap_or_default(),
            status: format!("{:?}", i.status).to_lowercase(),
            payment_channel: format!("{:?}", i.payment_channel).to_lowercase(),
            student_name: i.student_name,
            tutor_name: i.tutor_name,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    if body.amount_cents <= 0 {
        return Err(ApiError::Validation("amount_cents must be positive".to_string()));
    }

    let tenant = state.tenants.find_by_id(tid).await?;
    let invoice = state
        .invoices
        .create(
            tid,
            NewInvoice {
                description: body.description,
                amount_cents: body.amount_cents,
                due_date: clock::date_to_bson(body.due_date, tenant.utc_offset_minutes),
                payment_channel: body.payment_channel,
                payment_code: body.payment_code,
                document_url: body.document_url,
                student_name: body.student_name,
                student_phone: body.student_phone,
                tutor_name: body.tutor_name,
                tutor_phone: body.tutor_phone,
            },
        )
        .await?;

    Ok(Json(invoice.into()))
}

pub async fn list(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    let result = state.invoices.list(tid, &params).await?;

    let items: Vec<InvoiceResponse> = result.items.into_iter().map(Into::into).collect();
    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}
