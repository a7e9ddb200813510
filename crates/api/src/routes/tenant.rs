use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset() -> i32 {
    -180
}

#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub utc_offset_minutes: i32,
}

impl From<cobranca_db::models::Tenant> for TenantResponse {
    fn from(t: cobranca_db::models::Tenant) -> Self {
        Self {
            id: t.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: t.name,
            slug: t.slug,
            utc_offset_minutes: t.utc_offset_minutes,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, ApiError> {
    let tenants = state.tenants.list().await?;
    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTenantRequest>,
) -> Result<Json<TenantResponse>, ApiError> {
    if body.name.trim().is_empty() || body.slug.trim().is_empty() {
        return Err(ApiError::Validation("name and slug are required".to_string()));
    }
    let tenant = state
        .tenants
        .create(body.name, body.slug, body.utc_offset_minutes)
        .await?;
    Ok(Json(tenant.into()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<TenantResponse>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    let tenant = state.tenants.find_by_id(tid).await?;
    Ok(Json(tenant.into()))
}

pub fn parse_tenant_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid tenant_id".to_string()))
}
