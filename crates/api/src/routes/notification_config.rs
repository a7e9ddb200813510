use axum::{
    Json,
    extract::{Path, State},
};
use cobranca_db::models::NotificationConfig;
use cobranca_services::dao::notification_config::ConfigUpdate;
use cobranca_services::notification::clock::parse_hhmm;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{error::ApiError, state::AppState};

use super::tenant::parse_tenant_id;

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub tenant_id: String,
    pub is_active: bool,
    pub window_start: String,
    pub window_end: String,
    pub enable_reminder: bool,
    pub enable_due_today: bool,
    pub enable_overdue: bool,
}

impl From<NotificationConfig> for ConfigResponse {
    fn from(c: NotificationConfig) -> Self {
        Self {
            tenant_id: c.tenant_id.to_hex(),
            is_active: c.is_active,
            window_start: c.window_start,
            window_end: c.window_end,
            enable_reminder: c.enable_reminder,
            enable_due_today: c.enable_due_today,
            enable_overdue: c.enable_overdue,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConfigRequest {
    pub is_active: bool,
    #[validate(custom(function = "validate_hhmm"))]
    pub window_start: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub window_end: String,
    pub enable_reminder: bool,
    pub enable_due_today: bool,
    pub enable_overdue: bool,
}

fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    parse_hhmm(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("hhmm"))
}

pub async fn get(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    // Existence check so a bogus tenant id 404s instead of lazily
    // creating an orphan config.
    state.tenants.find_by_id(tid).await?;
    let config = state.configs.get_or_create(tid).await?;
    Ok(Json(config.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(body): Json<UpdateConfigRequest>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let tid = parse_tenant_id(&tenant_id)?;
    state.tenants.find_by_id(tid).await?;

    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match (parse_hhmm(&body.window_start), parse_hhmm(&body.window_end)) {
        (Some(start), Some(end)) if start < end => {}
        _ => {
            return Err(ApiError::Validation(
                "window_start must be before window_end".to_string(),
            ));
        }
    }

    let config = state
        .configs
        .save(
            tid,
            ConfigUpdate {
                is_active: body.is_active,
                window_start: body.window_start,
                window_end: body.window_end,
                enable_reminder: body.enable_reminder,
                enable_due_today: body.enable_due_today,
                enable_overdue: body.enable_overdue,
            },
        )
        .await?;

    Ok(Json(config.into()))
}
