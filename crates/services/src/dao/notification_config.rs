use bson::{doc, oid::ObjectId};
use cobranca_db::models::NotificationConfig;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct NotificationConfigDao {
    pub base: BaseDao<NotificationConfig>,
}

impl NotificationConfigDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, NotificationConfig::COLLECTION),
        }
    }

    /// Returns the tenant's config, creating it with defaults on first read.
    pub async fn get_or_create(&self, tenant_id: ObjectId) -> DaoResult<NotificationConfig> {
        if let Some(config) = self
            .base
            .find_one(doc! { "tenant_id": tenant_id })
            .await?
        {
            return Ok(config);
        }

        let config = NotificationConfig::with_defaults(tenant_id);
        match self.base.insert_one(&config).await {
            Ok(id) => self.base.find_by_id(id).await,
            // Lost a create race; the winner's document is the truth.
            Err(DaoError::DuplicateKey(_)) => self
                .base
                .find_one(doc! { "tenant_id": tenant_id })
                .await?
                .ok_or(DaoError::NotFound),
            Err(e) => Err(e),
        }
    }

    pub async fn save(
        &self,
        tenant_id: ObjectId,
        update: ConfigUpdate,
    ) -> DaoResult<NotificationConfig> {
        // get_or_create so a save on a fresh tenant works too.
        let existing = self.get_or_create(tenant_id).await?;
        let id = existing.id.ok_or(DaoError::NotFound)?;
        self.base
            .update_by_id(
                id,
                doc! {
                    "$set": {
                        "is_active": update.is_active,
                        "window_start": &update.window_start,
                        "window_end": &update.window_end,
                        "enable_reminder": update.enable_reminder,
                        "enable_due_today": update.enable_due_today,
                        "enable_overdue": update.enable_overdue,
                    }
                },
            )
            .await?;
        self.get_or_create(tenant_id).await
    }

    pub async fn find_active(&self) -> DaoResult<Vec<NotificationConfig>> {
        self.base
            .find_many(doc! { "is_active": true }, None)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct ConfigUpdate {
    pub is_active: bool,
    pub window_start: String,
    pub window_end: String,
    pub enable_reminder: bool,
    pub enable_due_today: bool,
    pub enable_overdue: bool,
}
