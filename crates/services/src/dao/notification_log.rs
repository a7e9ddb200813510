use bson::{DateTime, doc, oid::ObjectId};
use cobranca_db::models::{Invoice, NotificationCategory, NotificationLog, NotificationStatus};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

/// Persisted work queue and audit trail for outbound notifications.
pub struct NotificationLogDao {
    pub base: BaseDao<NotificationLog>,
}

impl NotificationLogDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, NotificationLog::COLLECTION),
        }
    }

    /// Any entry for this invoice created at or after `since`, regardless of
    /// category or status. Backs the one-enqueue-per-invoice-per-day rule.
    pub async fn has_entry_since(
        &self,
        invoice_id: ObjectId,
        since: DateTime,
    ) -> DaoResult<bool> {
        self.base
            .exists(doc! { "invoice_id": invoice_id, "created_at": { "$gte": since } })
            .await
    }

    /// A queued or processing entry for (invoice, category). Best-effort
    /// uniqueness, checked before insert rather than enforced by an index.
    pub async fn has_open_entry(
        &self,
        invoice_id: ObjectId,
        category: NotificationCategory,
    ) -> DaoResult<bool> {
        self.base
            .exists(doc! {
                "invoice_id": invoice_id,
                "category": category.as_str(),
                "status": { "$in": ["queued", "processing"] },
            })
            .await
    }

    /// Inserts a Queued entry with the payer snapshot taken from the invoice.
    pub async fn enqueue(
        &self,
        invoice: &Invoice,
        category: NotificationCategory,
        target_phone: String,
    ) -> DaoResult<NotificationLog> {
        let now = DateTime::now();
        let entry = NotificationLog {
            id: None,
            tenant_id: invoice.tenant_id,
            invoice_id: invoice.id.ok_or(DaoError::NotFound)?,
            student_name: invoice.student_name.clone(),
            tutor_name: invoice.tutor_name.clone(),
            target_phone,
            category,
            status: NotificationStatus::Queued,
            scheduled_for: now,
            sent_at: None,
            attempts: 0,
            error_message: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&entry).await?;
        self.base.find_by_id(id).await
    }

    /// Queued entries ripe for delivery, oldest `scheduled_for` first.
    pub async fn fetch_due_batch(
        &self,
        now: DateTime,
        limit: i64,
    ) -> DaoResult<Vec<NotificationLog>> {
        self.base
            .find_many_limited(
                doc! { "status": "queued", "scheduled_for": { "$lte": now } },
                doc! { "scheduled_for": 1 },
                limit,
            )
            .await
    }

    /// Moves an entry from `from` to `to`, refusing moves the state machine
    /// does not allow. The filter on the current status makes the update a
    /// no-op when someone else got there first.
    pub async fn transition(
        &self,
        id: ObjectId,
        from: NotificationStatus,
        to: NotificationStatus,
    ) -> DaoResult<()> {
        if !from.can_transition(to) {
            return Err(DaoError::InvalidTransition(format!(
                "{} -> {}",
                from.as_str(),
                to.as_str()
            )));
        }

        let matched = self
            .base
            .update_one(
                doc! { "_id": id, "status": from.as_str() },
                doc! { "$set": { "status": to.as_str() } },
            )
            .await?;
        if !matched {
            return Err(DaoError::InvalidTransition(format!(
                "entry {} is no longer {}",
                id,
                from.as_str()
            )));
        }
        Ok(())
    }

    pub async fn mark_sent(&self, id: ObjectId) -> DaoResult<()> {
        self.base
            .update_one(
                doc! { "_id": id, "status": "processing" },
                doc! { "$set": {
                    "status": "sent",
                    "sent_at": DateTime::now(),
                    "error_message": null,
                } },
            )
            .await?;
        Ok(())
    }

    pub async fn mark_failed(&self, id: ObjectId, error_message: &str) -> DaoResult<()> {
        self.base
            .update_one(
                doc! { "_id": id, "status": "processing" },
                doc! {
                    "$set": { "status": "failed", "error_message": error_message },
                    "$inc": { "attempts": 1 },
                },
            )
            .await?;
        Ok(())
    }

    pub async fn cancel(&self, tenant_id: ObjectId, id: ObjectId) -> DaoResult<()> {
        let matched = self
            .base
            .update_one(
                doc! {
                    "_id": id,
                    "tenant_id": tenant_id,
                    "status": { "$in": ["queued", "processing", "failed"] },
                },
                doc! { "$set": { "status": "cancelled" } },
            )
            .await?;
        if !matched {
            return Err(DaoError::InvalidTransition(
                "entry is not cancellable".to_string(),
            ));
        }
        Ok(())
    }

    /// Re-queues this tenant's entries that failed since `since` (the
    /// tenant-local midnight). `attempts` is left alone on purpose so
    /// chronically failing recipients stay visible.
    pub async fn retry_failed_since(
        &self,
        tenant_id: ObjectId,
        since: DateTime,
    ) -> DaoResult<u64> {
        self.base
            .update_many(
                doc! {
                    "tenant_id": tenant_id,
                    "status": "failed",
                    "updated_at": { "$gte": since },
                },
                doc! { "$set": { "status": "queued", "error_message": null } },
            )
            .await
    }

    pub async fn count_status_since(
        &self,
        tenant_id: ObjectId,
        status: NotificationStatus,
        since: DateTime,
    ) -> DaoResult<u64> {
        self.base
            .count(doc! {
                "tenant_id": tenant_id,
                "status": status.as_str(),
                "updated_at": { "$gte": since },
            })
            .await
    }

    pub async fn count_since(&self, tenant_id: ObjectId, since: DateTime) -> DaoResult<u64> {
        self.base
            .count(doc! { "tenant_id": tenant_id, "updated_at": { "$gte": since } })
            .await
    }

    pub async fn list(
        &self,
        tenant_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<NotificationLog>> {
        self.base
            .find_paginated(
                doc! { "tenant_id": tenant_id },
                Some(doc! { "created_at": -1 }),
                params,
            )
            .await
    }

    pub async fn get_in_tenant(
        &self,
        tenant_id: ObjectId,
        id: ObjectId,
    ) -> DaoResult<NotificationLog> {
        self.base.find_by_id_in_tenant(tenant_id, id).await
    }
}
