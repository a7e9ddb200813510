use bson::{DateTime, doc, oid::ObjectId};
use cobranca_db::models::{Invoice, InvoiceStatus, PaymentChannel};
use mongodb::Database;

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct InvoiceDao {
    pub base: BaseDao<Invoice>,
}

pub struct NewInvoice {
    pub description: String,
    pub amount_cents: i64,
    pub due_date: DateTime,
    pub payment_channel: PaymentChannel,
    pub payment_code: Option<String>,
    pub document_url: Option<String>,
    pub student_name: String,
    pub student_phone: Option<String>,
    pub tutor_name: Option<String>,
    pub tutor_phone: Option<String>,
}

impl InvoiceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Invoice::COLLECTION),
        }
    }

    pub async fn create(&self, tenant_id: ObjectId, new: NewInvoice) -> DaoResult<Invoice> {
        let now = DateTime::now();
        let invoice = Invoice {
            id: None,
            tenant_id,
            description: new.description,
            amount_cents: new.amount_cents,
            due_date: new.due_date,
            status: InvoiceStatus::Pending,
            payment_channel: new.payment_channel,
            payment_code: new.payment_code,
            document_url: new.document_url,
            student_name: new.student_name,
            student_phone: new.student_phone,
            tutor_name: new.tutor_name,
            tutor_phone: new.tutor_phone,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&invoice).await?;
        self.base.find_by_id(id).await
    }

    /// Pending invoices due inside `[from, to]`, due-date ascending. The
    /// caller still classifies each invoice; this is only a pre-filter.
    pub async fn find_pending_in_range(
        &self,
        tenant_id: ObjectId,
        from: DateTime,
        to: DateTime,
    ) -> DaoResult<Vec<Invoice>> {
        self.base
            .find_many(
                doc! {
                    "tenant_id": tenant_id,
                    "status": "pending",
                    "due_date": { "$gte": from, "$lte": to },
                },
                Some(doc! { "due_date": 1 }),
            )
            .await
    }

    pub async fn find_by_id_in_tenant(
        &self,
        tenant_id: ObjectId,
        id: ObjectId,
    ) -> DaoResult<Invoice> {
        self.base.find_by_id_in_tenant(tenant_id, id).await
    }

    pub async fn list(
        &self,
        tenant_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Invoice>> {
        self.base
            .find_paginated(
                doc! { "tenant_id": tenant_id },
                Some(doc! { "due_date": -1 }),
                params,
            )
            .await
    }
}
