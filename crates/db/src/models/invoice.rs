use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tenant_id: ObjectId,
    pub description: String,
    pub amount_cents: i64,
    pub due_date: DateTime,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub payment_channel: PaymentChannel,
    /// PIX copy-paste code or boleto digitable line.
    pub payment_code: Option<String>,
    /// Boleto PDF location.
    pub document_url: Option<String>,
    // Payer contacts are denormalized onto the invoice at creation time.
    pub student_name: String,
    pub student_phone: Option<String>,
    pub tutor_name: Option<String>,
    pub tutor_phone: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentChannel {
    Pix,
    Boleto,
}

impl Invoice {
    pub const COLLECTION: &'static str = "invoices";

    /// Phone the collection message should go to: the tutor when one is on
    /// file, otherwise the student. `None` means the invoice is unreachable.
    pub fn target_phone(&self) -> Option<&str> {
        self.tutor_phone
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.student_phone.as_deref().filter(|p| !p.is_empty()))
    }

    /// Name matching [`Invoice::target_phone`] resolution.
    pub fn payer_name(&self) -> &str {
        match (&self.tutor_phone, &self.tutor_name) {
            (Some(p), Some(n)) if !p.is_empty() => n,
            _ => &self.student_name,
        }
    }
}
