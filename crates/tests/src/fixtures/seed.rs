use chrono::{Duration, NaiveDate, Utc};
use serde_json::{Value, json};

use super::test_app::TestApp;

/// Result of seeding a test tenant.
pub struct SeededTenant {
    pub tenant_id: String,
    pub slug: String,
}

impl TestApp {
    /// Create a tenant at UTC (offset 0) so test dates line up with the
    /// host clock regardless of where CI runs.
    pub async fn seed_tenant(&self, slug: &str) -> SeededTenant {
        let body = self
            .post_json(
                "/api/tenant",
                &json!({
                    "name": format!("Escola {slug}"),
                    "slug": slug,
                    "utc_offset_minutes": 0,
                }),
            )
            .await;
        let tenant_id = body["id"].as_str().expect("tenant id").to_string();

        // Widest possible window so scans are never skipped for timing.
        self.put_config(
            &tenant_id,
            &json!({
                "is_active": true,
                "window_start": "00:00",
                "window_end": "23:59",
                "enable_reminder": true,
                "enable_due_today": true,
                "enable_overdue": true,
            }),
        )
        .await;

        SeededTenant {
            tenant_id,
            slug: slug.to_string(),
        }
    }

    pub async fn put_config(&self, tenant_id: &str, config: &Value) -> Value {
        let resp = self
            .client
            .put(self.url(&format!("/api/tenant/{tenant_id}/notification/config")))
            .json(config)
            .send()
            .await
            .expect("PUT config failed");
        assert!(
            resp.status().is_success(),
            "PUT config failed with {}",
            resp.status()
        );
        resp.json().await.expect("Config response was not JSON")
    }

    /// Create a pending PIX invoice due `days_from_now` days from today
    /// (tenant-local = UTC in tests), payable by the given tutor phone.
    pub async fn seed_invoice(
        &self,
        tenant_id: &str,
        days_from_now: i64,
        tutor_phone: Option<&str>,
    ) -> String {
        let due: NaiveDate = (Utc::now() + Duration::days(days_from_now)).date_naive();
        let body = self
            .post_json(
                &format!("/api/tenant/{tenant_id}/invoice"),
                &json!({
                    "description": "Mensalidade",
                    "amount_cents": 45_000,
                    "due_date": due.format("%Y-%m-%d").to_string(),
                    "payment_channel": "pix",
                    "payment_code": "00020126PIXCOPYPASTE",
                    "student_name": "Ana Souza",
                    "student_phone": null,
                    "tutor_name": tutor_phone.map(|_| "Carlos Souza"),
                    "tutor_phone": tutor_phone,
                }),
            )
            .await;
        body["id"].as_str().expect("invoice id").to_string()
    }

    pub async fn run_pipeline(&self, tenant_id: &str) {
        self.post_empty(&format!("/api/tenant/{tenant_id}/notification/run"))
            .await;
    }

    pub async fn list_logs(&self, tenant_id: &str) -> Vec<Value> {
        let body = self
            .get_json(&format!(
                "/api/tenant/{tenant_id}/notification?per_page=100"
            ))
            .await;
        body["items"].as_array().expect("items array").clone()
    }

    pub async fn stats(&self, tenant_id: &str) -> Value {
        self.get_json(&format!("/api/tenant/{tenant_id}/notification/stats"))
            .await
    }
}
