use chrono::{Duration, Utc};

use crate::fixtures::test_app::TestApp;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn daily_stats_follow_the_pipeline() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("painel").await;

    app.seed_invoice(&tenant.tenant_id, 0, Some("5511977770001")).await;
    app.seed_invoice(&tenant.tenant_id, -3, Some("5511977770002")).await;

    app.state.scanner.scan().await;
    let stats = app.stats(&tenant.tenant_id).await;
    assert_eq!(stats["queued"], 2);
    assert_eq!(stats["sent"], 0);
    assert_eq!(stats["total_today"], 2);

    app.state.processor.drain().await;
    let stats = app.stats(&tenant.tenant_id).await;
    assert_eq!(stats["queued"], 0);
    assert_eq!(stats["sent"], 2);
    assert_eq!(stats["failed"], 0);
    assert_eq!(stats["total_today"], 2);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn forecast_previews_tomorrow_without_side_effects() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("previsao").await;

    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    // Relative to tomorrow: +3 reminder, 0 due today, -10 overdue.
    app.seed_invoice(&tenant.tenant_id, 4, Some("5511977770010")).await;
    app.seed_invoice(&tenant.tenant_id, 1, Some("5511977770011")).await;
    app.seed_invoice(&tenant.tenant_id, -9, Some("5511977770012")).await;
    // Unreachable payer never shows up in the forecast.
    app.seed_invoice(&tenant.tenant_id, 1, None).await;

    let before = app.stats(&tenant.tenant_id).await;

    let forecast = app
        .get_json(&format!(
            "/api/tenant/{}/notification/forecast?date={}",
            tenant.tenant_id,
            tomorrow.format("%Y-%m-%d")
        ))
        .await;

    assert_eq!(forecast["total_expected"], 3);
    assert_eq!(forecast["breakdown"]["reminder"], 1);
    assert_eq!(forecast["breakdown"]["due_today"], 1);
    assert_eq!(forecast["breakdown"]["overdue"], 1);

    // Purity: the dry run wrote nothing.
    let after = app.stats(&tenant.tenant_id).await;
    assert_eq!(before, after);
    assert!(app.list_logs(&tenant.tenant_id).await.is_empty());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn forecast_honors_category_toggles() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("previsao-toggle").await;

    app.put_config(
        &tenant.tenant_id,
        &serde_json::json!({
            "is_active": true,
            "window_start": "00:00",
            "window_end": "23:59",
            "enable_reminder": false,
            "enable_due_today": true,
            "enable_overdue": true,
        }),
    )
    .await;

    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    app.seed_invoice(&tenant.tenant_id, 4, Some("5511977770020")).await; // reminder, off
    app.seed_invoice(&tenant.tenant_id, 1, Some("5511977770021")).await; // due today

    let forecast = app
        .get_json(&format!(
            "/api/tenant/{}/notification/forecast?date={}",
            tenant.tenant_id,
            tomorrow.format("%Y-%m-%d")
        ))
        .await;

    assert_eq!(forecast["total_expected"], 1);
    assert_eq!(forecast["breakdown"]["reminder"], 0);
    assert_eq!(forecast["breakdown"]["due_today"], 1);
}
