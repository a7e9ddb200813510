use chrono::Timelike;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn scan_enqueues_only_eligible_invoices() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("aurora").await;

    app.seed_invoice(&tenant.tenant_id, 3, Some("5511999990001")).await; // reminder
    app.seed_invoice(&tenant.tenant_id, 0, Some("5511999990002")).await; // due today
    app.seed_invoice(&tenant.tenant_id, -10, Some("5511999990003")).await; // overdue
    app.seed_invoice(&tenant.tenant_id, 1, Some("5511999990004")).await; // not yet
    app.seed_invoice(&tenant.tenant_id, -70, Some("5511999990005")).await; // too old

    app.state.scanner.scan().await;

    let logs = app.list_logs(&tenant.tenant_id).await;
    assert_eq!(logs.len(), 3);

    let mut categories: Vec<&str> = logs
        .iter()
        .map(|l| l["category"].as_str().unwrap())
        .collect();
    categories.sort();
    assert_eq!(categories, vec!["due_today", "overdue", "reminder"]);
    assert!(logs.iter().all(|l| l["status"] == "queued"));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn scanning_twice_in_one_day_enqueues_once() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("dedup").await;

    app.seed_invoice(&tenant.tenant_id, 0, Some("5511999990010")).await;

    app.state.scanner.scan().await;
    app.state.scanner.scan().await;

    let logs = app.list_logs(&tenant.tenant_id).await;
    assert_eq!(logs.len(), 1, "same-day dedup must hold across scans");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn already_notified_invoice_gets_no_second_category() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("edge").await;

    // Notified as overdue earlier today; a later scan that would classify
    // it differently must still be suppressed by the per-day rule.
    let invoice_id = app
        .seed_invoice(&tenant.tenant_id, -1, Some("5511999990011"))
        .await;
    app.state.scanner.scan().await;
    app.state.scanner.scan().await;

    let logs = app.list_logs(&tenant.tenant_id).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["invoice_id"], invoice_id.as_str());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn tenant_outside_window_is_skipped() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("janela").await;

    // A one-hour window guaranteed not to contain the current UTC time.
    let now_hour = chrono::Utc::now().hour();
    let (start, end) = if now_hour < 12 {
        ("13:00", "14:00")
    } else {
        ("01:00", "02:00")
    };
    app.put_config(
        &tenant.tenant_id,
        &serde_json::json!({
            "is_active": true,
            "window_start": start,
            "window_end": end,
            "enable_reminder": true,
            "enable_due_today": true,
            "enable_overdue": true,
        }),
    )
    .await;

    app.seed_invoice(&tenant.tenant_id, 0, Some("5511999990020")).await;
    app.state.scanner.scan().await;

    let logs = app.list_logs(&tenant.tenant_id).await;
    assert!(logs.is_empty(), "outside the window nothing is enqueued");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn inactive_tenant_is_skipped() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("inativa").await;

    app.put_config(
        &tenant.tenant_id,
        &serde_json::json!({
            "is_active": false,
            "window_start": "00:00",
            "window_end": "23:59",
            "enable_reminder": true,
            "enable_due_today": true,
            "enable_overdue": true,
        }),
    )
    .await;

    app.seed_invoice(&tenant.tenant_id, 0, Some("5511999990021")).await;
    app.state.scanner.scan().await;

    assert!(app.list_logs(&tenant.tenant_id).await.is_empty());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn disabled_category_is_not_enqueued() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("toggles").await;

    app.put_config(
        &tenant.tenant_id,
        &serde_json::json!({
            "is_active": true,
            "window_start": "00:00",
            "window_end": "23:59",
            "enable_reminder": true,
            "enable_due_today": true,
            "enable_overdue": false,
        }),
    )
    .await;

    app.seed_invoice(&tenant.tenant_id, -5, Some("5511999990030")).await; // overdue, off
    app.seed_invoice(&tenant.tenant_id, 0, Some("5511999990031")).await; // due today, on

    app.state.scanner.scan().await;

    let logs = app.list_logs(&tenant.tenant_id).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["category"], "due_today");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn invoice_without_any_phone_is_silently_skipped() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("sem-fone").await;

    app.seed_invoice(&tenant.tenant_id, 0, None).await;
    app.state.scanner.scan().await;

    assert!(app.list_logs(&tenant.tenant_id).await.is_empty());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn one_tenant_failure_does_not_abort_others() {
    let app = TestApp::spawn().await;
    let healthy = app.seed_tenant("saudavel").await;
    let broken = app.seed_tenant("quebrada").await;

    // Orphan the broken tenant's config so its scan errors out.
    app.db
        .collection::<bson::Document>("tenants")
        .delete_one(bson::doc! {
            "_id": bson::oid::ObjectId::parse_str(&broken.tenant_id).unwrap()
        })
        .await
        .unwrap();

    app.seed_invoice(&healthy.tenant_id, 0, Some("5511999990040")).await;
    app.state.scanner.scan().await;

    assert_eq!(app.list_logs(&healthy.tenant_id).await.len(), 1);
}
