use serde_json::json;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn config_is_created_with_defaults_on_first_read() {
    let app = TestApp::spawn().await;
    let tenant = app
        .post_json(
            "/api/tenant",
            &json!({ "name": "Escola Fresca", "slug": "fresca" }),
        )
        .await;
    let tenant_id = tenant["id"].as_str().unwrap();

    let config = app
        .get_json(&format!("/api/tenant/{tenant_id}/notification/config"))
        .await;

    assert_eq!(config["is_active"], true);
    assert_eq!(config["window_start"], "08:00");
    assert_eq!(config["window_end"], "20:00");
    assert_eq!(config["enable_reminder"], true);
    assert_eq!(config["enable_due_today"], true);
    assert_eq!(config["enable_overdue"], true);

    // Reading again returns the same stored document, not a new one.
    let count = app
        .db
        .collection::<bson::Document>("notification_configs")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    app.get_json(&format!("/api/tenant/{tenant_id}/notification/config"))
        .await;
    let count_after = app
        .db
        .collection::<bson::Document>("notification_configs")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(count, count_after);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn config_round_trips_through_update() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("ajuste").await;

    let updated = app
        .put_config(
            &tenant.tenant_id,
            &json!({
                "is_active": false,
                "window_start": "09:30",
                "window_end": "17:45",
                "enable_reminder": false,
                "enable_due_today": true,
                "enable_overdue": false,
            }),
        )
        .await;
    assert_eq!(updated["window_start"], "09:30");

    let read_back = app
        .get_json(&format!(
            "/api/tenant/{}/notification/config",
            tenant.tenant_id
        ))
        .await;
    assert_eq!(read_back["is_active"], false);
    assert_eq!(read_back["window_start"], "09:30");
    assert_eq!(read_back["window_end"], "17:45");
    assert_eq!(read_back["enable_reminder"], false);
    assert_eq!(read_back["enable_overdue"], false);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn malformed_windows_are_rejected() {
    let app = TestApp::spawn().await;
    let tenant = app.seed_tenant("invalida").await;

    let cases = [
        json!({
            "is_active": true,
            "window_start": "25:00",
            "window_end": "18:00",
            "enable_reminder": true, "enable_due_today": true, "enable_overdue": true,
        }),
        json!({
            "is_active": true,
            "window_start": "banana",
            "window_end": "18:00",
            "enable_reminder": true, "enable_due_today": true, "enable_overdue": true,
        }),
        // start must come before end
        json!({
            "is_active": true,
            "window_start": "18:00",
            "window_end": "08:00",
            "enable_reminder": true, "enable_due_today": true, "enable_overdue": true,
        }),
    ];

    for body in cases {
        let resp = app
            .client
            .put(app.url(&format!(
                "/api/tenant/{}/notification/config",
                tenant.tenant_id
            )))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 422, "body: {body}");
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn unknown_tenant_is_a_404_and_bad_id_a_400() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url(&format!(
            "/api/tenant/{}/notification/config",
            bson::oid::ObjectId::new().to_hex()
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .client
        .get(app.url("/api/tenant/not-an-id/notification/config"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}
