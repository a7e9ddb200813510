use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Tenants
    create_indexes(
        db,
        "tenants",
        vec![index_unique(bson::doc! { "slug": 1 })],
    )
    .await?;

    // Invoices
    create_indexes(
        db,
        "invoices",
        vec![
            index(bson::doc! { "tenant_id": 1, "status": 1, "due_date": 1 }),
            index(bson::doc! { "tenant_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Notification configs
    create_indexes(
        db,
        "notification_configs",
        vec![index_unique(bson::doc! { "tenant_id": 1 })],
    )
    .await?;

    // Notification logs
    create_indexes(
        db,
        "notification_logs",
        vec![
            index(bson::doc! { "tenant_id": 1, "created_at": -1 }),
            index(bson::doc! { "invoice_id": 1, "created_at": -1 }),
            index(bson::doc! { "status": 1, "scheduled_for": 1 }),
            index(bson::doc! { "tenant_id": 1, "status": 1, "updated_at": -1 }),
        ],
    )
    .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}
