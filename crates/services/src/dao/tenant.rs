use bson::{DateTime, doc, oid::ObjectId};
use cobranca_db::models::Tenant;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct TenantDao {
    pub base: BaseDao<Tenant>,
}

impl TenantDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Tenant::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        slug: String,
        utc_offset_minutes: i32,
    ) -> DaoResult<Tenant> {
        let now = DateTime::now();
        let tenant = Tenant {
            id: None,
            name,
            slug,
            utc_offset_minutes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let id = self.base.insert_one(&tenant).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(&self) -> DaoResult<Vec<Tenant>> {
        self.base
            .find_many(doc! { "deleted_at": null }, Some(doc! { "name": 1 }))
            .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<Tenant> {
        self.base.find_by_id(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Tenant> {
        self.base
            .find_one(doc! { "slug": slug, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }
}
