//! Repositorio del catálogo de servicios

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::service::Service;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, workshop_id: Uuid, name: String) -> AppResult<Service>;
    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<Service>>;
    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Service>>;
    async fn rename(&self, id: Uuid, name: String) -> AppResult<Service>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Número de órdenes de trabajo que usan el servicio
    async fn usage_count(&self, id: Uuid) -> AppResult<i64>;
}

pub struct PgServiceRepository {
    pool: PgPool,
}

impl PgServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PgServiceRepository {
    async fn create(&self, workshop_id: Uuid, name: String) -> AppResult<Service> {
        let now = Utc::now();
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (id, workshop_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE id = $1 AND workshop_id = $2",
        )
        .bind(id)
        .bind(workshop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE workshop_id = $1 ORDER BY name ASC",
        )
        .bind(workshop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Service> {
        let service = sqlx::query_as::<_, Service>(
            "UPDATE services SET name = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn usage_count(&self, id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM work_orders WHERE service_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
