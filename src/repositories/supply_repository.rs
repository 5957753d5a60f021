//! Repositorio de insumos

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::supply::{NewSupply, Supply, SupplyChanges};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait SupplyRepository: Send + Sync {
    async fn create(&self, workshop_id: Uuid, supply: NewSupply) -> AppResult<Supply>;
    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<Supply>>;
    /// Insumos del taller cuyo id está en `ids`
    async fn find_many_in_workshop(&self, workshop_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Supply>>;
    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Supply>>;
    /// Insumos con stock disponible
    async fn list_in_stock(&self, workshop_id: Uuid) -> AppResult<Vec<Supply>>;
    async fn update(&self, id: Uuid, changes: SupplyChanges) -> AppResult<Supply>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Número de líneas de órdenes de trabajo que usan el insumo
    async fn usage_count(&self, id: Uuid) -> AppResult<i64>;
}

pub struct PgSupplyRepository {
    pool: PgPool,
}

impl PgSupplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplyRepository for PgSupplyRepository {
    async fn create(&self, workshop_id: Uuid, supply: NewSupply) -> AppResult<Supply> {
        let now = Utc::now();
        let supply = sqlx::query_as::<_, Supply>(
            r#"
            INSERT INTO supplies (id, workshop_id, name, description, price, stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(supply.name)
        .bind(supply.description)
        .bind(supply.price)
        .bind(supply.stock)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(supply)
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<Supply>> {
        let supply = sqlx::query_as::<_, Supply>(
            "SELECT * FROM supplies WHERE id = $1 AND workshop_id = $2",
        )
        .bind(id)
        .bind(workshop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supply)
    }

    async fn find_many_in_workshop(&self, workshop_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Supply>> {
        let supplies = sqlx::query_as::<_, Supply>(
            "SELECT * FROM supplies WHERE workshop_id = $1 AND id = ANY($2)",
        )
        .bind(workshop_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(supplies)
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Supply>> {
        let supplies = sqlx::query_as::<_, Supply>(
            "SELECT * FROM supplies WHERE workshop_id = $1 ORDER BY name ASC",
        )
        .bind(workshop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(supplies)
    }

    async fn list_in_stock(&self, workshop_id: Uuid) -> AppResult<Vec<Supply>> {
        let supplies = sqlx::query_as::<_, Supply>(
            "SELECT * FROM supplies WHERE workshop_id = $1 AND stock > 0 ORDER BY name ASC",
        )
        .bind(workshop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(supplies)
    }

    async fn update(&self, id: Uuid, changes: SupplyChanges) -> AppResult<Supply> {
        let supply = sqlx::query_as::<_, Supply>(
            r#"
            UPDATE supplies SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(supply)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM supplies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn usage_count(&self, id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM work_order_supplies WHERE supply_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
