//! Repositorio de talleres

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::supply::LOW_STOCK_THRESHOLD;
use crate::models::workshop::{NewWorkshop, OwnerSummary, Workshop, WorkshopChanges, WorkshopStats};
use crate::utils::errors::{map_unique_violation, AppResult};

pub const ALREADY_OWNS_WORKSHOP: &str = "User already owns a workshop";

#[async_trait]
pub trait WorkshopRepository: Send + Sync {
    /// Crea el taller de un usuario; un segundo taller es un conflicto
    async fn create(&self, owner_id: Uuid, workshop: NewWorkshop) -> AppResult<Workshop>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workshop>>;
    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Option<Workshop>>;
    async fn find_owner(&self, workshop_id: Uuid) -> AppResult<Option<OwnerSummary>>;
    async fn update(&self, id: Uuid, changes: WorkshopChanges) -> AppResult<Workshop>;
    /// Estadísticas del taller para órdenes creadas desde `since`
    async fn stats(&self, id: Uuid, since: DateTime<Utc>) -> AppResult<WorkshopStats>;
}

pub struct PgWorkshopRepository {
    pool: PgPool,
}

impl PgWorkshopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkshopRepository for PgWorkshopRepository {
    async fn create(&self, owner_id: Uuid, workshop: NewWorkshop) -> AppResult<Workshop> {
        let now = Utc::now();
        sqlx::query_as::<_, Workshop>(
            r#"
            INSERT INTO workshops (id, owner_id, name, address, phone, email, logo, nit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(workshop.name)
        .bind(workshop.address)
        .bind(workshop.phone)
        .bind(workshop.email)
        .bind(workshop.logo)
        .bind(workshop.nit)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, ALREADY_OWNS_WORKSHOP))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workshop>> {
        let workshop = sqlx::query_as::<_, Workshop>("SELECT * FROM workshops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(workshop)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Option<Workshop>> {
        let workshop = sqlx::query_as::<_, Workshop>("SELECT * FROM workshops WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(workshop)
    }

    async fn find_owner(&self, workshop_id: Uuid) -> AppResult<Option<OwnerSummary>> {
        let owner = sqlx::query_as::<_, OwnerSummary>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.email
            FROM users u
            JOIN workshops w ON w.owner_id = u.id
            WHERE w.id = $1
            "#,
        )
        .bind(workshop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    async fn update(&self, id: Uuid, changes: WorkshopChanges) -> AppResult<Workshop> {
        let workshop = sqlx::query_as::<_, Workshop>(
            r#"
            UPDATE workshops SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                logo = COALESCE($6, logo),
                logo_public_id = COALESCE($7, logo_public_id),
                nit = COALESCE($8, nit),
                updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.address)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.logo)
        .bind(changes.logo_public_id)
        .bind(changes.nit)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(workshop)
    }

    async fn stats(&self, id: Uuid, since: DateTime<Utc>) -> AppResult<WorkshopStats> {
        let (total_employees, recent_work_orders, low_stock_supplies, total_revenue): (i64, i64, i64, Decimal) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM employees WHERE workshop_id = $1 AND active),
                    (SELECT COUNT(*) FROM work_orders WHERE workshop_id = $1 AND created_at >= $2),
                    (SELECT COUNT(*) FROM supplies WHERE workshop_id = $1 AND stock <= $3),
                    (SELECT COALESCE(SUM(total), 0) FROM work_orders WHERE workshop_id = $1 AND created_at >= $2)
                "#,
            )
            .bind(id)
            .bind(since)
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.pool)
            .await?;

        Ok(WorkshopStats {
            total_employees,
            recent_work_orders,
            low_stock_supplies,
            total_revenue,
        })
    }
}
