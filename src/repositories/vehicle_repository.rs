//! Repositorio de vehículos

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::utils::errors::{map_unique_violation, AppResult};

pub const PLATE_TAKEN: &str = "A vehicle with this plate already exists in your workshop";

const VEHICLE_COLUMNS: &str = r#"
    v.*,
    (SELECT COUNT(*) FROM work_orders wo WHERE wo.vehicle_id = v.id) AS work_order_count
"#;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, workshop_id: Uuid, customer_id: Uuid, vehicle: NewVehicle) -> AppResult<Vehicle>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn find_by_plate(&self, workshop_id: Uuid, plate: &str) -> AppResult<Option<Vehicle>>;
    /// Vehículos de un cliente, los más recientes primero
    async fn list_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Vehicle>>;
    /// Vehículos de todo el taller, los más recientes primero
    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Vehicle>>;
    async fn count_by_customer(&self, customer_id: Uuid) -> AppResult<i64>;
    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn create(&self, workshop_id: Uuid, customer_id: Uuid, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let now = Utc::now();
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, workshop_id, customer_id, brand, model, year, plate, color,
                                  vehicle_type, mileage, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(customer_id)
        .bind(vehicle.brand)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.plate)
        .bind(vehicle.color)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.mileage)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, PLATE_TAKEN))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let sql = format!("SELECT {} FROM vehicles v WHERE v.id = $1", VEHICLE_COLUMNS);
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_plate(&self, workshop_id: Uuid, plate: &str) -> AppResult<Option<Vehicle>> {
        let sql = format!(
            "SELECT {} FROM vehicles v WHERE v.workshop_id = $1 AND v.plate = $2",
            VEHICLE_COLUMNS
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(workshop_id)
            .bind(plate)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let sql = format!(
            "SELECT {} FROM vehicles v WHERE v.customer_id = $1 ORDER BY v.created_at DESC",
            VEHICLE_COLUMNS
        );
        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let sql = format!(
            "SELECT {} FROM vehicles v WHERE v.workshop_id = $1 ORDER BY v.created_at DESC",
            VEHICLE_COLUMNS
        );
        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(workshop_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn count_by_customer(&self, customer_id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle> {
        sqlx::query(
            r#"
            UPDATE vehicles SET
                brand = COALESCE($2, brand),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                plate = COALESCE($5, plate),
                color = COALESCE($6, color),
                vehicle_type = COALESCE($7, vehicle_type),
                mileage = COALESCE($8, mileage),
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.brand)
        .bind(changes.model)
        .bind(changes.year)
        .bind(changes.plate)
        .bind(changes.color)
        .bind(changes.vehicle_type)
        .bind(changes.mileage)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, PLATE_TAKEN))?;

        self.find_by_id(id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
            .map_err(Into::into)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
