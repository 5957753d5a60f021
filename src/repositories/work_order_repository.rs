//! Repositorio de órdenes de trabajo
//!
//! Las órdenes se devuelven siempre con sus relaciones resueltas
//! (cliente, vehículo, servicio e insumos).

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::work_order::{
    CustomerSummary, NewWorkOrder, ServiceSummary, SupplySummary, VehicleSummary, WorkOrder,
    WorkOrderChanges, WorkOrderDetails, WorkOrderFilter, WorkOrderSupply,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait WorkOrderRepository: Send + Sync {
    /// Inserta la orden y sus líneas de insumos en una única transacción
    async fn create(&self, workshop_id: Uuid, order: NewWorkOrder) -> AppResult<WorkOrderDetails>;
    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<WorkOrderDetails>>;
    /// Órdenes del taller, las más recientes primero
    async fn list(&self, workshop_id: Uuid, filter: WorkOrderFilter) -> AppResult<Vec<WorkOrderDetails>>;
    async fn update(&self, workshop_id: Uuid, id: Uuid, changes: WorkOrderChanges) -> AppResult<WorkOrderDetails>;
    async fn has_invoice(&self, id: Uuid) -> AppResult<bool>;
    /// Borra la orden junto con sus líneas de insumos
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

const DETAILS_QUERY: &str = r#"
    SELECT
        wo.*,
        c.first_name AS customer_first_name,
        c.last_name AS customer_last_name,
        c.phone AS customer_phone,
        v.brand AS vehicle_brand,
        v.model AS vehicle_model,
        v.year AS vehicle_year,
        v.plate AS vehicle_plate,
        v.color AS vehicle_color,
        s.name AS service_name
    FROM work_orders wo
    JOIN customers c ON c.id = wo.customer_id
    JOIN vehicles v ON v.id = wo.vehicle_id
    JOIN services s ON s.id = wo.service_id
"#;

#[derive(Debug, FromRow)]
struct WorkOrderRow {
    #[sqlx(flatten)]
    order: WorkOrder,
    customer_first_name: String,
    customer_last_name: String,
    customer_phone: String,
    vehicle_brand: String,
    vehicle_model: String,
    vehicle_year: i32,
    vehicle_plate: String,
    vehicle_color: String,
    service_name: String,
}

#[derive(Debug, FromRow)]
struct SupplyLineRow {
    id: Uuid,
    work_order_id: Uuid,
    supply_id: Uuid,
    quantity: i32,
    supply_name: String,
    supply_price: Decimal,
}

impl WorkOrderRow {
    fn into_details(self, supplies: Vec<WorkOrderSupply>) -> WorkOrderDetails {
        let order = self.order;
        WorkOrderDetails {
            customer: CustomerSummary {
                id: order.customer_id,
                first_name: self.customer_first_name,
                last_name: self.customer_last_name,
                phone: self.customer_phone,
            },
            vehicle: VehicleSummary {
                id: order.vehicle_id,
                brand: self.vehicle_brand,
                model: self.vehicle_model,
                year: self.vehicle_year,
                plate: self.vehicle_plate,
                color: self.vehicle_color,
            },
            service: ServiceSummary {
                id: order.service_id,
                name: self.service_name,
            },
            supplies,
            order,
        }
    }
}

pub struct PgWorkOrderRepository {
    pool: PgPool,
}

impl PgWorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Completa las filas con sus líneas de insumos
    async fn attach_supplies(&self, rows: Vec<WorkOrderRow>) -> AppResult<Vec<WorkOrderDetails>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.order.id).collect();

        let lines = sqlx::query_as::<_, SupplyLineRow>(
            r#"
            SELECT wos.id, wos.work_order_id, wos.supply_id, wos.quantity,
                   s.name AS supply_name, s.price AS supply_price
            FROM work_order_supplies wos
            JOIN supplies s ON s.id = wos.supply_id
            WHERE wos.work_order_id = ANY($1)
            ORDER BY s.name ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<Uuid, Vec<WorkOrderSupply>> = HashMap::new();
        for line in lines {
            by_order.entry(line.work_order_id).or_default().push(WorkOrderSupply {
                id: line.id,
                supply_id: line.supply_id,
                quantity: line.quantity,
                supply: SupplySummary {
                    id: line.supply_id,
                    name: line.supply_name,
                    price: line.supply_price,
                },
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let supplies = by_order.remove(&row.order.id).unwrap_or_default();
                row.into_details(supplies)
            })
            .collect())
    }
}

#[async_trait]
impl WorkOrderRepository for PgWorkOrderRepository {
    async fn create(&self, workshop_id: Uuid, order: NewWorkOrder) -> AppResult<WorkOrderDetails> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, WorkOrder>(
            r#"
            INSERT INTO work_orders (id, workshop_id, customer_id, vehicle_id, service_id, mechanic,
                                     priority, status, start_date, description, additional_notes,
                                     subtotal, total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING', $8, $9, $10, $11, $12, $13, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(order.customer_id)
        .bind(order.vehicle_id)
        .bind(order.service_id)
        .bind(&order.mechanic)
        .bind(order.priority)
        .bind(order.start_date)
        .bind(&order.description)
        .bind(&order.additional_notes)
        .bind(order.subtotal)
        .bind(order.total)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.supplies {
            sqlx::query(
                "INSERT INTO work_order_supplies (id, work_order_id, supply_id, quantity) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(created.id)
            .bind(line.supply_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_in_workshop(workshop_id, created.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
            .map_err(Into::into)
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<WorkOrderDetails>> {
        let sql = format!("{} WHERE wo.id = $1 AND wo.workshop_id = $2", DETAILS_QUERY);
        let row = sqlx::query_as::<_, WorkOrderRow>(&sql)
            .bind(id)
            .bind(workshop_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_supplies(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn list(&self, workshop_id: Uuid, filter: WorkOrderFilter) -> AppResult<Vec<WorkOrderDetails>> {
        let sql = format!(
            r#"{}
            WHERE wo.workshop_id = $1
              AND ($2::order_status IS NULL OR wo.status = $2)
              AND ($3::uuid IS NULL OR wo.customer_id = $3)
              AND ($4::uuid IS NULL OR wo.vehicle_id = $4)
              AND ($5::uuid IS NULL OR wo.service_id = $5)
            ORDER BY wo.created_at DESC
            LIMIT $6 OFFSET $7
            "#,
            DETAILS_QUERY
        );

        let rows = sqlx::query_as::<_, WorkOrderRow>(&sql)
            .bind(workshop_id)
            .bind(filter.status)
            .bind(filter.customer_id)
            .bind(filter.vehicle_id)
            .bind(filter.service_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        self.attach_supplies(rows).await
    }

    async fn update(&self, workshop_id: Uuid, id: Uuid, changes: WorkOrderChanges) -> AppResult<WorkOrderDetails> {
        sqlx::query(
            r#"
            UPDATE work_orders SET
                status = COALESCE($3, status),
                mechanic = COALESCE($4, mechanic),
                priority = COALESCE($5, priority),
                start_date = COALESCE($6, start_date),
                description = COALESCE($7, description),
                additional_notes = COALESCE($8, additional_notes),
                subtotal = COALESCE($9, subtotal),
                total = COALESCE($10, total),
                updated_at = $11
            WHERE id = $1 AND workshop_id = $2
            "#,
        )
        .bind(id)
        .bind(workshop_id)
        .bind(changes.status)
        .bind(changes.mechanic)
        .bind(changes.priority)
        .bind(changes.start_date)
        .bind(changes.description)
        .bind(changes.additional_notes)
        .bind(changes.subtotal)
        .bind(changes.total)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.find_in_workshop(workshop_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
            .map_err(Into::into)
    }

    async fn has_invoice(&self, id: Uuid) -> AppResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM invoices WHERE work_order_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM work_order_supplies WHERE work_order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
