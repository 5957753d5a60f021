//! Modelo de WorkOrder
//!
//! Una orden de trabajo enlaza cliente, vehículo, servicio e insumos
//! de un mismo taller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la orden - mapea al ENUM order_status
///
/// No hay máquina de estados: cualquier transición es válida.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Prioridad de la orden - mapea al ENUM order_priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "order_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// WorkOrder - mapea a la tabla work_orders
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_id: Uuid,
    pub mechanic: String,
    pub priority: OrderPriority,
    pub status: OrderStatus,
    pub start_date: DateTime<Utc>,
    pub description: String,
    pub additional_notes: Option<String>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Línea de insumo a registrar con la orden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyLine {
    pub supply_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_id: Uuid,
    pub mechanic: String,
    pub priority: OrderPriority,
    pub start_date: DateTime<Utc>,
    pub description: String,
    pub additional_notes: Option<String>,
    pub supplies: Vec<SupplyLine>,
    pub subtotal: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct WorkOrderChanges {
    pub status: Option<OrderStatus>,
    pub mechanic: Option<String>,
    pub priority: Option<OrderPriority>,
    pub start_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub additional_notes: Option<String>,
    pub subtotal: Option<Decimal>,
    pub total: Option<Decimal>,
}

/// Filtros del listado de órdenes
#[derive(Debug, Clone, Default)]
pub struct WorkOrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplySummary {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

/// Línea de insumo ya registrada
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderSupply {
    pub id: Uuid,
    pub supply_id: Uuid,
    pub quantity: i32,
    pub supply: SupplySummary,
}

/// Orden con sus relaciones
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDetails {
    #[serde(flatten)]
    pub order: WorkOrder,
    pub customer: CustomerSummary,
    pub vehicle: VehicleSummary,
    pub service: ServiceSummary,
    pub supplies: Vec<WorkOrderSupply>,
}
