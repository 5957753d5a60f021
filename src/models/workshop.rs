//! Modelo de Workshop
//!
//! Un taller pertenece a un único usuario propietario.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Workshop - mapea a la tabla workshops
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub logo_public_id: Option<String>,
    pub nit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWorkshop {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub nit: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkshopChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub logo_public_id: Option<String>,
    pub nit: Option<String>,
}

/// Resumen del propietario incluido en el detalle del taller
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Indicadores del taller
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopStats {
    pub total_employees: i64,
    pub recent_work_orders: i64,
    pub low_stock_supplies: i64,
    pub total_revenue: Decimal,
}
