//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! La columna `workshop_id` se desnormaliza para garantizar placas únicas por taller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Límite de vehículos por cliente
pub const MAX_VEHICLES_PER_CUSTOMER: i64 = 3;

/// Tipo de vehículo - mapea al ENUM vehicle_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Motorcycle,
    Car,
}

/// Vehicle - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub customer_id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub color: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub mileage: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    #[sqlx(default)]
    pub work_order_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub color: String,
    pub vehicle_type: VehicleType,
    pub mileage: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub plate: Option<String>,
    pub color: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub mileage: Option<i32>,
}
