//! Modelo de Customer
//!
//! Clientes de un taller, con el número de órdenes de trabajo asociadas.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::work_order::CustomerSummary;

/// Customer - mapea a la tabla customers
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Calculado con una subconsulta, no es columna
    #[serde(skip)]
    #[sqlx(default)]
    pub work_order_count: i64,
}

impl Customer {
    /// Resumen que acompaña a vehículos y órdenes
    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Estadísticas de clientes de un taller
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_customers: i64,
    pub customers_with_vehicles: i64,
    pub customers_with_work_orders: i64,
    pub average_vehicles_per_customer: f64,
    pub recent_customers: i64,
}

/// Conteos crudos a partir de los que se calculan las estadísticas
#[derive(Debug, Clone, Default, FromRow)]
pub struct CustomerCounts {
    pub total_customers: i64,
    pub customers_with_vehicles: i64,
    pub customers_with_work_orders: i64,
    pub total_vehicles: i64,
    pub recent_customers: i64,
}

impl From<CustomerCounts> for CustomerStats {
    fn from(counts: CustomerCounts) -> Self {
        let average = if counts.total_customers > 0 {
            counts.total_vehicles as f64 / counts.total_customers as f64
        } else {
            0.0
        };

        Self {
            total_customers: counts.total_customers,
            customers_with_vehicles: counts.customers_with_vehicles,
            customers_with_work_orders: counts.customers_with_work_orders,
            average_vehicles_per_customer: (average * 100.0).round() / 100.0,
            recent_customers: counts.recent_customers,
        }
    }
}
