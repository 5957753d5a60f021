//! Modelo de Employee
//!
//! Empleados de un taller. Los inactivos se conservan pero no cuentan
//! para ningún control de acceso.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del empleado - mapea al ENUM employee_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "employee_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EmployeeRole {
    Admin,
    Mechanic,
}

/// Employee - mapea a la tabla employees
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: EmployeeRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_admin(&self) -> bool {
        self.role == EmployeeRole::Admin
    }
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: EmployeeRole,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<EmployeeRole>,
}
