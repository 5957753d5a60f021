//! Reglas de acceso a talleres
//!
//! Este módulo contiene la política pura de autorización: quién es el
//! usuario frente a un taller (propietario, empleado administrador o
//! mecánico) y qué puede hacer con los registros de empleados. No toca la
//! base de datos; `services::access_service` le pasa los datos ya cargados.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    employee::{Employee, EmployeeRole},
    workshop::Workshop,
};

pub const WORKSHOP_NOT_FOUND: &str = "Workshop not found";
pub const NO_WORKSHOP_FOR_USER: &str = "Workshop not found for this user";
pub const CANNOT_MANAGE_EMPLOYEES: &str = "User is not authorized to manage workshop employees";
pub const CANNOT_UPDATE_WORKSHOP: &str = "User is not authorized to update this workshop";
pub const CANNOT_VIEW_WORKSHOP: &str = "User is not authorized to view this workshop";
pub const ADMIN_DETAILS_OWNER_ONLY: &str = "Only workshop owners can modify admin employee details";
pub const ADMIN_STATUS_OWNER_ONLY: &str = "Only workshop owners can modify admin employee status";
pub const ADMIN_GRANT_OWNER_ONLY: &str = "Only workshop owners can grant the admin role";

/// Rol efectivo de un usuario dentro de un taller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkshopRole {
    Owner,
    Admin,
    Mechanic,
}

impl WorkshopRole {
    pub fn from_employee(role: EmployeeRole) -> Self {
        match role {
            EmployeeRole::Admin => WorkshopRole::Admin,
            EmployeeRole::Mechanic => WorkshopRole::Mechanic,
        }
    }

    pub fn is_owner(self) -> bool {
        self == WorkshopRole::Owner
    }

    /// Propietarios y administradores activos gestionan la plantilla
    /// y los datos del taller
    pub fn can_manage_staff(self) -> bool {
        matches!(self, WorkshopRole::Owner | WorkshopRole::Admin)
    }
}

/// Taller resuelto para la petición en curso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkshopAccess {
    pub workshop_id: Uuid,
    pub role: WorkshopRole,
}

/// Resuelve el taller sobre el que actúa un usuario
///
/// El taller propio tiene prioridad. Si no es propietario se usa el primer
/// registro de empleado activo; los inactivos se ignoran.
pub fn resolve_access(owned: Option<&Workshop>, memberships: &[Employee]) -> Option<WorkshopAccess> {
    if let Some(workshop) = owned {
        return Some(WorkshopAccess {
            workshop_id: workshop.id,
            role: WorkshopRole::Owner,
        });
    }

    memberships
        .iter()
        .find(|employee| employee.active)
        .map(|employee| WorkshopAccess {
            workshop_id: employee.workshop_id,
            role: WorkshopRole::from_employee(employee.role),
        })
}

/// Rol de un usuario en un taller concreto
///
/// `membership` es el registro de empleado que coincide con el email del
/// usuario en ese taller, si existe.
pub fn role_in_workshop(
    workshop: &Workshop,
    user_id: Uuid,
    membership: Option<&Employee>,
) -> Option<WorkshopRole> {
    if workshop.owner_id == user_id {
        return Some(WorkshopRole::Owner);
    }

    membership
        .filter(|employee| employee.active && employee.workshop_id == workshop.id)
        .map(|employee| WorkshopRole::from_employee(employee.role))
}

/// Comprueba que el actor pueda gestionar empleados
pub fn check_staff_manager(actor: Option<WorkshopRole>) -> Result<WorkshopRole, &'static str> {
    match actor {
        Some(role) if role.can_manage_staff() => Ok(role),
        _ => Err(CANNOT_MANAGE_EMPLOYEES),
    }
}

/// Comprueba si el actor puede editar los datos de `target`
///
/// Sólo el propietario edita administradores o concede el rol de administrador.
pub fn check_employee_details_change(
    actor: Option<WorkshopRole>,
    target: &Employee,
    new_role: Option<EmployeeRole>,
) -> Result<(), &'static str> {
    if actor.map(WorkshopRole::is_owner).unwrap_or(false) {
        return Ok(());
    }
    check_staff_manager(actor)?;

    if target.role == EmployeeRole::Admin {
        return Err(ADMIN_DETAILS_OWNER_ONLY);
    }
    if new_role == Some(EmployeeRole::Admin) {
        return Err(ADMIN_GRANT_OWNER_ONLY);
    }
    Ok(())
}

/// Comprueba si el actor puede activar o desactivar a `target`
pub fn check_employee_status_change(
    actor: Option<WorkshopRole>,
    target: &Employee,
) -> Result<(), &'static str> {
    if actor.map(WorkshopRole::is_owner).unwrap_or(false) {
        return Ok(());
    }
    if target.role == EmployeeRole::Admin {
        return Err(ADMIN_STATUS_OWNER_ONLY);
    }
    check_staff_manager(actor).map(|_| ())
}
