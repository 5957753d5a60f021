//! Servicio de acceso a talleres
//!
//! Carga los datos necesarios y aplica la política de `models::access`.
//! Mantiene la distinción entre taller inexistente (404) y usuario sin
//! permisos sobre un taller existente (403).

use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::access::{
    check_staff_manager, resolve_access, role_in_workshop, WorkshopAccess, WorkshopRole,
    NO_WORKSHOP_FOR_USER, WORKSHOP_NOT_FOUND,
};
use crate::models::workshop::Workshop;
use crate::repositories::{EmployeeRepository, WorkshopRepository};
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};

#[derive(Clone)]
pub struct AccessService {
    workshops: Arc<dyn WorkshopRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl AccessService {
    pub fn new(workshops: Arc<dyn WorkshopRepository>, employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { workshops, employees }
    }

    /// Resuelve el taller sobre el que actúa el usuario
    pub async fn resolve(&self, user: &AuthenticatedUser) -> AppResult<WorkshopAccess> {
        let owned = self.workshops.find_by_owner(user.user_id).await?;
        let memberships = match owned {
            Some(_) => Vec::new(),
            None => self.employees.find_active_memberships(&user.email).await?,
        };

        let access = resolve_access(owned.as_ref(), &memberships)
            .ok_or_else(|| not_found_error(NO_WORKSHOP_FOR_USER))?;

        tracing::debug!(
            user_id = %user.user_id,
            workshop_id = %access.workshop_id,
            role = ?access.role,
            "Acceso a taller resuelto"
        );
        Ok(access)
    }

    /// Taller por id o 404
    pub async fn require_workshop(&self, workshop_id: Uuid) -> AppResult<Workshop> {
        self.workshops
            .find_by_id(workshop_id)
            .await?
            .ok_or_else(|| not_found_error(WORKSHOP_NOT_FOUND))
    }

    /// Rol del usuario en un taller concreto, si tiene alguno
    pub async fn role_in(&self, workshop: &Workshop, user: &AuthenticatedUser) -> AppResult<Option<WorkshopRole>> {
        if workshop.owner_id == user.user_id {
            return Ok(Some(WorkshopRole::Owner));
        }

        let membership = self
            .employees
            .find_active_by_email(workshop.id, &user.email)
            .await?;

        Ok(role_in_workshop(workshop, user.user_id, membership.as_ref()))
    }

    /// Exige que el usuario sea propietario o administrador activo del taller
    ///
    /// 404 si el taller no existe, 403 si existe pero el usuario no lo gestiona.
    pub async fn require_staff_manager(
        &self,
        workshop_id: Uuid,
        user: &AuthenticatedUser,
    ) -> AppResult<(Workshop, WorkshopRole)> {
        let workshop = self.require_workshop(workshop_id).await?;
        let role = self.role_in(&workshop, user).await?;
        let role = check_staff_manager(role).map_err(forbidden_error)?;
        Ok((workshop, role))
    }
}
