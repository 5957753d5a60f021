use uuid::Uuid;

use crate::dto::employee_dto::{CreateEmployeeRequest, EmployeeListQuery, UpdateEmployeeRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::access::{
    check_employee_details_change, check_employee_status_change, check_staff_manager,
    ADMIN_GRANT_OWNER_ONLY,
};
use crate::models::employee::{Employee, EmployeeRole};
use crate::repositories::EmployeeRepository;
use crate::services::AccessService;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, forbidden_error, not_found_error, AppResult};

use std::sync::Arc;

pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found in this workshop";
pub const EMPLOYEE_EMAIL_TAKEN: &str = "An employee with this email already exists in this workshop";

pub struct EmployeeController {
    employees: Arc<dyn EmployeeRepository>,
    access: AccessService,
}

impl EmployeeController {
    pub fn new(state: &AppState) -> Self {
        Self {
            employees: state.repos.employees.clone(),
            access: state.access.clone(),
        }
    }

    pub async fn create(
        &self,
        workshop_id: Uuid,
        user: &AuthenticatedUser,
        request: CreateEmployeeRequest,
    ) -> AppResult<Employee> {
        let (workshop, role) = self.access.require_staff_manager(workshop_id, user).await?;

        if request.role == EmployeeRole::Admin && !role.is_owner() {
            return Err(forbidden_error(ADMIN_GRANT_OWNER_ONLY));
        }
        if let Some(email) = request.email.as_deref() {
            self.ensure_email_free(workshop.id, email, None).await?;
        }

        let employee = self.employees.create(workshop.id, request.into()).await?;
        tracing::info!(workshop_id = %workshop.id, employee_id = %employee.id, role = ?employee.role, "👷 Empleado registrado");
        Ok(employee)
    }

    pub async fn list(
        &self,
        workshop_id: Uuid,
        user: &AuthenticatedUser,
        query: EmployeeListQuery,
    ) -> AppResult<Vec<Employee>> {
        let (workshop, _) = self.access.require_staff_manager(workshop_id, user).await?;
        self.employees.list_active(workshop.id, query.role).await
    }

    pub async fn get(&self, workshop_id: Uuid, employee_id: Uuid, user: &AuthenticatedUser) -> AppResult<Employee> {
        let (workshop, _) = self.access.require_staff_manager(workshop_id, user).await?;
        self.require_employee(workshop.id, employee_id).await
    }

    /// Editar datos de un empleado
    ///
    /// Un administrador no puede editar a otro administrador ni conceder el
    /// rol de administrador; el propietario sí.
    pub async fn update(
        &self,
        workshop_id: Uuid,
        employee_id: Uuid,
        user: &AuthenticatedUser,
        request: UpdateEmployeeRequest,
    ) -> AppResult<Employee> {
        let workshop = self.access.require_workshop(workshop_id).await?;
        let role = self.access.role_in(&workshop, user).await?;
        check_staff_manager(role).map_err(forbidden_error)?;

        let target = self.require_employee(workshop.id, employee_id).await?;
        check_employee_details_change(role, &target, request.role).map_err(forbidden_error)?;

        if let Some(email) = request.email.as_deref() {
            self.ensure_email_free(workshop.id, email, Some(target.id)).await?;
        }

        self.employees.update(target.id, request.into()).await
    }

    pub async fn update_status(
        &self,
        workshop_id: Uuid,
        employee_id: Uuid,
        user: &AuthenticatedUser,
        active: bool,
    ) -> AppResult<Employee> {
        let workshop = self.access.require_workshop(workshop_id).await?;
        let target = self.require_employee(workshop.id, employee_id).await?;

        let role = self.access.role_in(&workshop, user).await?;
        check_employee_status_change(role, &target).map_err(forbidden_error)?;

        let employee = self.employees.set_active(target.id, active).await?;
        tracing::info!(workshop_id = %workshop.id, employee_id = %employee.id, active, "Estado de empleado actualizado");
        Ok(employee)
    }

    async fn require_employee(&self, workshop_id: Uuid, employee_id: Uuid) -> AppResult<Employee> {
        self.employees
            .find_in_workshop(workshop_id, employee_id)
            .await?
            .ok_or_else(|| not_found_error(EMPLOYEE_NOT_FOUND))
    }

    async fn ensure_email_free(&self, workshop_id: Uuid, email: &str, except: Option<Uuid>) -> AppResult<()> {
        match self.employees.find_active_by_email(workshop_id, email).await? {
            Some(existing) if Some(existing.id) != except => Err(conflict_error(EMPLOYEE_EMAIL_TAKEN)),
            _ => Ok(()),
        }
    }
}
