//! Repositorio de empleados

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::employee::{Employee, EmployeeChanges, EmployeeRole, NewEmployee};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, workshop_id: Uuid, employee: NewEmployee) -> AppResult<Employee>;
    /// Busca un empleado (activo o no) dentro de un taller
    async fn find_in_workshop(&self, workshop_id: Uuid, employee_id: Uuid) -> AppResult<Option<Employee>>;
    /// Empleado activo de un taller con el email dado, sin distinguir mayúsculas
    async fn find_active_by_email(&self, workshop_id: Uuid, email: &str) -> AppResult<Option<Employee>>;
    /// Registros activos con el email dado en cualquier taller, los más antiguos primero
    async fn find_active_memberships(&self, email: &str) -> AppResult<Vec<Employee>>;
    /// Empleados activos ordenados por nombre; filtrando por rol, los más recientes primero
    async fn list_active(&self, workshop_id: Uuid, role: Option<EmployeeRole>) -> AppResult<Vec<Employee>>;
    async fn update(&self, employee_id: Uuid, changes: EmployeeChanges) -> AppResult<Employee>;
    async fn set_active(&self, employee_id: Uuid, active: bool) -> AppResult<Employee>;
}

pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn create(&self, workshop_id: Uuid, employee: NewEmployee) -> AppResult<Employee> {
        let now = Utc::now();
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (id, workshop_id, first_name, last_name, email, phone, role, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(employee.first_name)
        .bind(employee.last_name)
        .bind(employee.email)
        .bind(employee.phone)
        .bind(employee.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, employee_id: Uuid) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE id = $1 AND workshop_id = $2",
        )
        .bind(employee_id)
        .bind(workshop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn find_active_by_email(&self, workshop_id: Uuid, email: &str) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE workshop_id = $1 AND LOWER(email) = LOWER($2) AND active
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(workshop_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn find_active_memberships(&self, email: &str) -> AppResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE LOWER(email) = LOWER($1) AND active ORDER BY created_at ASC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn list_active(&self, workshop_id: Uuid, role: Option<EmployeeRole>) -> AppResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE workshop_id = $1 AND active AND ($2::employee_role IS NULL OR role = $2)
            ORDER BY
                CASE WHEN $2::employee_role IS NULL THEN first_name END ASC,
                created_at DESC
            "#,
        )
        .bind(workshop_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn update(&self, employee_id: Uuid, changes: EmployeeChanges) -> AppResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                role = COALESCE($6, role),
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.phone)
        .bind(changes.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn set_active(&self, employee_id: Uuid, active: bool) -> AppResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            "UPDATE employees SET active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(employee_id)
        .bind(active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }
}
