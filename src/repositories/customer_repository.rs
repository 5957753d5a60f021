//! Repositorio de clientes

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::customer::{Customer, CustomerChanges, CustomerCounts, NewCustomer};
use crate::utils::errors::AppResult;

const CUSTOMER_COLUMNS: &str = r#"
    c.*,
    (SELECT COUNT(*) FROM work_orders wo WHERE wo.customer_id = c.id) AS work_order_count
"#;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, workshop_id: Uuid, customer: NewCustomer) -> AppResult<Customer>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>>;
    /// Clientes de un taller, los más recientes primero
    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Customer>>;
    async fn find_by_phone(&self, workshop_id: Uuid, phone: &str) -> AppResult<Option<Customer>>;
    async fn find_by_email(&self, workshop_id: Uuid, email: &str) -> AppResult<Option<Customer>>;
    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<Customer>;
    /// Borra el cliente y sus vehículos
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    async fn counts(&self, workshop_id: Uuid, since: DateTime<Utc>) -> AppResult<CustomerCounts>;
}

pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, clause: &str, workshop_id: Uuid, value: &str) -> AppResult<Option<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers c WHERE c.workshop_id = $1 AND {} = $2 LIMIT 1",
            CUSTOMER_COLUMNS, clause
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(workshop_id)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, workshop_id: Uuid, customer: NewCustomer) -> AppResult<Customer> {
        let now = Utc::now();
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, workshop_id, first_name, last_name, email, phone, address, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(customer.first_name)
        .bind(customer.last_name)
        .bind(customer.email)
        .bind(customer.phone)
        .bind(customer.address)
        .bind(customer.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers c WHERE c.id = $1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers c WHERE c.workshop_id = $1 ORDER BY c.created_at DESC",
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(workshop_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn find_by_phone(&self, workshop_id: Uuid, phone: &str) -> AppResult<Option<Customer>> {
        self.find_where("c.phone", workshop_id, phone).await
    }

    async fn find_by_email(&self, workshop_id: Uuid, email: &str) -> AppResult<Option<Customer>> {
        self.find_where("c.email", workshop_id, email).await
    }

    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<Customer> {
        sqlx::query(
            r#"
            UPDATE customers SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                notes = COALESCE($7, notes),
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.phone)
        .bind(changes.address)
        .bind(changes.notes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
            .map_err(Into::into)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // Los vehículos caen por ON DELETE CASCADE
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn counts(&self, workshop_id: Uuid, since: DateTime<Utc>) -> AppResult<CustomerCounts> {
        let counts = sqlx::query_as::<_, CustomerCounts>(
            r#"
            SELECT
                COUNT(*) AS total_customers,
                COUNT(*) FILTER (WHERE EXISTS (SELECT 1 FROM vehicles v WHERE v.customer_id = c.id)) AS customers_with_vehicles,
                COUNT(*) FILTER (WHERE EXISTS (SELECT 1 FROM work_orders wo WHERE wo.customer_id = c.id)) AS customers_with_work_orders,
                (SELECT COUNT(*) FROM vehicles v WHERE v.workshop_id = $1) AS total_vehicles,
                COUNT(*) FILTER (WHERE c.created_at >= $2) AS recent_customers
            FROM customers c
            WHERE c.workshop_id = $1
            "#,
        )
        .bind(workshop_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
