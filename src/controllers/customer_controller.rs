use chrono::{Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::dto::common_dto::MessageResponse;
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};
use crate::models::access::WorkshopAccess;
use crate::models::customer::{Customer, CustomerStats};
use crate::models::vehicle::Vehicle;
use crate::repositories::{CustomerRepository, Repositories};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, conflict_error, forbidden_error, not_found_error, AppResult};

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";
pub const CUSTOMER_IN_OTHER_WORKSHOP: &str = "Customer not found in your workshop";
pub const PHONE_TAKEN: &str = "A customer with this phone number already exists in your workshop";
pub const CUSTOMER_EMAIL_TAKEN: &str = "A customer with this email already exists in your workshop";
pub const CUSTOMER_HAS_WORK_ORDERS: &str = "Cannot delete customer with associated work orders";

/// Días que cuentan como clientes recientes
const RECENT_CUSTOMERS_DAYS: i64 = 30;

/// Cliente del taller resuelto o el error correspondiente
///
/// 404 si el cliente no existe, 403 si pertenece a otro taller.
pub async fn find_customer_in_workshop(
    customers: &dyn CustomerRepository,
    access: &WorkshopAccess,
    customer_id: Uuid,
) -> AppResult<Customer> {
    let customer = customers
        .find_by_id(customer_id)
        .await?
        .ok_or_else(|| not_found_error(CUSTOMER_NOT_FOUND))?;

    if customer.workshop_id != access.workshop_id {
        return Err(forbidden_error(CUSTOMER_IN_OTHER_WORKSHOP));
    }
    Ok(customer)
}

pub struct CustomerController {
    repos: Repositories,
}

impl CustomerController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repos: state.repos.clone(),
        }
    }

    pub async fn create(&self, access: &WorkshopAccess, request: CreateCustomerRequest) -> AppResult<CustomerResponse> {
        self.ensure_contact_free(access, Some(&request.phone), Some(&request.email), None)
            .await?;

        let customer = self.repos.customers.create(access.workshop_id, request.into()).await?;
        tracing::info!(workshop_id = %access.workshop_id, customer_id = %customer.id, "Cliente creado");
        Ok(CustomerResponse::new(customer, Vec::new()))
    }

    /// Clientes del taller, más recientes primero, con sus vehículos
    pub async fn list(&self, access: &WorkshopAccess) -> AppResult<Vec<CustomerResponse>> {
        let customers = self.repos.customers.list_by_workshop(access.workshop_id).await?;
        let vehicles = self.repos.vehicles.list_by_workshop(access.workshop_id).await?;

        let mut by_customer: HashMap<Uuid, Vec<Vehicle>> = HashMap::new();
        for vehicle in vehicles {
            by_customer.entry(vehicle.customer_id).or_default().push(vehicle);
        }

        Ok(customers
            .into_iter()
            .map(|customer| {
                let vehicles = by_customer.remove(&customer.id).unwrap_or_default();
                CustomerResponse::new(customer, vehicles)
            })
            .collect())
    }

    pub async fn get(&self, access: &WorkshopAccess, customer_id: Uuid) -> AppResult<CustomerResponse> {
        let customer = find_customer_in_workshop(self.repos.customers.as_ref(), access, customer_id).await?;
        let vehicles = self.repos.vehicles.list_by_customer(customer.id).await?;
        Ok(CustomerResponse::new(customer, vehicles))
    }

    pub async fn update(
        &self,
        access: &WorkshopAccess,
        customer_id: Uuid,
        request: UpdateCustomerRequest,
    ) -> AppResult<CustomerResponse> {
        let customer = find_customer_in_workshop(self.repos.customers.as_ref(), access, customer_id).await?;

        let phone = request.phone.as_deref().filter(|phone| *phone != customer.phone);
        let email = request.email.as_deref().filter(|email| *email != customer.email);
        self.ensure_contact_free(access, phone, email, Some(customer.id)).await?;

        let updated = self.repos.customers.update(customer.id, request.into()).await?;
        let vehicles = self.repos.vehicles.list_by_customer(updated.id).await?;
        Ok(CustomerResponse::new(updated, vehicles))
    }

    /// Borrar un cliente sin órdenes de trabajo; sus vehículos se borran con él
    pub async fn delete(&self, access: &WorkshopAccess, customer_id: Uuid) -> AppResult<MessageResponse> {
        let customer = find_customer_in_workshop(self.repos.customers.as_ref(), access, customer_id).await?;

        if customer.work_order_count > 0 {
            return Err(bad_request_error(CUSTOMER_HAS_WORK_ORDERS));
        }

        self.repos.customers.delete(customer.id).await?;
        tracing::info!(workshop_id = %access.workshop_id, customer_id = %customer.id, "Cliente eliminado");
        Ok(MessageResponse::new("Customer deleted successfully"))
    }

    pub async fn stats(&self, access: &WorkshopAccess) -> AppResult<CustomerStats> {
        let since = Utc::now() - Duration::days(RECENT_CUSTOMERS_DAYS);
        let counts = self.repos.customers.counts(access.workshop_id, since).await?;
        Ok(counts.into())
    }

    async fn ensure_contact_free(
        &self,
        access: &WorkshopAccess,
        phone: Option<&str>,
        email: Option<&str>,
        except: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(phone) = phone {
            if let Some(existing) = self.repos.customers.find_by_phone(access.workshop_id, phone).await? {
                if Some(existing.id) != except {
                    return Err(conflict_error(PHONE_TAKEN));
                }
            }
        }

        if let Some(email) = email {
            if let Some(existing) = self.repos.customers.find_by_email(access.workshop_id, email).await? {
                if Some(existing.id) != except {
                    return Err(conflict_error(CUSTOMER_EMAIL_TAKEN));
                }
            }
        }

        Ok(())
    }
}
