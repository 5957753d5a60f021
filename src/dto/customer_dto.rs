use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::customer::{Customer, CustomerChanges, NewCustomer};
use crate::models::vehicle::Vehicle;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 2, max = 50, message = "First name must be between 2 and 50 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(
        length(min = 7, max = 15, message = "Phone must be between 7 and 15 characters"),
        regex(path = "crate::utils::validation::PHONE_REGEX", message = "Invalid phone number format")
    )]
    pub phone: String,

    #[validate(length(min = 5, max = 200, message = "Address must be between 5 and 200 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 3, max = 200, message = "Notes must be between 3 and 200 characters"))]
    pub notes: Option<String>,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(request: CreateCustomerRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 2, max = 50, message = "First name must be between 2 and 50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(
        length(min = 7, max = 15, message = "Phone must be between 7 and 15 characters"),
        regex(path = "crate::utils::validation::PHONE_REGEX", message = "Invalid phone number format")
    )]
    pub phone: Option<String>,

    #[validate(length(min = 5, max = 200, message = "Address must be between 5 and 200 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 3, max = 200, message = "Notes must be between 3 and 200 characters"))]
    pub notes: Option<String>,
}

impl From<UpdateCustomerRequest> for CustomerChanges {
    fn from(request: UpdateCustomerRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCount {
    pub vehicles: usize,
    pub work_orders: i64,
}

/// Cliente con sus vehículos y conteos
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    #[serde(flatten)]
    pub customer: Customer,
    pub vehicles: Vec<Vehicle>,
    #[serde(rename = "_count")]
    pub count: CustomerCount,
}

impl CustomerResponse {
    pub fn new(customer: Customer, vehicles: Vec<Vehicle>) -> Self {
        let count = CustomerCount {
            vehicles: vehicles.len(),
            work_orders: customer.work_order_count,
        };
        Self {
            customer,
            vehicles,
            count,
        }
    }
}
