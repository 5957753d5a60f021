use serde::Deserialize;
use validator::Validate;

use crate::models::employee::{EmployeeChanges, EmployeeRole, NewEmployee};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 2, message = "First name must be at least 2 characters long"))]
    pub first_name: String,

    #[validate(length(min = 2, message = "Last name must be at least 2 characters long"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(length(min = 7, message = "Phone must be at least 7 characters long"))]
    pub phone: Option<String>,

    pub role: EmployeeRole,
}

impl From<CreateEmployeeRequest> for NewEmployee {
    fn from(request: CreateEmployeeRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            role: request.role,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 2, message = "First name must be at least 2 characters long"))]
    pub first_name: Option<String>,

    #[validate(length(min = 2, message = "Last name must be at least 2 characters long"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(length(min = 7, message = "Phone must be at least 7 characters long"))]
    pub phone: Option<String>,

    pub role: Option<EmployeeRole>,
}

impl From<UpdateEmployeeRequest> for EmployeeChanges {
    fn from(request: UpdateEmployeeRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            role: request.role,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeStatusRequest {
    pub active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct EmployeeListQuery {
    pub role: Option<EmployeeRole>,
}
