use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    employee::Employee,
    service::Service,
    supply::Supply,
    workshop::{NewWorkshop, OwnerSummary, Workshop, WorkshopChanges},
};

// Alta de taller
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkshopRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: String,

    #[validate(length(min = 5, message = "Address must be at least 5 characters long"))]
    pub address: String,

    #[validate(length(min = 7, message = "Phone must be at least 7 characters long"))]
    pub phone: String,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(url(message = "Logo must be a valid url"))]
    pub logo: Option<String>,

    #[validate(length(min = 9, max = 10, message = "NIT must be between 9 and 10 characters"))]
    pub nit: Option<String>,
}

impl From<CreateWorkshopRequest> for NewWorkshop {
    fn from(request: CreateWorkshopRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            phone: request.phone,
            email: request.email,
            logo: request.logo,
            nit: request.nit,
        }
    }
}

// Actualización parcial; el logo sólo se cambia subiendo un archivo
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkshopRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: Option<String>,

    #[validate(length(min = 5, message = "Address must be at least 5 characters long"))]
    pub address: Option<String>,

    #[validate(length(min = 7, message = "Phone must be at least 7 characters long"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(length(min = 9, max = 10, message = "NIT must be between 9 and 10 characters"))]
    pub nit: Option<String>,
}

impl From<UpdateWorkshopRequest> for WorkshopChanges {
    fn from(request: UpdateWorkshopRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            phone: request.phone,
            email: request.email,
            nit: request.nit,
            ..Default::default()
        }
    }
}

/// Taller con propietario, plantilla activa, servicios e insumos en stock
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopDetails {
    #[serde(flatten)]
    pub workshop: Workshop,
    pub owner: Option<OwnerSummary>,
    pub employees: Vec<Employee>,
    pub services: Vec<Service>,
    pub supplies: Vec<Supply>,
}
