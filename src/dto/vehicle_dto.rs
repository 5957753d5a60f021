use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleType};
use crate::models::work_order::CustomerSummary;
use crate::utils::validation::validate_vehicle_year;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_year", skip_on_field_errors = false))]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 50, message = "Brand must be between 2 and 50 characters"))]
    pub brand: String,

    #[validate(length(min = 2, max = 50, message = "Model must be between 2 and 50 characters"))]
    pub model: String,

    pub year: i32,

    #[validate(
        length(min = 3, max = 15, message = "Plate must be between 3 and 15 characters"),
        regex(
            path = "crate::utils::validation::PLATE_REGEX",
            message = "Plate must contain only uppercase letters, numbers and hyphens"
        )
    )]
    pub plate: String,

    #[validate(length(min = 2, max = 30, message = "Color must be between 2 and 30 characters"))]
    pub color: String,

    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,

    #[validate(range(min = 0, message = "Mileage must be a positive number"))]
    pub mileage: Option<i32>,
}

fn validate_create_year(request: &CreateVehicleRequest) -> Result<(), ValidationError> {
    validate_vehicle_year(request.year)
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        Self {
            brand: request.brand,
            model: request.model,
            year: request.year,
            plate: request.plate,
            color: request.color,
            vehicle_type: request.vehicle_type,
            mileage: request.mileage,
        }
    }
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_year", skip_on_field_errors = false))]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 50, message = "Brand must be between 2 and 50 characters"))]
    pub brand: Option<String>,

    #[validate(length(min = 2, max = 50, message = "Model must be between 2 and 50 characters"))]
    pub model: Option<String>,

    pub year: Option<i32>,

    #[validate(
        length(min = 3, max = 15, message = "Plate must be between 3 and 15 characters"),
        regex(
            path = "crate::utils::validation::PLATE_REGEX",
            message = "Plate must contain only uppercase letters, numbers and hyphens"
        )
    )]
    pub plate: Option<String>,

    #[validate(length(min = 2, max = 30, message = "Color must be between 2 and 30 characters"))]
    pub color: Option<String>,

    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,

    #[validate(range(min = 0, message = "Mileage must be a positive number"))]
    pub mileage: Option<i32>,
}

fn validate_update_year(request: &UpdateVehicleRequest) -> Result<(), ValidationError> {
    match request.year {
        Some(year) => validate_vehicle_year(year),
        None => Ok(()),
    }
}

impl From<UpdateVehicleRequest> for VehicleChanges {
    fn from(request: UpdateVehicleRequest) -> Self {
        Self {
            brand: request.brand,
            model: request.model,
            year: request.year,
            plate: request.plate,
            color: request.color,
            vehicle_type: request.vehicle_type,
            mileage: request.mileage,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCount {
    pub work_orders: i64,
}

/// Vehículo con el resumen de su cliente
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub customer: CustomerSummary,
    #[serde(rename = "_count")]
    pub count: VehicleCount,
}

impl VehicleResponse {
    pub fn new(vehicle: Vehicle, customer: CustomerSummary) -> Self {
        let count = VehicleCount {
            work_orders: vehicle.work_order_count,
        };
        Self {
            vehicle,
            customer,
            count,
        }
    }
}
