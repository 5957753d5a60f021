use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::models::supply::{NewSupply, SupplyChanges};
use crate::utils::validation::to_money;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, max = 9999999999.99, message = "Price must be between 0 and 9999999999.99"))]
    pub price: f64,

    #[validate(range(min = 0, message = "Stock must be a positive integer"))]
    pub stock: i32,
}

impl TryFrom<CreateSupplyRequest> for NewSupply {
    type Error = ValidationErrors;

    fn try_from(request: CreateSupplyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: request.name,
            description: request.description,
            price: to_money("price", request.price)?,
            stock: request.stock,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, max = 9999999999.99, message = "Price must be between 0 and 9999999999.99"))]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "Stock must be a positive integer"))]
    pub stock: Option<i32>,
}

impl TryFrom<UpdateSupplyRequest> for SupplyChanges {
    type Error = ValidationErrors;

    fn try_from(request: UpdateSupplyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: request.name,
            description: request.description,
            price: request.price.map(|price| to_money("price", price)).transpose()?,
            stock: request.stock,
        })
    }
}
