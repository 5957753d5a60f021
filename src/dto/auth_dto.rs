use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::user::User;
use crate::utils::validation::validation_error;

/// Longitud mínima de contraseña para registros sin red social
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Registro de usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_register_password", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    pub password: Option<String>,

    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,

    #[validate(url(message = "Avatar must be a valid url"))]
    pub avatar: Option<String>,

    #[serde(default, alias = "habeas_data")]
    pub habeas_data: bool,

    #[serde(default)]
    pub session_facebook: bool,

    #[serde(default)]
    pub session_google: bool,
}

impl RegisterRequest {
    /// Registro a través de Facebook o Google
    pub fn is_social(&self) -> bool {
        self.session_facebook || self.session_google
    }
}

/// La contraseña sólo es obligatoria cuando no hay sesión social
fn validate_register_password(request: &RegisterRequest) -> Result<(), ValidationError> {
    if request.is_social() {
        return Ok(());
    }

    let long_enough = request
        .password
        .as_deref()
        .map(|p| p.chars().count() >= MIN_PASSWORD_LENGTH)
        .unwrap_or(false);

    if !long_enough {
        let mut error = validation_error(
            "password",
            "Password must be at least 6 characters long",
        );
        error.add_param("field".into(), &"password");
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(alias = "session_network")]
    pub session_network: Option<String>,
}

// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habeas_data: Option<bool>,
}
