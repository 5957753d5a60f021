//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.
//!
//! Los errores operacionales (validación, autenticación, permisos, recursos
//! inexistentes y conflictos) se devuelven tal cual al cliente. El resto se
//! registra con `tracing` y se enmascara detrás de un 500 genérico.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Mensaje que recibe el cliente ante cualquier error no operacional
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

/// Resultado estándar de la aplicación
pub type AppResult<T> = Result<T, AppError>;

/// Detalle de un campo inválido
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Envoltorio de error de la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: &'static str,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl AppError {
    /// Código HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Hash(_)
            | AppError::ExternalApi(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Indica si el mensaje del error puede mostrarse al cliente
    pub fn is_operational(&self) -> bool {
        !self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(errors) => {
                tracing::debug!("Validation error: {}", errors);
                ErrorResponse {
                    status: "error",
                    status_code: status.as_u16(),
                    message: "Validation error".to_string(),
                    errors: Some(flatten_validation_errors(&errors)),
                }
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => {
                tracing::debug!(status = status.as_u16(), "{}", msg);
                ErrorResponse {
                    status: "error",
                    status_code: status.as_u16(),
                    message: msg,
                    errors: None,
                }
            }
            other => {
                tracing::error!(error = %other, "Unhandled error");
                ErrorResponse {
                    status: "error",
                    status_code: status.as_u16(),
                    message: GENERIC_ERROR_MESSAGE.to_string(),
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Aplana los errores del validador en pares campo/mensaje
///
/// Los campos se devuelven en camelCase con rutas separadas por puntos,
/// por ejemplo `supplies.0.quantity`. El resultado se ordena por campo.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_errors(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = join_path(prefix, &to_camel_case(field));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    // Los errores de esquema llevan el campo real como parámetro
                    let target = match error.params.get("field").and_then(|v| v.as_str()) {
                        Some(real) if *field == "__all__" => join_path(prefix, real),
                        _ => name.clone(),
                    };
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(&error.code));
                    out.push(FieldError {
                        field: target,
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(nested, &name, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(nested, &join_path(&name, &index.to_string()), out);
                }
            }
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn default_message(code: &str) -> String {
    match code {
        "email" => "Invalid email".to_string(),
        "url" => "Invalid url".to_string(),
        "required" => "Required".to_string(),
        "regex" => "Invalid format".to_string(),
        other => format!("Invalid value ({})", other),
    }
}

/// Convierte `snake_case` a `camelCase`
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(message: &str) -> AppError {
    AppError::NotFound(message.to_string())
}

/// Función helper para crear errores de permisos
pub fn forbidden_error(message: &str) -> AppError {
    AppError::Forbidden(message.to_string())
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(message: &str) -> AppError {
    AppError::Conflict(message.to_string())
}

/// Función helper para crear errores de petición inválida
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Traduce violaciones de unicidad de Postgres a un conflicto con mensaje propio
pub fn map_unique_violation(error: sqlx::Error, message: &str) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            conflict_error(message)
        }
        _ => AppError::Database(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Line {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: i32,
    }

    #[derive(Debug, Validate)]
    struct Order {
        #[validate(length(min = 1, message = "Mechanic is required"))]
        mechanic_name: String,
        #[validate]
        supplies: Vec<Line>,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_operational_split() {
        assert!(AppError::BadRequest("x".into()).is_operational());
        assert!(AppError::Unauthorized("x".into()).is_operational());
        assert!(!AppError::Internal("x".into()).is_operational());
        assert!(!AppError::Hash("x".into()).is_operational());
        assert!(!AppError::Database(sqlx::Error::RowNotFound).is_operational());
    }

    #[test]
    fn test_flatten_nested_errors() {
        let order = Order {
            mechanic_name: String::new(),
            supplies: vec![Line { quantity: 1 }, Line { quantity: 0 }],
        };
        let errors = order.validate().unwrap_err();
        let flat = flatten_validation_errors(&errors);

        assert_eq!(
            flat,
            vec![
                FieldError {
                    field: "mechanicName".to_string(),
                    message: "Mechanic is required".to_string(),
                },
                FieldError {
                    field: "supplies.1.quantity".to_string(),
                    message: "Quantity must be at least 1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("additional_notes"), "additionalNotes");
        assert_eq!(to_camel_case("plate"), "plate");
    }
}
