//! Utilidades de validación
//!
//! Este módulo contiene las expresiones regulares y funciones helper
//! usadas por los DTOs con `#[derive(Validate)]`.

use chrono::{Datelike, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// Teléfono: dígitos, espacios, guiones, paréntesis y un `+` inicial opcional
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[\+]?[0-9\s\-\(\)]+$").unwrap();

    /// Placa: mayúsculas, dígitos y guiones
    pub static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z0-9-]+$").unwrap();
}

/// Año mínimo aceptado para un vehículo
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Mayor importe que cabe en una columna `NUMERIC(12, 2)`
pub const MAX_MONEY: f64 = 9_999_999_999.99;

/// Construye un error de validación con mensaje
pub fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validar fecha en formato `YYYY-MM-DD`
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value).map(|_| ())
}

/// Convertir string a fecha
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = validation_error("date", "Invalid date, expected YYYY-MM-DD");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar que un string no esté vacío tras recortar espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("not_blank", "Must not be blank"));
    }
    Ok(())
}

/// Validar el año de un vehículo contra el año actual
///
/// Se acepta hasta el año siguiente al actual.
pub fn validate_vehicle_year(year: i32) -> Result<(), ValidationError> {
    let max = Utc::now().year() + 1;
    if year < MIN_VEHICLE_YEAR || year > max {
        let mut error = validation_error("year", "Invalid vehicle year");
        error.add_param("field".into(), &"year");
        error.add_param("min".into(), &MIN_VEHICLE_YEAR);
        error.add_param("max".into(), &max);
        return Err(error);
    }
    Ok(())
}

/// Convertir un importe recibido como `f64` a `Decimal` con dos decimales
///
/// Falla con un error de validación sobre `field` si el importe es negativo,
/// no finito o no cabe en `NUMERIC(12, 2)`.
pub fn to_money(field: &'static str, value: f64) -> Result<Decimal, ValidationErrors> {
    let amount = if (0.0..=MAX_MONEY).contains(&value) {
        Decimal::from_f64_retain(value).map(|amount| amount.round_dp(2))
    } else {
        None
    };

    amount.ok_or_else(|| {
        let error = validation_error("money", "Amount must be between 0 and 9999999999.99");
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        errors
    })
}
