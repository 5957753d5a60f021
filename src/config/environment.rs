//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use thiserror::Error;

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} must be a valid number")]
    InvalidNumber(&'static str),

    #[error("Cloudinary configuration is incomplete: {0} must be set")]
    IncompleteCloudinary(&'static str),
}

/// Credenciales del servicio de imágenes
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (None, None, None) => None,
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            (None, _, _) => return Err(ConfigError::IncompleteCloudinary("CLOUDINARY_CLOUD_NAME")),
            (_, None, _) => return Err(ConfigError::IncompleteCloudinary("CLOUDINARY_API_KEY")),
            (_, _, None) => return Err(ConfigError::IncompleteCloudinary("CLOUDINARY_API_SECRET")),
        };

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or("PORT", get("PORT"), 3000)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration: parse_or("JWT_EXPIRATION", get("JWT_EXPIRATION"), 86_400)?,
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), 10)?,
            cors_origins: get("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cloudinary,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(key)),
        None => Ok(default),
    }
}
