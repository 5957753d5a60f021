//! Servicio de autenticación
//!
//! Registro, login y verificación de tokens. El hashing con bcrypt se
//! ejecuta en el pool bloqueante de tokio.

use rand::RngCore;
use std::sync::Arc;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{NewUser, User};
use crate::repositories::user_repository::EMAIL_TAKEN;
use crate::repositories::UserRepository;
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::jwt::{generate_token, verify_token, JwtConfig, INVALID_TOKEN_MESSAGE};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bcrypt_cost,
        }
    }

    /// Registra un usuario nuevo
    ///
    /// Los registros por Facebook o Google sin contraseña reciben una aleatoria.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(conflict_error(EMAIL_TAKEN));
        }

        let password = match request.password.clone() {
            Some(password) if !password.is_empty() => password,
            _ => random_password(),
        };
        let password_hash = hash_password(password, self.bcrypt_cost).await?;

        let user = self
            .users
            .create(NewUser {
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                avatar: request.avatar,
                habeas_data: request.habeas_data,
                session_facebook: request.session_facebook,
                session_google: request.session_google,
            })
            .await?;

        tracing::info!(user_id = %user.id, "👤 Usuario registrado");
        Ok(user)
    }

    /// Valida credenciales y emite un token
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            tracing::debug!(user_id = %user.id, "Contraseña incorrecta");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = generate_token(user.id, &self.jwt)?;

        Ok(match request.session_network {
            Some(network) => LoginResponse {
                message: format!("{} login successful", network),
                token,
                habeas_data: Some(user.habeas_data),
            },
            None => LoginResponse {
                message: "Login successful".to_string(),
                token,
                habeas_data: None,
            },
        })
    }

    /// Verifica un token y comprueba que el usuario siga existiendo
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let user_id = verify_token(token, &self.jwt)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
        })
    }
}

/// Contraseña aleatoria de 16 bytes en hexadecimal
pub fn random_password() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de hashing abortada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de hashing abortada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_password_shape() {
        let password = random_password();
        assert_eq!(password.len(), 32);
        assert!(password.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(password, random_password());
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("secreto".to_string(), 4).await.unwrap();
        assert!(verify_password("secreto".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("otro".to_string(), hash).await.unwrap());
    }
}
