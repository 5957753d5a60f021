//! Middleware de autenticación JWT
//!
//! Extrae el token Bearer, lo verifica y comprueba que el usuario exista.
//! El usuario autenticado se inyecta en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, INVALID_TOKEN_MESSAGE},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let user = state.auth.authenticate(token).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
