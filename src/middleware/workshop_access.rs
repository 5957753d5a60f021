//! Middleware de acceso a talleres
//!
//! Debe ejecutarse después de `auth_middleware`. Resuelve el taller del
//! usuario y lo inyecta como `WorkshopAccess` para los handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    middleware::auth::AuthenticatedUser,
    state::AppState,
    utils::{errors::AppError, jwt::INVALID_TOKEN_MESSAGE},
};

pub async fn workshop_access_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

    let access = state.access.resolve(&user).await?;
    request.extensions_mut().insert(access);

    Ok(next.run(request).await)
}
