use axum::{
    extract::State,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::UpdateProfileRequest;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

pub fn create_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn get_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<User>, AppError> {
    let controller = UserController::new(&state);
    let response = controller.me(&user).await?;
    Ok(Json(response))
}

async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let controller = UserController::new(&state);
    let response = controller.update_me(&user, request).await?;
    Ok(Json(response))
}
