use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{patch, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::controllers::user_controller::UserController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::dto::user_dto::UpdateProfileRequest;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", patch(update_me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.login(request).await?;
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
