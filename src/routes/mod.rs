//! Rutas HTTP
//!
//! Cada módulo expone un `create_*_router`; `create_app` los monta bajo
//! `/api` con sus middlewares.

pub mod auth_routes;
pub mod customer_routes;
pub mod employee_routes;
pub mod health_routes;
pub mod service_routes;
pub mod supply_routes;
pub mod user_routes;
pub mod work_order_routes;
pub mod workshop_routes;

use axum::{http::Uri, middleware, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_middleware, cors_layer, workshop_access_middleware};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Construir la aplicación completa
pub fn create_app(state: AppState) -> Router {
    // Rutas que operan sobre el taller resuelto del usuario.
    // La última capa añadida se ejecuta primero: auth antes que acceso.
    let workshop_scoped = Router::new()
        .nest("/customers", customer_routes::create_customer_router())
        .nest("/services", service_routes::create_service_router())
        .nest("/supplies", supply_routes::create_supply_router())
        .nest("/work-orders", work_order_routes::create_work_order_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            workshop_access_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .nest("/users", user_routes::create_user_router(state.clone()))
        .nest("/workshops", workshop_routes::create_workshop_router(state.clone()))
        .merge(workshop_scoped);

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(health_routes::create_health_router())
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}
