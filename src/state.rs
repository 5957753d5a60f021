//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todo se construye explícitamente en el
//! arranque; no hay singletons de módulo.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Repositories;
use crate::services::{AccessService, AuthService, ImageStore};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub repos: Repositories,
    pub auth: AuthService,
    pub access: AccessService,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repos: Repositories, images: Arc<dyn ImageStore>) -> Self {
        let auth = AuthService::new(
            repos.users.clone(),
            JwtConfig::from(&config),
            config.bcrypt_cost,
        );
        let access = AccessService::new(repos.workshops.clone(), repos.employees.clone());

        Self {
            config: Arc::new(config),
            repos,
            auth,
            access,
            images,
        }
    }
}
