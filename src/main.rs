use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use workshop_api::config::{DatabaseConfig, EnvironmentConfig};
use workshop_api::database::DatabaseConnection;
use workshop_api::repositories::Repositories;
use workshop_api::services::{CloudinaryImageStore, ImageStore, UnconfiguredImageStore};
use workshop_api::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,workshop_api=debug,tower_http=info")),
        )
        .init();

    info!("🔧 Workshop API");
    info!("================");

    let config = EnvironmentConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::connect(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    db_connection.run_migrations().await?;

    let images: Arc<dyn ImageStore> = match config.cloudinary.clone() {
        Some(cloudinary) => {
            info!("🖼️  Cloudinary configurado ({})", cloudinary.cloud_name);
            Arc::new(CloudinaryImageStore::new(reqwest::Client::new(), cloudinary))
        }
        None => {
            warn!("⚠️  Cloudinary no configurado; la subida de logos devolverá error");
            Arc::new(UnconfiguredImageStore)
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    info!("🌍 Entorno: {}", config.environment);

    let repos = Repositories::postgres(db_connection.pool().clone());
    let app = create_app(AppState::new(config, repos, images));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   /api/auth        register, login, me");
    info!("   /api/users       me");
    info!("   /api/workshops   talleres, estadísticas y empleados");
    info!("   /api/customers   clientes y vehículos");
    info!("   /api/services    servicios");
    info!("   /api/supplies    insumos");
    info!("   /api/work-orders órdenes de trabajo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
