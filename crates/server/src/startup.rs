use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::reservation::expiry::spawn_expiry_sweeper;
use service::reservation::repo::seaorm::SeaOrmReservationRepository;
use service::{EngineConfig, ReservationService};

use crate::errors::StartupError;
use crate::routes;
use crate::state::{Engine, ServerAuthConfig, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// config.toml when present, otherwise defaults plus environment overrides.
fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unusable, falling back to environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Build the application router and the engine behind it from a migrated connection.
pub fn build_app(
    db: sea_orm::DatabaseConnection,
    engine: EngineConfig,
    jwt_secret: String,
) -> (Router, Arc<Engine>) {
    let repo = Arc::new(SeaOrmReservationRepository { db });
    let reservations = Arc::new(ReservationService::new(repo, engine));
    let state = ServerState {
        reservations: Arc::clone(&reservations),
        auth: ServerAuthConfig { jwt_secret },
    };
    (routes::build_router(state, build_cors()), reservations)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: connect, migrate, start the expiry sweeper and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = load_config()?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set, using development secret");
        "dev-secret-change-me".to_string()
    });
    let engine = EngineConfig::from(&cfg.reservation);
    info!(lock_scope = ?engine.lock_scope, lock_timeout_ms = cfg.reservation.lock_timeout_ms, "reservation engine configured");
    let (app, reservations) = build_app(db, engine, jwt_secret);

    let (stop_tx, stop_rx) = watch::channel(false);
    let sweeper = match cfg.reservation.expiry_interval_secs {
        0 => {
            info!("expiry sweeper disabled");
            None
        }
        secs => Some(spawn_expiry_sweeper(reservations, Duration::from_secs(secs), stop_rx)),
    };

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting reservation server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = stop_tx.send(true);
    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            warn!(error = %e, "expiry sweeper task ended abnormally");
        }
    }
    Ok(())
}
