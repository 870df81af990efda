#![cfg(test)]
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use models::db::{connect_with_config, DatabaseConfig};

use crate::reservation::repo::seaorm::SeaOrmReservationRepository;
use crate::reservation::{EngineConfig, ReservationService};

/// Fresh, migrated in-memory database. Clones share the same single connection.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), acquire_timeout_secs: 10, ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    models::db::migrate(&db).await?;
    Ok(db)
}

/// SeaORM-backed engine over a fresh database.
pub async fn engine(cfg: EngineConfig) -> Result<(Arc<ReservationService<SeaOrmReservationRepository>>, DatabaseConnection), anyhow::Error> {
    let db = get_db().await?;
    let repo = Arc::new(SeaOrmReservationRepository { db: db.clone() });
    Ok((Arc::new(ReservationService::new(repo, cfg)), db))
}
