//! Background expiry sweeper
//!
//! Periodically soft-deletes reservations whose slot has ended. Runs outside
//! the booking lock; the sweep is a single UPDATE statement.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::repository::ReservationRepository;
use super::service::ReservationService;

/// Spawn the sweeper; it stops once `shutdown` turns `true` or its sender is dropped.
/// A zero `every` is raised to one second.
pub fn spawn_expiry_sweeper<R>(
    svc: Arc<ReservationService<R>>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    R: ReservationRepository + 'static,
{
    let every = every.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = every.as_secs(), "expiry sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    svc.expire_old_reservations(Utc::now().timestamp()).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("expiry sweeper stopped");
    })
}
