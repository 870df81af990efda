use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use configs::{LockScope, ReservationConfig};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use super::domain::{BookingRequest, Reservation};
use super::errors::ReservationError;
use super::locks::BookingLocks;
use super::repository::ReservationRepository;

/// Upper bound on tables created by one provisioning call
pub const MAX_TABLES_PER_PROVISION: u32 = 1_000;

fn validate_restaurant(restaurant_id: i32) -> Result<(), ReservationError> {
    if restaurant_id <= 0 {
        return Err(ReservationError::Validation("restaurant_id must be positive".into()));
    }
    Ok(())
}

fn validate_slot(restaurant_id: i32, start_time: i64) -> Result<(), ReservationError> {
    validate_restaurant(restaurant_id)?;
    models::reservation::validate_start_time(start_time).map_err(|e| ReservationError::from_model("validate start time", e))
}

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub lock_scope: LockScope,
    pub lock_timeout: Duration,
    /// Bounds the booking transaction up to COMMIT; the commit is always awaited.
    pub transaction_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_scope: LockScope::Global,
            lock_timeout: Duration::from_secs(5),
            transaction_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ReservationConfig> for EngineConfig {
    fn from(cfg: &ReservationConfig) -> Self {
        Self {
            lock_scope: cfg.lock_scope,
            lock_timeout: Duration::from_millis(cfg.lock_timeout_ms),
            transaction_timeout: Duration::from_millis(cfg.transaction_timeout_ms),
        }
    }
}

/// Reservation engine independent of web framework
pub struct ReservationService<R: ReservationRepository> {
    repo: Arc<R>,
    locks: BookingLocks,
    cfg: EngineConfig,
}

impl<R: ReservationRepository> ReservationService<R> {
    pub fn new(repo: Arc<R>, cfg: EngineConfig) -> Self {
        let locks = BookingLocks::new(cfg.lock_scope);
        Self { repo, locks, cfg }
    }

    /// Create `count` tables for a restaurant.
    #[instrument(skip(self))]
    pub async fn provision_tables(&self, restaurant_id: i32, count: u32) -> Result<Vec<i32>, ReservationError> {
        validate_restaurant(restaurant_id)?;
        if count == 0 || count > MAX_TABLES_PER_PROVISION {
            return Err(ReservationError::Validation(format!("table count must be within 1..={MAX_TABLES_PER_PROVISION}")));
        }
        let ids = self.repo.provision_tables(restaurant_id, count).await?;
        info!(restaurant_id, tables = ids.len(), "restaurant_tables_provisioned");
        Ok(ids)
    }

    /// Number of the restaurant's tables free for a booking starting at `start_time`.
    #[instrument(skip(self))]
    pub async fn available_table_count(&self, restaurant_id: i32, start_time: i64) -> Result<u64, ReservationError> {
        validate_slot(restaurant_id, start_time)?;
        self.repo.available_table_count(restaurant_id, start_time).await.inspect_err(|e| {
            error!(code = e.code(), error = %e, restaurant_id, start_time, "available_table_count failed");
        })
    }

    /// Book one table for `user_id` at `start_time`.
    ///
    /// The check-pick-insert sequence runs under the booking lock, so two
    /// callers can never both take the last free table of a slot.
    ///
    /// # Examples
    /// ```
    /// use service::reservation::{EngineConfig, ReservationError, ReservationService};
    /// use service::reservation::repository::mock::MockReservationRepository;
    /// use std::sync::Arc;
    /// let svc = ReservationService::new(Arc::new(MockReservationRepository::default()), EngineConfig::default());
    /// tokio_test::block_on(svc.provision_tables(1, 1)).unwrap();
    /// let booked = tokio_test::block_on(svc.create_reservation(1, 1_000, "alice")).unwrap();
    /// assert_eq!(booked.restaurant_id, 1);
    /// let again = tokio_test::block_on(svc.create_reservation(1, 1_000, "bob"));
    /// assert!(matches!(again, Err(ReservationError::NoAvailability { .. })));
    /// ```
    #[instrument(skip(self), fields(lock_scope = ?self.cfg.lock_scope))]
    pub async fn create_reservation(&self, restaurant_id: i32, start_time: i64, user_id: &str) -> Result<Reservation, ReservationError> {
        validate_slot(restaurant_id, start_time)?;
        models::reservation::validate_user_id(user_id).map_err(|e| ReservationError::Validation(e.to_string()))?;

        let _guard = timeout(self.cfg.lock_timeout, self.locks.acquire(restaurant_id))
            .await
            .map_err(|_| {
                warn!(restaurant_id, start_time, timeout_ms = self.cfg.lock_timeout.as_millis() as u64, "booking lock wait timed out");
                ReservationError::Timeout("booking lock")
            })?;

        let request = BookingRequest { restaurant_id, start_time, user_id: user_id.to_string() };
        let now = Utc::now().timestamp();
        // the guard outlives the commit, whatever its outcome
        let result = self.repo.book_first_available(&request, now, self.cfg.transaction_timeout).await;

        match &result {
            Ok(r) => info!(reservation_id = r.id, table_id = r.table_id, restaurant_id, start_time, "reservation_created"),
            Err(ReservationError::NoAvailability { .. }) => debug!(restaurant_id, start_time, "no table available"),
            Err(e) => error!(code = e.code(), error = %e, restaurant_id, start_time, "create_reservation failed"),
        }
        result
    }

    /// Soft-delete reservations whose slot ended at or before `now`.
    ///
    /// Housekeeping only: failures are logged and never returned.
    #[instrument(skip(self))]
    pub async fn expire_old_reservations(&self, now: i64) {
        match self.repo.expire_before(now).await {
            Ok(0) => debug!(now, "no reservations to expire"),
            Ok(expired) => info!(expired, now, "reservations_expired"),
            Err(e) => error!(code = e.code(), error = %e, now, "expiry sweep failed"),
        }
    }

    pub async fn find_reservation(&self, id: i32) -> Result<Option<Reservation>, ReservationError> {
        self.repo.find_reservation(id).await
    }
}
