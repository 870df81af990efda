use std::time::Duration;

use sea_orm::{DatabaseConnection, TransactionTrait};
use tokio::time::timeout;

use models::{reservation, restaurant_table};
use models::errors::ModelError;

use crate::reservation::domain::{BookingRequest, Reservation};
use crate::reservation::errors::ReservationError;
use crate::reservation::repository::ReservationRepository;

#[derive(Clone)]
pub struct SeaOrmReservationRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn provision_tables(&self, restaurant_id: i32, count: u32) -> Result<Vec<i32>, ReservationError> {
        let txn = self.db.begin().await.map_err(|e| ReservationError::persistence("begin provisioning", e))?;
        let tables = restaurant_table::create_for_restaurant(&txn, restaurant_id, count)
            .await
            .map_err(|e| ReservationError::from_model("provision tables", e))?;
        txn.commit().await.map_err(|e| ReservationError::persistence("commit provisioning", e))?;
        Ok(tables.into_iter().map(|t| t.id).collect())
    }

    async fn available_table_count(&self, restaurant_id: i32, start_time: i64) -> Result<u64, ReservationError> {
        restaurant_table::count_available(&self.db, restaurant_id, start_time)
            .await
            .map_err(|e| ReservationError::from_model("count available tables", e))
    }

    async fn book_first_available(&self, request: &BookingRequest, now: i64, budget: Duration) -> Result<Reservation, ReservationError> {
        let no_table = || ReservationError::NoAvailability { restaurant_id: request.restaurant_id, start_time: request.start_time };

        // Every early return below drops `txn` uncommitted, which rolls it back.
        let staged = async {
            let txn = self.db.begin().await.map_err(|e| ReservationError::persistence("begin booking", e))?;

            let available = restaurant_table::count_available(&txn, request.restaurant_id, request.start_time)
                .await
                .map_err(|e| ReservationError::from_model("count available tables", e))?;
            if available == 0 {
                return Err(no_table());
            }

            let table = restaurant_table::first_available(&txn, request.restaurant_id, request.start_time)
                .await
                .map_err(|e| ReservationError::aborted("select table", e))?
                .ok_or_else(no_table)?;

            let created = reservation::create(&txn, request.restaurant_id, table.id, request.start_time, &request.user_id, now)
                .await
                .map_err(|e| match e {
                    ModelError::Validation(msg) => ReservationError::Validation(msg),
                    other => ReservationError::aborted("insert reservation", other),
                })?;
            Ok::<_, ReservationError>((txn, created))
        };
        let (txn, created) = timeout(budget, staged)
            .await
            .map_err(|_| ReservationError::Timeout("booking transaction"))??;

        // Not bounded: once COMMIT is sent its outcome must be known before the lock is released.
        txn.commit().await.map_err(|e| ReservationError::aborted("commit booking", e))?;
        Ok(created.into())
    }

    async fn expire_before(&self, now: i64) -> Result<u64, ReservationError> {
        reservation::expire_before(&self.db, now)
            .await
            .map_err(|e| ReservationError::from_model("expire reservations", e))
    }

    async fn find_reservation(&self, id: i32) -> Result<Option<Reservation>, ReservationError> {
        let found = reservation::find(&self.db, id)
            .await
            .map_err(|e| ReservationError::from_model("find reservation", e))?;
        Ok(found.map(Into::into))
    }
}
