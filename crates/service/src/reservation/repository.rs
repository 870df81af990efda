use std::time::Duration;

use async_trait::async_trait;

use super::domain::{BookingRequest, Reservation};
use super::errors::ReservationError;

/// Repository abstraction for reservation persistence.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Create `count` tables for a restaurant, all or nothing. Returns the new table ids.
    async fn provision_tables(&self, restaurant_id: i32, count: u32) -> Result<Vec<i32>, ReservationError>;

    async fn available_table_count(&self, restaurant_id: i32, start_time: i64) -> Result<u64, ReservationError>;

    /// Recount, pick the lowest free table and insert, as one transaction.
    /// Not safe against concurrent callers on its own: the engine holds the booking lock around it.
    ///
    /// `budget` bounds everything before COMMIT and yields `Timeout("booking transaction")`
    /// with the transaction rolled back. The commit itself always runs to completion,
    /// so a returned error never hides a committed row.
    async fn book_first_available(&self, request: &BookingRequest, now: i64, budget: Duration) -> Result<Reservation, ReservationError>;

    /// Soft-delete live reservations that ended at or before `now`. Returns rows touched.
    async fn expire_before(&self, now: i64) -> Result<u64, ReservationError>;

    async fn find_reservation(&self, id: i32) -> Result<Option<Reservation>, ReservationError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use models::reservation::{is_expired, window_bounds};

    #[derive(Default)]
    struct State {
        tables: Vec<(i32, i32)>,   // (table_id, restaurant_id)
        reservations: Vec<Reservation>,
        next_table_id: i32,
        next_reservation_id: i32,
    }

    /// Check, pick and insert happen under separate short critical sections with
    /// `book_delay` in between, so unserialized callers can double-book.
    /// A booking becomes visible only after `commit_delay`.
    #[derive(Default)]
    pub struct MockReservationRepository {
        state: Mutex<State>,
        book_delay: Duration,
        commit_delay: Duration,
        fail_inserts: AtomicBool,
    }

    impl MockReservationRepository {
        pub fn with_book_delay(book_delay: Duration) -> Self {
            Self { book_delay, ..Default::default() }
        }

        pub fn with_commit_delay(commit_delay: Duration) -> Self {
            Self { commit_delay, ..Default::default() }
        }

        /// Make every subsequent insert fail with a transaction abort.
        pub fn fail_inserts(&self, fail: bool) {
            self.fail_inserts.store(fail, Ordering::SeqCst);
        }

        pub fn reservation_count(&self) -> usize {
            self.state.lock().unwrap().reservations.len()
        }

        async fn pick_table(&self, request: &BookingRequest) -> Result<i32, ReservationError> {
            let available = self.available_table_count(request.restaurant_id, request.start_time).await?;
            if available == 0 {
                return Err(ReservationError::NoAvailability { restaurant_id: request.restaurant_id, start_time: request.start_time });
            }
            tokio::time::sleep(self.book_delay).await;

            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(ReservationError::aborted("insert reservation", "injected failure"));
            }
            // An unserialized caller whose earlier check went stale still writes to a table
            let table_id = {
                let state = self.state.lock().unwrap();
                let all: Vec<i32> = state.tables.iter().filter(|(_, r)| *r == request.restaurant_id).map(|(id, _)| *id).collect();
                let free = Self::free_tables(&state, request.restaurant_id, request.start_time);
                free.first().copied().or_else(|| all.first().copied())
            };
            let table_id = table_id.ok_or(ReservationError::NoAvailability { restaurant_id: request.restaurant_id, start_time: request.start_time })?;
            tokio::task::yield_now().await;
            Ok(table_id)
        }

        fn free_tables(state: &State, restaurant_id: i32, start_time: i64) -> Vec<i32> {
            let (lo, hi) = window_bounds(start_time);
            state.tables.iter()
                .filter(|(_, r)| *r == restaurant_id)
                .map(|(id, _)| *id)
                .filter(|id| !state.reservations.iter().any(|res| {
                    res.restaurant_id == restaurant_id && res.table_id == *id && !res.deleted && res.start_time > lo && res.start_time < hi
                }))
                .collect()
        }
    }

    #[async_trait]
    impl ReservationRepository for MockReservationRepository {
        async fn provision_tables(&self, restaurant_id: i32, count: u32) -> Result<Vec<i32>, ReservationError> {
            if count == 0 {
                return Err(ReservationError::Validation("table count must be at least 1".into()));
            }
            let mut state = self.state.lock().unwrap();
            let mut ids = Vec::with_capacity(count as usize);
            for _ in 0..count {
                state.next_table_id += 1;
                let id = state.next_table_id;
                state.tables.push((id, restaurant_id));
                ids.push(id);
            }
            Ok(ids)
        }

        async fn available_table_count(&self, restaurant_id: i32, start_time: i64) -> Result<u64, ReservationError> {
            let state = self.state.lock().unwrap();
            Ok(Self::free_tables(&state, restaurant_id, start_time).len() as u64)
        }

        async fn book_first_available(&self, request: &BookingRequest, now: i64, budget: Duration) -> Result<Reservation, ReservationError> {
            let table_id = tokio::time::timeout(budget, self.pick_table(request))
                .await
                .map_err(|_| ReservationError::Timeout("booking transaction"))??;

            // commit
            tokio::time::sleep(self.commit_delay).await;
            let mut state = self.state.lock().unwrap();
            state.next_reservation_id += 1;
            let r = Reservation {
                id: state.next_reservation_id,
                restaurant_id: request.restaurant_id,
                table_id,
                start_time: request.start_time,
                user_id: request.user_id.clone(),
                updated: now,
                deleted: false,
            };
            state.reservations.push(r.clone());
            Ok(r)
        }

        async fn expire_before(&self, now: i64) -> Result<u64, ReservationError> {
            let mut state = self.state.lock().unwrap();
            let mut n = 0;
            for r in state.reservations.iter_mut().filter(|r| !r.deleted && is_expired(r.start_time, now)) {
                r.deleted = true;
                r.updated = now;
                n += 1;
            }
            Ok(n)
        }

        async fn find_reservation(&self, id: i32) -> Result<Option<Reservation>, ReservationError> {
            let state = self.state.lock().unwrap();
            Ok(state.reservations.iter().find(|r| r.id == id).cloned())
        }
    }
}
