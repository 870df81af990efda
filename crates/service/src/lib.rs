//! Service layer for the reservation engine.
//! - Owns the booking critical section (lock + transaction) on top of `models`.
//! - Persistence sits behind `ReservationRepository` so the engine can be driven by a mock.

pub mod reservation;
#[cfg(test)]
pub mod test_support;

pub use reservation::{EngineConfig, ReservationError, ReservationService};
