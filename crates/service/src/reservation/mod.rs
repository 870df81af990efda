//! Reservation module: three-layer architecture (domain, repository, service).
//!
//! `service::ReservationService` is the engine: availability counting,
//! serialized booking and the periodic expiry sweep.

pub mod domain;
pub mod errors;
pub mod expiry;
pub mod locks;
pub mod repo;
pub mod repository;
pub mod service;


pub use errors::ReservationError;
pub use service::{EngineConfig, ReservationService};
