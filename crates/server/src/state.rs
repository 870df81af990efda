use std::sync::Arc;

use service::reservation::repo::seaorm::SeaOrmReservationRepository;
use service::ReservationService;

/// Reservation engine backed by the SQL database.
pub type Engine = ReservationService<SeaOrmReservationRepository>;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

/// Shared by every handler and the bearer middleware.
#[derive(Clone)]
pub struct ServerState {
    pub reservations: Arc<Engine>,
    pub auth: ServerAuthConfig,
}
