use serde::{Deserialize, Serialize};

/// Booking input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub restaurant_id: i32,
    pub start_time: i64,
    pub user_id: String,
}

/// Domain reservation (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub start_time: i64,
    pub user_id: String,
    pub updated: i64,
    pub deleted: bool,
}

impl From<models::reservation::Model> for Reservation {
    fn from(m: models::reservation::Model) -> Self {
        Self {
            id: m.id,
            restaurant_id: m.restaurant_id,
            table_id: m.table_id,
            start_time: m.start_time,
            user_id: m.user_id,
            updated: m.updated,
            deleted: m.deleted,
        }
    }
}
