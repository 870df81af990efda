use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use service::reservation::domain::Reservation;

use super::auth::AuthUser;
use crate::state::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProvisionTablesInput {
    pub count: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProvisionTablesOutput {
    pub restaurant_id: i32,
    pub table_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Slot start, epoch seconds
    pub start_time: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityOutput {
    pub restaurant_id: i32,
    pub start_time: i64,
    pub available_tables: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationInput {
    pub start_time: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationOutput {
    pub reservation_id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub start_time: i64,
    pub user_id: String,
    pub deleted: bool,
}

impl From<Reservation> for ReservationOutput {
    fn from(r: Reservation) -> Self {
        Self {
            reservation_id: r.id,
            restaurant_id: r.restaurant_id,
            table_id: r.table_id,
            start_time: r.start_time,
            user_id: r.user_id,
            deleted: r.deleted,
        }
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{restaurant_id}/tables",
    tag = "reservations",
    params(("restaurant_id" = i32, Path, description = "Restaurant id")),
    request_body = ProvisionTablesInput,
    responses(
        (status = 201, description = "Tables created", body = ProvisionTablesOutput),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn provision_tables(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i32>,
    Json(input): Json<ProvisionTablesInput>,
) -> Result<(StatusCode, Json<ProvisionTablesOutput>), ApiError> {
    let table_ids = state.reservations.provision_tables(restaurant_id, input.count).await?;
    Ok((StatusCode::CREATED, Json(ProvisionTablesOutput { restaurant_id, table_ids })))
}

#[utoipa::path(
    get,
    path = "/restaurants/{restaurant_id}/availability",
    tag = "reservations",
    params(("restaurant_id" = i32, Path, description = "Restaurant id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Free tables for the slot", body = AvailabilityOutput),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn availability(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i32>,
    Query(q): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityOutput>, ApiError> {
    let available_tables = state.reservations.available_table_count(restaurant_id, q.start_time).await?;
    Ok(Json(AvailabilityOutput { restaurant_id, start_time: q.start_time, available_tables }))
}

#[utoipa::path(
    post,
    path = "/restaurants/{restaurant_id}/reservations",
    tag = "reservations",
    params(("restaurant_id" = i32, Path, description = "Restaurant id")),
    request_body = CreateReservationInput,
    responses(
        (status = 201, description = "Reservation created", body = ReservationOutput),
        (status = 400, description = "Bad Request"),
        (status = 409, description = "No table available for the slot"),
        (status = 503, description = "Booking lock or transaction timed out")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_reservation(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Path(restaurant_id): Path<i32>,
    Json(input): Json<CreateReservationInput>,
) -> Result<(StatusCode, Json<ReservationOutput>), ApiError> {
    let booked = state
        .reservations
        .create_reservation(restaurant_id, input.start_time, &user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(booked.into())))
}

#[utoipa::path(
    get,
    path = "/reservations/{reservation_id}",
    tag = "reservations",
    params(("reservation_id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = ReservationOutput),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_reservation(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Path(reservation_id): Path<i32>,
) -> Result<Json<ReservationOutput>, ApiError> {
    // other users' reservations are reported as absent
    match state.reservations.find_reservation(reservation_id).await? {
        Some(r) if r.user_id == user.user_id => Ok(Json(r.into())),
        _ => Err(ApiError::not_found(format!("reservation {reservation_id} not found"))),
    }
}
