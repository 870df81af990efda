use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::routes::reservations::{
    AvailabilityOutput, CreateReservationInput, ProvisionTablesInput, ProvisionTablesOutput, ReservationOutput,
};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::reservations::provision_tables,
        crate::routes::reservations::availability,
        crate::routes::reservations::create_reservation,
        crate::routes::reservations::get_reservation,
    ),
    components(
        schemas(
            HealthResponse,
            ProvisionTablesInput,
            ProvisionTablesOutput,
            AvailabilityOutput,
            CreateReservationInput,
            ReservationOutput,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "reservations")
    )
)]
pub struct ApiDoc;
