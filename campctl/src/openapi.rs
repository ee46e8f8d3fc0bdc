//! OpenAPI documentation for the v2 API.
//!
//! The generated spec is served at `/api-docs/openapi.json` and rendered by
//! Scalar at `/docs`.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api;

/// Bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token authentication. Obtain a token pair from \
                             `POST /v2/auth/login` and send the access token in the \
                             `Authorization` header:\n\n```\nAuthorization: Bearer ACCESS_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "campctl API",
        description = "Scouting-camp logistics: group accounts, tents, events, reservations, inspections and meal planning.",
    ),
    paths(
        api::handlers::auth::login,
        api::handlers::auth::refresh,
        api::handlers::auth::create_group,
        api::handlers::groups::me,
        api::handlers::groups::update_email,
        api::handlers::groups::update_members,
        api::handlers::groups::update_name,
        api::handlers::tents::list_tents,
        api::handlers::tents::create_tent,
        api::handlers::tents::get_tent,
        api::handlers::tents::update_tent,
        api::handlers::tents::delete_tent,
        api::handlers::events::list_events,
        api::handlers::events::create_event,
        api::handlers::events::get_event,
        api::handlers::events::update_event,
        api::handlers::events::delete_event,
        api::handlers::reservations::list_reservations,
        api::handlers::reservations::create_reservation,
        api::handlers::reservations::get_reservation,
        api::handlers::reservations::update_reservation,
        api::handlers::reservations::delete_reservation,
        api::handlers::inspections::list_inspections,
        api::handlers::inspections::create_inspection,
        api::handlers::inspections::get_inspection,
        api::handlers::inspections::update_inspection,
        api::handlers::inspections::delete_inspection,
        api::handlers::menus::list_menus,
        api::handlers::menus::create_menu,
        api::handlers::menus::get_menu,
        api::handlers::menus::update_menu,
        api::handlers::menus::delete_menu,
        api::handlers::menus::list_event_menus,
        api::handlers::menus::create_event_menu,
        api::handlers::menus::get_event_menu,
        api::handlers::menus::update_event_menu,
        api::handlers::menus::delete_event_menu,
    ),
    components(schemas(
        api::models::auth::LoginRequest,
        api::models::auth::LoginResponse,
        api::models::auth::RefreshRequest,
        api::models::auth::RefreshResponse,
        api::models::groups::CurrentGroup,
        api::models::groups::GroupCreateRequest,
        api::models::groups::GroupResponse,
        api::models::groups::UpdateEmailRequest,
        api::models::groups::UpdateMembersRequest,
        api::models::groups::UpdateNameRequest,
        api::models::tents::TentCreateRequest,
        api::models::tents::TentUpdateRequest,
        api::models::tents::TentResponse,
        api::models::events::EventCreateRequest,
        api::models::events::EventUpdateRequest,
        api::models::events::EventResponse,
        api::models::reservations::ReservationCreateRequest,
        api::models::reservations::ReservationUpdateRequest,
        api::models::reservations::ReservationResponse,
        api::models::inspections::InspectionCreateRequest,
        api::models::inspections::InspectionUpdateRequest,
        api::models::inspections::InspectionResponse,
        api::models::menus::MenuCreateRequest,
        api::models::menus::MenuUpdateRequest,
        api::models::menus::MenuResponse,
        api::models::menus::EventMenuCreateRequest,
        api::models::menus::EventMenuUpdateRequest,
        api::models::menus::EventMenuResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, token refresh and group registration"),
        (name = "groups", description = "Current group profile"),
        (name = "tents", description = "Tent inventory"),
        (name = "events", description = "Camps and outings"),
        (name = "reservations", description = "Tent reservations"),
        (name = "inspections", description = "Tent condition reports"),
        (name = "menus", description = "Shared menu catalog and event meal plans"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_covers_all_resources() {
        let spec = ApiDoc::openapi();
        for path in [
            "/v2/auth/login",
            "/v2/auth/refresh",
            "/v2/auth/groups",
            "/v2/groups/me",
            "/v2/tents",
            "/v2/events",
            "/v2/reservations",
            "/v2/inspections",
            "/v2/menus",
            "/v2/event-menus",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
