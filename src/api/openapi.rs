use super::{
    error::FieldError,
    handlers::{db_test, events},
    models::{CreateEventRequest, EventFields, GetEventDetailsRequest, UpdateEventRequest},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        db_test::db_test,
        events::list_events,
        events::get_event_details,
        events::create_event,
        events::update_event,
    ),
    components(schemas(
        EventFields,
        CreateEventRequest,
        UpdateEventRequest,
        GetEventDetailsRequest,
        FieldError,
    )),
    tags(
        (name = "events", description = "Event stored procedures"),
        (name = "health", description = "Database connectivity"),
    )
)]
struct ApiDoc;

/// The `OpenAPI` document served under `/api-docs/openapi.json`.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
