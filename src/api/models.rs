use serde::Deserialize;
use utoipa::ToSchema;

/// Fields shared by the create and update bodies.
#[derive(ToSchema, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    #[schema(min_length = 2)]
    pub event_name_ar: String,
    #[schema(min_length = 2)]
    pub event_desc_ar: String,
    #[serde(default)]
    #[schema(min_length = 2)]
    pub event_name_en: Option<String>,
    #[serde(default)]
    #[schema(min_length = 2)]
    pub event_desc_en: Option<String>,
    /// `0` inactive, `1` active.
    #[schema(minimum = 0, maximum = 1)]
    pub status: i64,
    /// Passed through to the database as-is.
    pub event_datetime: String,
    /// Id of an uploaded image.
    #[schema(minimum = 1)]
    pub event_image: i64,
    #[schema(minimum = 0)]
    pub event_sort_rank: i64,
}

#[derive(ToSchema, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    #[serde(flatten)]
    pub event: EventFields,
}

#[derive(ToSchema, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateEventRequest {
    #[schema(minimum = 1)]
    pub event_id: i64,
    #[serde(flatten)]
    pub event: EventFields,
}

/// Body of `/get/event-details/`. Only used for the `OpenAPI` document: the
/// handler checks `event_id` by hand.
#[derive(ToSchema, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetEventDetailsRequest {
    #[schema(minimum = 1)]
    pub event_id: i64,
}
