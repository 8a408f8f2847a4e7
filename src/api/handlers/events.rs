use crate::api::{
    auth::{AuthContext, MISSING_HEADERS_MESSAGE},
    error::ApiError,
    models::{CreateEventRequest, GetEventDetailsRequest, UpdateEventRequest},
    normalize::{http_status, normalize},
    procedures,
    validation::{as_integer, unreadable_body, validated, EVENT_ID_RULE, EVENT_RULES},
    Database,
};
use crate::db::ProcedureRow;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Extension},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::iter;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/get/events/",
    params(
        ("x-api-user-id" = String, Header, description = "Caller user id"),
        ("x-api-token" = String, Header, description = "Caller token"),
    ),
    responses (
        (status = 200, description = "Normalized procedure row, status code taken from its `http_code`"),
        (status = 400, description = "Missing auth headers"),
        (status = 500, description = "Database failure or no row returned"),
    ),
    tag= "events"
)]
#[instrument(skip_all)]
pub async fn list_events(db: Extension<Database>, headers: HeaderMap) -> Result<Response, ApiError> {
    let auth = AuthContext::from_headers(&headers)?;

    let row = procedures::list_events(&**db, &auth).await?;

    respond_with_row_status(row)
}

#[utoipa::path(
    post,
    path= "/get/event-details/",
    params(
        ("x-api-user-id" = String, Header, description = "Caller user id"),
        ("x-api-token" = String, Header, description = "Caller token"),
    ),
    request_body = GetEventDetailsRequest,
    responses (
        (status = 200, description = "Normalized procedure row, status code taken from its `http_code`"),
        (status = 400, description = "Missing auth headers or invalid `event_id`"),
        (status = 500, description = "Database failure or no row returned"),
    ),
    tag= "events"
)]
#[instrument(skip_all)]
pub async fn get_event_details(
    db: Extension<Database>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let auth = AuthContext::from_headers(&headers)?;

    // Checked by hand: any problem with `event_id` is a plain bad request,
    // without per-field details.
    let event_id = body
        .ok()
        .and_then(|body| positive_event_id(&body))
        .ok_or_else(|| ApiError::BadRequest(MISSING_HEADERS_MESSAGE.to_string()))?;

    debug!(event_id, "fetching event");

    let row = procedures::get_event(&**db, event_id, &auth).await?;

    respond_with_row_status(row)
}

#[utoipa::path(
    post,
    path= "/event/create/",
    params(
        ("x-api-user-id" = String, Header, description = "Caller user id"),
        ("x-api-token" = String, Header, description = "Caller token"),
    ),
    request_body = CreateEventRequest,
    responses (
        (status = 200, description = "Normalized procedure row, its `http_code` is only reported in the body"),
        (status = 400, description = "Missing auth headers"),
        (status = 422, description = "Body failed validation"),
        (status = 500, description = "Database failure or no row returned"),
    ),
    tag= "events"
)]
#[instrument(skip_all)]
pub async fn create_event(
    db: Extension<Database>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let auth = AuthContext::from_headers(&headers)?;
    let body = body.map_err(unreadable_body)?;
    let request: CreateEventRequest = validated(&body, EVENT_RULES)?;

    let row = procedures::create_event(&**db, &request.event, &auth).await?;

    respond_ok(row)
}

#[utoipa::path(
    post,
    path= "/event/update/",
    params(
        ("x-api-user-id" = String, Header, description = "Caller user id"),
        ("x-api-token" = String, Header, description = "Caller token"),
    ),
    request_body = UpdateEventRequest,
    responses (
        (status = 200, description = "Normalized procedure row, its `http_code` is only reported in the body"),
        (status = 400, description = "Missing auth headers"),
        (status = 422, description = "Body failed validation"),
        (status = 500, description = "Database failure or no row returned"),
    ),
    tag= "events"
)]
#[instrument(skip_all)]
pub async fn update_event(
    db: Extension<Database>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let auth = AuthContext::from_headers(&headers)?;
    let body = body.map_err(unreadable_body)?;
    let request: UpdateEventRequest =
        validated(&body, iter::once(&EVENT_ID_RULE).chain(EVENT_RULES))?;

    let row = procedures::update_event(&**db, &request, &auth).await?;

    respond_ok(row)
}

fn positive_event_id(body: &[u8]) -> Option<i64> {
    let body = serde_json::from_slice::<Value>(body).ok()?;

    as_integer(body.get("event_id")?).filter(|id| *id > 0)
}

// list/get forward the procedure's own status code
fn respond_with_row_status(row: ProcedureRow) -> Result<Response, ApiError> {
    let status = http_status(&row)?;
    let body = normalize(row)?;

    Ok((status, Json(Value::Object(body))).into_response())
}

// create/update always answer 200, the procedure's code stays in the body
fn respond_ok(row: ProcedureRow) -> Result<Response, ApiError> {
    let body = normalize(row)?;

    Ok((StatusCode::OK, Json(Value::Object(body))).into_response())
}
