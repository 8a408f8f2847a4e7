//! One function per stored procedure, each binding its arguments in the fixed
//! positional order the procedure expects.

use super::{
    auth::AuthContext,
    error::ApiError,
    models::{EventFields, UpdateEventRequest},
};
use crate::db::{EventDatabase, Param, ProcedureRow};
use tracing::instrument;

pub const LIST_EVENTS: &str = "xp_per_all_events_get";
pub const GET_EVENT_BY_ID: &str = "xp_per_all_events_get_by_id";
pub const CREATE_EVENT: &str = "xp_per_all_events_create";
pub const UPDATE_EVENT: &str = "xp_per_all_events_update";

/// Every procedure takes `(auth_device_id, i18n)` last.
pub const LOCALE: &str = "en";

const NO_EVENTS: &str = "No events found in the database.";
const NO_EVENT_FOR_ID: &str = "No event found for the given ID.";
const NO_DATA: &str = "No data returned.";

fn auth_params(auth: &AuthContext) -> [Param; 4] {
    [
        Param::from(auth.user_id.as_str()),
        Param::from(auth.token.as_str()),
        Param::Null,
        Param::from(LOCALE),
    ]
}

fn event_params(event: &EventFields) -> [Param; 8] {
    [
        Param::from(event.event_name_ar.as_str()),
        Param::from(event.event_name_en.as_deref()),
        Param::from(event.event_desc_ar.as_str()),
        Param::from(event.event_desc_en.as_deref()),
        Param::from(event.event_datetime.as_str()),
        Param::from(event.event_image),
        Param::from(event.event_sort_rank),
        Param::from(event.status),
    ]
}

#[must_use]
pub fn list_params(auth: &AuthContext) -> Vec<Param> {
    auth_params(auth).to_vec()
}

#[must_use]
pub fn get_by_id_params(event_id: i64, auth: &AuthContext) -> Vec<Param> {
    std::iter::once(Param::from(event_id))
        .chain(auth_params(auth))
        .collect()
}

#[must_use]
pub fn create_params(event: &EventFields, auth: &AuthContext) -> Vec<Param> {
    event_params(event)
        .into_iter()
        .chain(auth_params(auth))
        .collect()
}

#[must_use]
pub fn update_params(request: &UpdateEventRequest, auth: &AuthContext) -> Vec<Param> {
    std::iter::once(Param::from(request.event_id))
        .chain(event_params(&request.event))
        .chain(auth_params(auth))
        .collect()
}

async fn call_one(
    db: &dyn EventDatabase,
    procedure: &str,
    params: &[Param],
    missing: &str,
) -> Result<ProcedureRow, ApiError> {
    db.call(procedure, params)
        .await?
        .ok_or_else(|| ApiError::internal(missing))
}

/// # Errors
/// Returns [`ApiError::Internal`] on driver failure or when no row comes back.
#[instrument(skip_all)]
pub async fn list_events(
    db: &dyn EventDatabase,
    auth: &AuthContext,
) -> Result<ProcedureRow, ApiError> {
    call_one(db, LIST_EVENTS, &list_params(auth), NO_EVENTS).await
}

/// # Errors
/// Returns [`ApiError::Internal`] on driver failure or when no row comes back.
#[instrument(skip(db, auth))]
pub async fn get_event(
    db: &dyn EventDatabase,
    event_id: i64,
    auth: &AuthContext,
) -> Result<ProcedureRow, ApiError> {
    call_one(
        db,
        GET_EVENT_BY_ID,
        &get_by_id_params(event_id, auth),
        NO_EVENT_FOR_ID,
    )
    .await
}

/// # Errors
/// Returns [`ApiError::Internal`] on driver failure or when no row comes back.
#[instrument(skip_all)]
pub async fn create_event(
    db: &dyn EventDatabase,
    event: &EventFields,
    auth: &AuthContext,
) -> Result<ProcedureRow, ApiError> {
    call_one(db, CREATE_EVENT, &create_params(event, auth), NO_DATA).await
}

/// # Errors
/// Returns [`ApiError::Internal`] on driver failure or when no row comes back.
#[instrument(skip_all, fields(event_id = request.event_id))]
pub async fn update_event(
    db: &dyn EventDatabase,
    request: &UpdateEventRequest,
    auth: &AuthContext,
) -> Result<ProcedureRow, ApiError> {
    call_one(db, UPDATE_EVENT, &update_params(request, auth), NO_DATA).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthContext {
        AuthContext {
            user_id: "7".to_string(),
            token: "tok".to_string(),
        }
    }

    fn event() -> EventFields {
        EventFields {
            event_name_ar: "حفل".to_string(),
            event_desc_ar: "وصف".to_string(),
            event_name_en: Some("Gala".to_string()),
            event_desc_en: None,
            status: 1,
            event_datetime: "2024-05-01 18:00".to_string(),
            event_image: 3,
            event_sort_rank: 2,
        }
    }

    fn text(value: &str) -> Param {
        Param::Text(value.to_string())
    }

    #[test]
    fn list_binds_auth_then_constants() {
        assert_eq!(
            list_params(&auth()),
            vec![text("7"), text("tok"), Param::Null, text("en")]
        );
    }

    #[test]
    fn get_by_id_leads_with_event_id() {
        assert_eq!(
            get_by_id_params(12, &auth()),
            vec![
                Param::Int(12),
                text("7"),
                text("tok"),
                Param::Null,
                text("en")
            ]
        );
    }

    #[test]
    fn create_binds_in_procedure_order() {
        assert_eq!(
            create_params(&event(), &auth()),
            vec![
                text("حفل"),
                text("Gala"),
                text("وصف"),
                Param::Null,
                text("2024-05-01 18:00"),
                Param::Int(3),
                Param::Int(2),
                Param::Int(1),
                text("7"),
                text("tok"),
                Param::Null,
                text("en"),
            ]
        );
    }

    #[test]
    fn update_prefixes_event_id() {
        let request = UpdateEventRequest {
            event_id: 99,
            event: event(),
        };
        let params = update_params(&request, &auth());
        assert_eq!(params.len(), 13);
        assert_eq!(params.first(), Some(&Param::Int(99)));
        assert_eq!(params[1..], create_params(&event(), &auth())[..]);
    }
}
