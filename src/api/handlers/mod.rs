//! Route handlers.
//!
//! Every event handler follows the same path: auth headers, body checks, one
//! procedure call, then normalization of the returned row. Failures are
//! returned as [`crate::api::ApiError`] and rendered by its `IntoResponse`.

pub mod events;

pub use self::db_test::db_test;
pub use self::events::{create_event, get_event_details, list_events, update_event};
