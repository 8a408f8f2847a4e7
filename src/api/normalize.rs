//! Turns a procedure row into the JSON body returned to the client.

use super::error::ApiError;
use crate::db::ProcedureRow;
use axum::http::StatusCode;
use serde_json::Value;

pub const STATUS_COLUMN: &str = "status";
pub const HTTP_CODE_COLUMN: &str = "http_code";
pub const DATA_COLUMN: &str = "data";
pub const SECURE_DATA_COLUMN: &str = "secure_data";
const SUCCESS_MARKER: &str = "S";

/// Normalize a procedure row:
///
/// - `status` becomes `true` only for the `'S'` marker,
/// - `secure_data` is removed,
/// - a non-empty `data` string is replaced by the JSON it encodes.
///
/// # Errors
/// Returns [`ApiError::Internal`] if the row has no `status` column or `data`
/// is not valid JSON.
pub fn normalize(mut row: ProcedureRow) -> Result<ProcedureRow, ApiError> {
    let status = row
        .get_mut(STATUS_COLUMN)
        .ok_or_else(|| ApiError::internal(format!("missing `{STATUS_COLUMN}` column")))?;
    *status = Value::Bool(status.as_str() == Some(SUCCESS_MARKER));

    row.shift_remove(SECURE_DATA_COLUMN);

    if let Some(data) = row.get_mut(DATA_COLUMN) {
        if let Some(raw) = data.as_str().filter(|raw| !raw.is_empty()) {
            *data = serde_json::from_str(raw).map_err(|err| {
                ApiError::internal(format!("malformed `{DATA_COLUMN}` payload: {err}"))
            })?;
        }
    }

    Ok(row)
}

/// Read the transport status the procedure asked for.
///
/// # Errors
/// Returns [`ApiError::Internal`] if `http_code` is missing or not a valid
/// HTTP status code.
pub fn http_status(row: &ProcedureRow) -> Result<StatusCode, ApiError> {
    row.get(HTTP_CODE_COLUMN)
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| ApiError::internal(format!("invalid `{HTTP_CODE_COLUMN}` column")))
}
