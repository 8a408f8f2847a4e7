use super::error::ApiError;
use axum::http::HeaderMap;

pub const HEADER_USER_ID: &str = "x-api-user-id";
pub const HEADER_TOKEN: &str = "x-api-token";
pub const MISSING_HEADERS_MESSAGE: &str = "Request Forged. Missing required headers.";

/// Caller identity forwarded verbatim to the stored procedures, which do the
/// actual authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub token: String,
}

impl AuthContext {
    /// Require both auth headers to be present and non-empty.
    ///
    /// # Errors
    /// Returns [`ApiError::BadRequest`] with [`MISSING_HEADERS_MESSAGE`] otherwise.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        match (header(headers, HEADER_USER_ID), header(headers, HEADER_TOKEN)) {
            (Some(user_id), Some(token)) => Ok(Self {
                user_id: user_id.to_string(),
                token: token.to_string(),
            }),
            _ => Err(ApiError::BadRequest(MISSING_HEADERS_MESSAGE.to_string())),
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn both_headers_pass_through_unchanged() {
        let ctx = AuthContext::from_headers(&headers(&[
            (HEADER_USER_ID, "42"),
            (HEADER_TOKEN, "abc.def"),
        ]));
        assert_eq!(
            ctx.ok(),
            Some(AuthContext {
                user_id: "42".to_string(),
                token: "abc.def".to_string(),
            })
        );
    }

    #[test]
    fn missing_or_empty_header_is_rejected() {
        for pairs in [
            vec![],
            vec![(HEADER_USER_ID, "42")],
            vec![(HEADER_TOKEN, "abc")],
            vec![(HEADER_USER_ID, ""), (HEADER_TOKEN, "abc")],
            vec![(HEADER_USER_ID, "42"), (HEADER_TOKEN, "")],
        ] {
            match AuthContext::from_headers(&headers(&pairs)) {
                Err(ApiError::BadRequest(message)) => {
                    assert_eq!(message, MISSING_HEADERS_MESSAGE);
                }
                other => panic!("expected bad request for {pairs:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_ascii_header_counts_as_missing() {
        let mut map = headers(&[(HEADER_TOKEN, "abc")]);
        if let Ok(value) = HeaderValue::from_bytes(b"\xff\xfe") {
            map.insert(HEADER_USER_ID, value);
        }
        assert!(AuthContext::from_headers(&map).is_err());
    }
}
