use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// HTTP header name carrying the session id
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Extension type identifying which session a request belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Starts a brand-new session
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the session header, distinguishing "absent" from "malformed".
    ///
    /// `Ok(None)` means no header was sent and a fresh session may start. A
    /// malformed value cannot name any session; honoring it would silently
    /// fork a new session and strand the client's state, so it is rejected as
    /// invalid input instead.
    pub fn from_header(value: Option<&HeaderValue>) -> AppResult<Option<Self>> {
        let Some(value) = value else {
            return Ok(None);
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .map(|uuid| Some(Self(uuid)))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("{} must be a UUID", SESSION_ID_HEADER))
            })
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware that resolves the session a request belongs to.
///
/// A valid `x-session-id` header continues that session; no header starts a
/// fresh one; a malformed header is a 400. The resolved id is stored in the
/// request extensions and echoed on the response so the client can carry it
/// forward.
pub async fn session_id_middleware(mut request: Request, next: Next) -> Response {
    let session_id = match SessionId::from_header(request.headers().get(SESSION_ID_HEADER)) {
        Ok(Some(id)) => id,
        Ok(None) => SessionId::new(),
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    // UUID text is always a valid header value
    if let Ok(header_value) = HeaderValue::from_str(&session_id.to_string()) {
        response
            .headers_mut()
            .insert(SESSION_ID_HEADER, header_value);
    }

    response
}

/// Helper function to create a tracing span carrying the session id
pub fn make_span_with_session_id(request: &Request<Body>) -> tracing::Span {
    match request.extensions().get::<SessionId>() {
        Some(id) => tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            session_id = %id,
        ),
        None => tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            session_id = tracing::field::Empty,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_absent_starts_fresh_session() {
        let parsed = SessionId::from_header(None).unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_from_header_valid_uuid_continues_session() {
        let uuid = Uuid::new_v4();
        let value = HeaderValue::from_str(&uuid.to_string()).unwrap();
        let parsed = SessionId::from_header(Some(&value)).unwrap().unwrap();
        assert_eq!(parsed.0, uuid);
    }

    #[test]
    fn test_from_header_malformed_id_is_rejected() {
        let value = HeaderValue::from_static("not-a-uuid");
        let err = SessionId::from_header(Some(&value)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_from_header_non_ascii_value_is_rejected() {
        let value = HeaderValue::from_bytes(b"\xc3\xa9").unwrap();
        let err = SessionId::from_header(Some(&value)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
