// Handlers module
// HTTP handlers for the REST API

pub mod moods;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body.
///
/// A request without a JSON content type, or with an empty body, reads as
/// `T::default()` so its fields go to storage as NULL. Only a JSON body that
/// fails to parse is rejected.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::MalformedBody(format!("Failed to parse the request body as JSON: {}", e)))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || essence.to_ascii_lowercase().ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(has_json_content_type(&headers_with("application/json")));
        assert!(has_json_content_type(&headers_with("Application/JSON; charset=utf-8")));
        assert!(has_json_content_type(&headers_with("application/merge-patch+json")));

        assert!(!has_json_content_type(&headers_with("text/plain")));
        assert!(!has_json_content_type(&headers_with("application/x-www-form-urlencoded")));
        assert!(!has_json_content_type(&HeaderMap::new()));
    }
}
