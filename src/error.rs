use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything a request can fail with.
///
/// Storage errors are not classified further: connectivity loss, constraint
/// violations and values PostgreSQL refuses to coerce all become
/// `StorageFailure` and reach the client as a 500 carrying the database's
/// own message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    StorageFailure(String),

    #[error("{0}")]
    MalformedBody(String),
}

impl ApiError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageFailure(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::StorageFailure(message) => {
                tracing::error!("Storage failure: {}", message);
            }
            ApiError::MalformedBody(message) => {
                tracing::debug!("Rejected request body: {}", message);
            }
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

// PostgreSQL error mapping
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db_err) => {
                tracing::error!(
                    "PostgreSQL error: {} (code: {})",
                    db_err.message(),
                    db_err.code().code()
                );
                ApiError::StorageFailure(db_err.message().to_string())
            }
            None => {
                tracing::error!("PostgreSQL client error: {}", err);
                ApiError::StorageFailure(err.to_string())
            }
        }
    }
}

// Connection pool error mapping
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Backend(pg_err) => ApiError::from(pg_err),
            deadpool_postgres::PoolError::Timeout(_) => {
                tracing::warn!("Database connection pool timeout: {}", err);
                ApiError::StorageFailure(err.to_string())
            }
            deadpool_postgres::PoolError::Closed => {
                tracing::error!("Database connection pool is closed");
                ApiError::StorageFailure(err.to_string())
            }
            _ => {
                tracing::error!("Database connection pool error: {}", err);
                ApiError::StorageFailure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    }

    #[tokio::test]
    async fn test_storage_failure_response_carries_raw_message() {
        let error = ApiError::storage("relation \"mood_logs\" does not exist");
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "error": "relation \"mood_logs\" does not exist" })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_response() {
        let error = ApiError::MalformedBody("Failed to parse the request body as JSON".into());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to parse the request body as JSON");
    }

    #[test]
    fn test_closed_pool_is_storage_failure() {
        let error = ApiError::from(deadpool_postgres::PoolError::Closed);
        assert!(matches!(error, ApiError::StorageFailure(_)));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
