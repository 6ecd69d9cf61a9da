use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed person id")]
    MalformedPersonId,

    #[error("Person not found")]
    PersonNotFound,

    #[error("Counter document missing")]
    CounterMissing,

    /// The person update already went through when the counter increment
    /// failed. There is no rollback, so the two documents are out of sync.
    #[error("Candle recorded but counter update failed")]
    CounterOutOfSync,

    #[error("Internal Server Error")]
    Database(#[from] mongodb::error::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPersonId => StatusCode::BAD_REQUEST,
            AppError::PersonNotFound | AppError::CounterMissing => StatusCode::NOT_FOUND,
            AppError::CounterOutOfSync | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Driver errors stay in the logs, never in the response body.
        if let AppError::Database(e) = &self {
            error!("Database fault: {e}");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_person_maps_to_not_found() {
        let response = AppError::PersonNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body["message"], "Person not found");
    }

    #[tokio::test]
    async fn missing_counter_maps_to_not_found() {
        let response = AppError::CounterMissing.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_maps_to_bad_request() {
        let response = AppError::MalformedPersonId.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn database_fault_hides_detail() {
        let err = AppError::Database(mongodb::error::Error::custom("connection torn down"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn counter_out_of_sync_names_the_partial_write() {
        let response = AppError::CounterOutOfSync.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["message"], "Candle recorded but counter update failed");
    }
}
