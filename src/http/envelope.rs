//! The uniform `{success, message, data}` response wrapper and the mapping of
//! crate errors onto it.
//!
//! Validation failures and unknown ids are answered with HTTP 200 and
//! `success: false`; clients must look at `success`. Unreadable requests keep
//! the status of their rejection (400, 413, ...) and every other failure is a
//! 500 with details kept in the logs.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, warn};

pub const NOT_FOUND_MESSAGE: &str = "Data not found.";
pub const VALIDATION_MESSAGE: &str = "The given data was invalid.";
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";
pub const SERVER_ERROR_MESSAGE: &str = "Server Error.";

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

/// Successful envelope around `data`
pub fn success<T: Serialize>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: message.to_string(),
        data,
    })
}

/// Failed envelope with the given status; `data` is `[]` unless provided
pub fn failure(status: StatusCode, message: &str, data: Option<Value>) -> Response {
    let body = Envelope {
        success: false,
        message: message.to_string(),
        data: data.unwrap_or_else(|| json!([])),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                let data = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
                failure(StatusCode::OK, VALIDATION_MESSAGE, Some(data))
            }
            Self::ProductNotFound { id } => {
                warn!("Product {} not found", id);
                failure(StatusCode::OK, NOT_FOUND_MESSAGE, None)
            }
            Self::InvalidRequest { status, message } => {
                warn!(status, "Rejected request: {}", message);
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
                failure(status, &message, None)
            }
            other => {
                error!(application_error = %other, "Request failed");
                failure(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::validation::ValidationErrors;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_soft_failure() {
        let response = Error::ProductNotFound { id: 3 }.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "message": "Data not found.", "data": []})
        );
    }

    #[tokio::test]
    async fn test_validation_carries_field_errors() {
        let mut errors = ValidationErrors::default();
        errors.add("name", "The name field is required.");

        let response = Error::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!(VALIDATION_MESSAGE));
        assert_eq!(body["data"]["name"][0], json!("The name field is required."));
    }

    #[tokio::test]
    async fn test_storage_failure_is_server_error_without_details() {
        let response = Error::StorageWrite {
            filename: "mug.png".to_string(),
            source: std::io::Error::other("disk full"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!(SERVER_ERROR_MESSAGE));
        assert!(!body.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_invalid_request_keeps_its_status() {
        let response = Error::InvalidRequest {
            status: 413,
            message: "Request payload is too large".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "message": "Request payload is too large", "data": []})
        );

        let response = Error::InvalidRequest {
            status: 42,
            message: "nonsense".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = success("Product List", vec![1, 2]).into_response();
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "message": "Product List", "data": [1, 2]})
        );
    }
}
