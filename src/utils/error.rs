use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Classifier inference failed: {0}")]
    Inference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0} bytes, max allowed: {1} bytes")]
    FileTooLarge(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Counter store error: {0}")]
    Store(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServiceError::Base64(_) => StatusCode::BAD_REQUEST,
            ServiceError::Json(_) => StatusCode::BAD_REQUEST,
            ServiceError::ImageDecode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Store(_) | ServiceError::Http(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            ServiceError::Inference(_) => "INFERENCE_ERROR",
            ServiceError::InvalidInput(_) => "INVALID_INPUT",
            ServiceError::FileTooLarge(_, _) => "FILE_TOO_LARGE",
            ServiceError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ServiceError::Store(_) => "STORE_ERROR",
            ServiceError::Credentials(_) => "CREDENTIAL_ERROR",
            ServiceError::Config(_) => "CONFIG_ERROR",
            ServiceError::Io(_) => "IO_ERROR",
            ServiceError::Json(_) => "JSON_ERROR",
            ServiceError::Base64(_) => "BASE64_DECODE_ERROR",
            ServiceError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            ServiceError::Ort(_) => "ORT_ERROR",
            ServiceError::Http(_) => "HTTP_ERROR",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        tracing::error!("Request failed: {} ({})", self, status);

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The UI reads `error.message` from failed responses, for classify
    // uploads and stats loads alike.
    #[tokio::test]
    async fn error_response_carries_code_and_message() {
        let response = ServiceError::Store("firestore unreachable".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], "STORE_ERROR");
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("firestore unreachable"));
    }
}
