use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Question index {index} is outside the quiz (1..={total})")]
    InvalidIndex { index: usize, total: usize },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::BadRequest(_) => "bad_request",
            Error::NotFound(_) => "not_found",
            Error::Provider(_) => "provider_error",
            Error::MalformedResponse(_) => "malformed_response",
            Error::UnsupportedFileType(_) => "unsupported_file_type",
            Error::InvalidIndex { .. } => "invalid_index",
            Error::Validation(_) => "validation_error",
            Error::Multipart(_) => "bad_request",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::InvalidIndex { .. } => StatusCode::BAD_REQUEST,
            Error::Validation(_) | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Provider(_) | Error::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            Error::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Provider(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_and_parse_failures_are_gateway_errors() {
        assert_eq!(
            Error::Provider("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::MalformedResponse("not json".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn invalid_index_message_names_the_range() {
        let err = Error::InvalidIndex { index: 7, total: 5 };
        assert_eq!(err.to_string(), "Question index 7 is outside the quiz (1..=5)");
        assert_eq!(err.code(), "invalid_index");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unsupported_upload_maps_to_415() {
        let err = Error::UnsupportedFileType("image/png".into());
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
