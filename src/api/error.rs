use axum::{
    extract::rejection::QueryRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {status}")]
    Upstream { status: StatusCode, details: String },
    #[error("Failed to fetch data")]
    Unavailable(String),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let upstream_status = err
            .downcast_ref::<reqwest::Error>()
            .and_then(|e| e.status())
            .and_then(|s| StatusCode::from_u16(s.as_u16()).ok());

        match upstream_status {
            Some(status) => ApiError::Upstream {
                status,
                details: format!("{:#}", err),
            },
            None => ApiError::Unavailable(format!("{:#}", err)),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Upstream { status, .. } => *status,
            ApiError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let details = match &self {
            ApiError::Upstream { details, .. } | ApiError::Unavailable(details) => Some(details.clone()),
            ApiError::BadRequest(_) => None,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            details,
        });

        (status, body).into_response()
    }
}
