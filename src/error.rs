use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Weather API key not configured")]
    MissingApiKey,
    #[error("City not found")]
    CityNotFound,
    #[error("Either coordinates (lat, lon) or city name is required")]
    MissingLocation,
    #[error("{0}")]
    InvalidCoordinates(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Invalid response from Weather API")]
    InvalidResponse,
    #[error("{0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("{0}")]
    JsonParsing(#[from] serde_json::Error),
}

/// Body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self {
                error: "Unknown error".to_string(),
            }
        } else {
            Self { error: message }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
