use reqwest::StatusCode;
use thiserror::Error;

/// Longest slice of an error response body kept for diagnostics.
const MAX_ERROR_BODY: usize = 500;

#[derive(Error, Debug)]
pub enum MealieError {
    #[error("Invalid Mealie URL: {0}")]
    InvalidUrl(String),

    #[error("Mealie API token is required but not set")]
    MissingToken,

    #[error("Mealie API token contains characters not allowed in a header")]
    InvalidToken,

    #[error("HTTP error: 401 - Authentication failed. Please check your API token.")]
    Unauthorized,

    #[error("HTTP error: 403 - Forbidden. API token may not have permission to access meal plans.")]
    Forbidden,

    #[error(
        "Could not find meal plan endpoint (tried {}). Check Mealie version and API documentation.",
        .0.join(", ")
    )]
    EndpointNotFound(Vec<String>),

    #[error("HTTP error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON from Mealie: {0}")]
    Json(#[from] serde_json::Error),
}

impl MealieError {
    /// Map a non-success response to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => MealieError::Unauthorized,
            StatusCode::FORBIDDEN => MealieError::Forbidden,
            _ => MealieError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            },
        }
    }

    /// Network and server-side failures are worth retrying, auth and setup errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MealieError::Http(_) => true,
            MealieError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
