use crate::drive::DriveError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data (missing multipart field, empty id)
    #[error("{message}")]
    BadRequest { message: String },

    /// Remote storage failure; the backend message passes through verbatim
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Drive(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            // Callers act on the remote service's own message (quota, auth,
            // not-found), so it is not rewritten here
            Error::Drive(err) => err.to_string(),
        }
    }

    /// Log full error details at a level matching severity
    fn log(&self) {
        match self {
            Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Drive(_) => {
                tracing::error!("Drive error: {:#}", self);
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Error wrapper for the delete endpoint.
///
/// Delete responses carry an explicit `success` flag, so failures mirror that
/// shape instead of the bare `{"error": ...}` body used elsewhere.
#[derive(ThisError, Debug)]
#[error(transparent)]
pub struct DeleteError(#[from] Error);

impl From<DriveError> for DeleteError {
    fn from(err: DriveError) -> Self {
        DeleteError(Error::Drive(err))
    }
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        self.0.log();
        let status = self.0.status_code();
        (status, Json(json!({ "success": false, "error": self.0.user_message() }))).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T, E = Error> = std::result::Result<T, E>;
