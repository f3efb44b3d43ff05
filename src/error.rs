use std::{fmt, sync::Arc};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub(crate) enum Error {
    Validation(String),
    Conflict(&'static str),
    /// The record store rejected a write. Visitors only see `message`.
    Upstream {
        message: &'static str,
        report: eyre::Report,
    },
    Internal(eyre::Report),
}

impl Error {
    pub(crate) fn upstream(message: &'static str, report: eyre::Report) -> Self {
        Self::Upstream { message, report }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Validation(error) => write!(f, "{}", error),
            Self::Conflict(message) => write!(f, "{}", message),
            Self::Upstream { report, .. } => write!(f, "{}", report),
            Self::Internal(error) => write!(f, "{}", error),
        }
    }
}

impl From<eyre::Report> for Error {
    fn from(error: eyre::Report) -> Self {
        Self::Internal(error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(error) => (StatusCode::UNPROCESSABLE_ENTITY, error).into_response(),
            Self::Conflict(message) => (StatusCode::CONFLICT, message).into_response(),
            Self::Upstream { message, report } => {
                let mut response = (StatusCode::BAD_GATEWAY, message).into_response();
                response.extensions_mut().insert(Arc::new(report));
                response
            }
            Self::Internal(error) => {
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                response.extensions_mut().insert(Arc::new(error));
                response
            }
        }
    }
}
