use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::crypto::TokenError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Store errors
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid userId")]
    InvalidMemberReference(String),
    // Session errors
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing token")]
    MissingToken(String),
    #[error("Failed to sign token")]
    TokenSigning(#[source] TokenError),
    #[error("Failed to verify token")]
    TokenVerification(#[source] TokenError),
}

pub type RestResult<T> = std::result::Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal Server Error")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::ParsingError(msg) => Self::Validation(msg),
            Error::NotFound(_) => Self::NotFound(e.to_string()),
            Error::InvalidMemberReference(_) => Self::Validation(e.to_string()),
            Error::InvalidCredentials => Self::Unauthorized(e.to_string()),
            Error::MissingToken(_) => Self::Unauthorized(e.to_string()),
            // The caller only learns that the token was rejected, never why
            Error::TokenVerification(_) => Self::Unauthorized("Invalid token".into()),
            Error::TokenSigning(source) => Self::InternalError(source.to_string()),
        }
    }
}

/// Body of every error response
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::InternalError(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal Server Error".to_string()
            }
            Self::Other(error) => {
                tracing::error!(error.cause_chain = ?error, "Unhandled error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { message: &message })
    }
}
