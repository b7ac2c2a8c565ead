/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use vinr_conduit::ConduitError;
use vinr_portal::PortalError;
use warp::{http::StatusCode, Rejection, Reply};

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Invalid(String),
    #[error("no auth header")]
    NoAuthHeaderError,
    #[error("invalid auth header")]
    InvalidAuthHeaderError,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl warp::reject::Reject for Error {}

impl From<PortalError> for Error {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Invalid(msg) => Error::Invalid(msg),
            PortalError::Unauthorized(msg) => Error::Unauthorized(msg),
            PortalError::Forbidden(msg) => Error::Forbidden(msg),
            PortalError::NotFound(msg) => Error::NotFound(msg),
            PortalError::AlreadyApplied(_) => Error::Invalid(err.to_string()),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl From<ConduitError> for Error {
    fn from(err: ConduitError) -> Self {
        match err {
            ConduitError::Unauthorized(msg) => Error::Unauthorized(msg),
            ConduitError::Forbidden(msg) => Error::Forbidden(msg),
            other => Error::Internal(other.to_string()),
        }
    }
}

/// Shorthand for bubbling a portal failure out of a handler.
pub fn reject(err: PortalError) -> Rejection {
    warp::reject::custom(Error::from(err))
}

pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Invalid(_) => StatusCode::BAD_REQUEST,
        Error::NoAuthHeaderError
        | Error::InvalidAuthHeaderError
        | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::Forbidden(_) => StatusCode::FORBIDDEN,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    message: String,
    status: String,
}

pub async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<Error>() {
        let code = status_for(e);
        if code == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("internal error: {:?}", e.to_string());
            (code, "Internal Server Error".to_string())
        } else {
            (code, e.to_string())
        }
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "Invalid query parameters".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        log::error!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    let json = warp::reply::json(&ErrorResponse {
        status: code.to_string(),
        message,
    });

    Ok(warp::reply::with_status(json, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinr_ledger::LedgerError;

    #[test]
    fn portal_kinds_map_to_status_codes() {
        let cases = vec![
            (PortalError::invalid("bad"), StatusCode::BAD_REQUEST),
            (
                PortalError::Unauthorized("who".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                PortalError::Forbidden("nope".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (PortalError::not_found("gone"), StatusCode::NOT_FOUND),
            (
                PortalError::Platform("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PortalError::Ledger(LedgerError::new("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (portal_err, expected) in cases {
            assert_eq!(status_for(&Error::from(portal_err)), expected);
        }
    }

    #[test]
    fn forbidden_is_decided_by_variant_not_message() {
        // A message that happens to contain "Forbidden" still classifies
        // by its variant.
        let err = Error::from(PortalError::invalid("Forbidden word in a message"));
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_header_errors_are_unauthorized() {
        assert_eq!(
            status_for(&Error::NoAuthHeaderError),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&Error::InvalidAuthHeaderError),
            StatusCode::UNAUTHORIZED
        );
    }
}
