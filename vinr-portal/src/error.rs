/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use thiserror::Error;
use vinr_conduit::ConduitError;
use vinr_ledger::{Affiliate, LedgerError};

/// Request-facing error taxonomy. The variant, not the message text,
/// decides how a failure is classified.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Already applied to this program")]
    AlreadyApplied(Box<Affiliate>),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Platform(String),
}

impl PortalError {
    pub fn invalid(msg: &str) -> PortalError {
        PortalError::Invalid(msg.to_string())
    }

    pub fn not_found(msg: &str) -> PortalError {
        PortalError::NotFound(msg.to_string())
    }
}

impl From<ConduitError> for PortalError {
    fn from(err: ConduitError) -> Self {
        match err {
            ConduitError::Unauthorized(msg) => PortalError::Unauthorized(msg),
            ConduitError::Forbidden(msg) => PortalError::Forbidden(msg),
            other => PortalError::Platform(other.to_string()),
        }
    }
}
