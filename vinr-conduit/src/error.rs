/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConduitError {
    #[error("invalid identity token: {0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("platform api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("invalid webhook signature")]
    InvalidSignature,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Env(#[from] std::env::VarError),
    #[error("{0}")]
    Custom(String),
}

impl ConduitError {
    pub fn new(msg: &str) -> ConduitError {
        ConduitError::Custom(msg.to_string())
    }
}
