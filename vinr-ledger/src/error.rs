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
pub enum LedgerError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error(transparent)]
    Connection(#[from] diesel::ConnectionError),
    #[error(transparent)]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error(transparent)]
    Env(#[from] std::env::VarError),
    #[error("{0}")]
    Custom(String),
}

impl LedgerError {
    pub fn new(msg: &str) -> LedgerError {
        LedgerError::Custom(msg.to_string())
    }
}

impl From<std::string::String> for LedgerError {
    fn from(err: std::string::String) -> Self {
        LedgerError::Custom(err)
    }
}
