/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
#![allow(clippy::extra_unused_lifetimes)]

#[macro_use]
extern crate diesel;
pub mod catalog;
pub mod earnings;
pub mod error;
pub mod schema;

extern crate dotenv;
extern crate pretty_env_logger;

pub use catalog::*;
pub use earnings::*;
pub use error::*;

pub use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use std::env;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub fn establish_connection() -> Result<PgConnection, LedgerError> {
    Ok(PgConnection::establish(&env::var("AFFILIATE_DB_URL")?)?)
}

/// Connection pool for the affiliate database, built once at process start
/// and handed down to request handlers.
pub fn create_connection_pool() -> Result<PgPool, LedgerError> {
    let manager = ConnectionManager::<PgConnection>::new(env::var("AFFILIATE_DB_URL")?);
    Ok(Pool::builder().build(manager)?)
}
