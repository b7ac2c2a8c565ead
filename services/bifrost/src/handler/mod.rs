/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
pub mod affiliates;
pub mod creatives;
pub mod earnings;
pub mod offers;
pub mod payouts;
pub mod programs;
pub mod webhook;

use crate::error::Error;
use crate::WebResult;

use vinr_conduit::PlatformClient;
use vinr_ledger::{PgPool, PgPooledConnection};

pub fn get_conn(pool: &PgPool) -> WebResult<PgPooledConnection> {
    pool.get()
        .map_err(|e| warp::reject::custom(Error::Internal(e.to_string())))
}

pub async fn require_admin(
    platform: &PlatformClient,
    company_id: &str,
    user_id: &str,
) -> WebResult<()> {
    platform
        .require_company_admin(company_id, user_id)
        .await
        .map_err(|e| warp::reject::custom(Error::from(e)))
}

pub async fn require_experience(
    platform: &PlatformClient,
    experience_id: &str,
    user_id: &str,
) -> WebResult<()> {
    platform
        .require_experience_access(experience_id, user_id)
        .await
        .map_err(|e| warp::reject::custom(Error::from(e)))
}
