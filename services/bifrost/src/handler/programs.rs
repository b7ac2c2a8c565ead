/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use super::{get_conn, require_admin};
use crate::error::reject;
use crate::WebResult;

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use vinr_conduit::PlatformClient;
use vinr_ledger::{PayoutFrequency, PgPool, ProgramStatus};
use vinr_portal::programs::{get_program_overview, upsert_program, ProgramParams};
use warp::Reply;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProgramQuery {
    pub company_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInput {
    pub company_id: String,
    pub default_rate: f64,
    pub payout_frequency: PayoutFrequency,
    pub cookie_window: Option<i32>,
    pub status: Option<ProgramStatus>,
}

pub async fn hndl_get_program(
    user_id: String,
    query: ProgramQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let program = get_program_overview(&mut conn, &query.company_id).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "program": program })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_upsert_program(
    user_id: String,
    input: ProgramInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let params = ProgramParams {
        company_id: input.company_id,
        default_rate: input.default_rate,
        payout_frequency: input.payout_frequency,
        cookie_window: input.cookie_window,
        status: input.status,
    };
    let mut conn = get_conn(&pool)?;
    let program = upsert_program(&mut conn, &params).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "program": program })),
        warp::http::StatusCode::OK,
    ))
}
