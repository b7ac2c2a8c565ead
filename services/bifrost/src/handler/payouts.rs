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
use vinr_ledger::PgPool;
use vinr_portal::notifications::Notifier;
use vinr_portal::settlement::{list_batches, process_payout_batch, SettlementRequest};
use warp::Reply;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayoutInput {
    pub company_id: String,
    pub program_id: i64,
    pub experience_id: Option<String>,
    pub affiliate_ids: Vec<i64>,
    pub currency: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayoutsQuery {
    pub program_id: i64,
    pub company_id: String,
}

/// Run one settlement batch. Per-affiliate failures come back inside
/// the results list, only authorization and precondition problems fail
/// the whole request.
pub async fn hndl_process_payouts(
    user_id: String,
    input: PayoutInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
    notifier: Notifier,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let request = SettlementRequest {
        company_id: input.company_id,
        program_id: input.program_id,
        experience_id: input.experience_id,
        affiliate_ids: input.affiliate_ids,
        currency: input.currency,
    };
    let mut conn = get_conn(&pool)?;
    let outcome = process_payout_batch(&mut conn, &platform, &notifier, &request)
        .await
        .map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&outcome),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_list_payouts(
    user_id: String,
    query: PayoutsQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let batches = list_batches(&mut conn, query.program_id, &query.company_id).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "batches": batches })),
        warp::http::StatusCode::OK,
    ))
}
