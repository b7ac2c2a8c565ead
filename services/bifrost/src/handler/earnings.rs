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
use vinr_ledger::{EventType, PgPool};
use vinr_portal::earnings::{program_earnings, track_event, TrackEventParams};
use warp::Reply;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EarningsQuery {
    pub program_id: i64,
    pub company_id: String,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub company_id: String,
    pub affiliate_id: i64,
    #[serde(rename = "type")]
    pub etype: EventType,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub source_ref: Option<String>,
}

pub async fn hndl_program_earnings(
    user_id: String,
    query: EarningsQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let earnings = program_earnings(
        &mut conn,
        query.program_id,
        &query.company_id,
        query.status.as_deref(),
    )
    .map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&earnings),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_track_event(
    user_id: String,
    input: EventInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let params = TrackEventParams {
        company_id: input.company_id,
        affiliate_id: input.affiliate_id,
        etype: input.etype,
        amount: input.amount,
        currency: input.currency,
        source_ref: input.source_ref,
    };
    let mut conn = get_conn(&pool)?;
    let event = track_event(&mut conn, &params).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "event": event })),
        warp::http::StatusCode::CREATED,
    ))
}
