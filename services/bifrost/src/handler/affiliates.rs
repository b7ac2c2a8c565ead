/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use super::{get_conn, require_admin, require_experience};
use crate::error::{reject, Error};
use crate::WebResult;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use vinr_conduit::PlatformClient;
use vinr_ledger::{AffiliateStatus, PgPool};
use vinr_portal::affiliates::{apply, approve, list_affiliates, reject as reject_affiliate};
use vinr_portal::affiliates::ApprovalParams;
use vinr_portal::earnings::my_earnings;
use vinr_portal::notifications::Notifier;
use vinr_portal::PortalError;
use warp::Reply;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInput {
    pub program_id: i64,
    pub experience_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApproveInput {
    pub company_id: String,
    pub experience_id: Option<String>,
    pub custom_rate: Option<f64>,
    pub tier: Option<String>,
    pub rate_expiry: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RejectInput {
    pub company_id: String,
    pub experience_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AffiliatesQuery {
    pub program_id: i64,
    pub company_id: String,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MyEarningsQuery {
    pub program_id: i64,
    pub experience_id: String,
}

pub async fn hndl_apply(
    user_id: String,
    input: ApplyInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_experience(&platform, &input.experience_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    match apply(&mut conn, input.program_id, &user_id) {
        Ok(affiliate) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "affiliate": affiliate })),
            warp::http::StatusCode::CREATED,
        )),
        // The duplicate-application guard hands back the original record
        // together with the error.
        Err(PortalError::AlreadyApplied(existing)) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "error": "Already applied to this program",
                "affiliate": existing,
            })),
            warp::http::StatusCode::BAD_REQUEST,
        )),
        Err(e) => Err(reject(e)),
    }
}

pub async fn hndl_approve_affiliate(
    user_id: String,
    affiliate_id: i64,
    input: ApproveInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
    notifier: Notifier,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let params = ApprovalParams {
        custom_rate: input.custom_rate,
        tier: input.tier,
        rate_expiry: input.rate_expiry,
    };
    let mut conn = get_conn(&pool)?;
    let affiliate =
        approve(&mut conn, affiliate_id, &input.company_id, &params).map_err(reject)?;

    if let Some(experience_id) = &input.experience_id {
        notifier.notify_application_status(experience_id, &affiliate.user_id, true);
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "affiliate": affiliate })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_reject_affiliate(
    user_id: String,
    affiliate_id: i64,
    input: RejectInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
    notifier: Notifier,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let affiliate =
        reject_affiliate(&mut conn, affiliate_id, &input.company_id).map_err(reject)?;

    if let Some(experience_id) = &input.experience_id {
        notifier.notify_application_status(experience_id, &affiliate.user_id, false);
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "affiliate": affiliate })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_list_affiliates(
    user_id: String,
    query: AffiliatesQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let status = match &query.status {
        Some(s) => Some(
            AffiliateStatus::from_str(s)
                .map_err(|e| warp::reject::custom(Error::Invalid(e.to_string())))?,
        ),
        None => None,
    };
    let mut conn = get_conn(&pool)?;
    let affiliates =
        list_affiliates(&mut conn, query.program_id, &query.company_id, status).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "affiliates": affiliates })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_my_earnings(
    user_id: String,
    query: MyEarningsQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_experience(&platform, &query.experience_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let earnings = my_earnings(&mut conn, query.program_id, &user_id).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&earnings),
        warp::http::StatusCode::OK,
    ))
}
