/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use super::{get_conn, require_admin};
use crate::error::{reject, Error};
use crate::WebResult;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use vinr_conduit::PlatformClient;
use vinr_ledger::{OfferVisibility, PgPool};
use vinr_portal::notifications::Notifier;
use vinr_portal::offers::{
    create_offer, delete_offer, get_offer, list_offers, update_offer, OfferChanges, OfferParams,
};
use warp::Reply;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OffersQuery {
    pub program_id: i64,
    pub company_id: String,
    pub visibility: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CompanyQuery {
    pub company_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OfferInput {
    pub program_id: i64,
    pub company_id: String,
    pub experience_id: Option<String>,
    pub name: String,
    pub description: String,
    pub terms: Option<String>,
    pub visibility: Option<OfferVisibility>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub rate_override: Option<f64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdateInput {
    pub company_id: String,
    pub experience_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub terms: Option<String>,
    pub visibility: Option<OfferVisibility>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub rate_override: Option<f64>,
    pub is_published: Option<bool>,
}

pub async fn hndl_list_offers(
    user_id: String,
    query: OffersQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let visibility = match &query.visibility {
        Some(v) => Some(
            OfferVisibility::from_str(v)
                .map_err(|e| warp::reject::custom(Error::Invalid(e.to_string())))?,
        ),
        None => None,
    };
    let mut conn = get_conn(&pool)?;
    let offers =
        list_offers(&mut conn, query.program_id, &query.company_id, visibility).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "offers": offers })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_create_offer(
    user_id: String,
    input: OfferInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let params = OfferParams {
        company_id: input.company_id,
        program_id: input.program_id,
        experience_id: input.experience_id,
        name: input.name,
        description: input.description,
        terms: input.terms,
        visibility: input.visibility,
        start_at: input.start_at,
        end_at: input.end_at,
        rate_override: input.rate_override,
    };
    let mut conn = get_conn(&pool)?;
    let offer = create_offer(&mut conn, &params).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "offer": offer })),
        warp::http::StatusCode::CREATED,
    ))
}

pub async fn hndl_get_offer(
    user_id: String,
    offer_id: i64,
    query: CompanyQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let offer = get_offer(&mut conn, offer_id, &query.company_id).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "offer": offer })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_update_offer(
    user_id: String,
    offer_id: i64,
    input: OfferUpdateInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
    notifier: Notifier,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let changes = OfferChanges {
        experience_id: input.experience_id,
        name: input.name,
        description: input.description,
        terms: input.terms,
        visibility: input.visibility,
        start_at: input.start_at,
        end_at: input.end_at,
        rate_override: input.rate_override,
        is_published: input.is_published,
    };
    let mut conn = get_conn(&pool)?;
    let (offer, newly_published) =
        update_offer(&mut conn, offer_id, &input.company_id, &changes).map_err(reject)?;

    if newly_published {
        if let Some(experience_id) = &offer.experience_id {
            notifier.notify_new_offer(experience_id, &offer.name, offer.id);
            log::info!(
                "offer_published: offer {}, experience {}",
                offer.id,
                experience_id
            );
        }
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "offer": offer })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_delete_offer(
    user_id: String,
    offer_id: i64,
    query: CompanyQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    delete_offer(&mut conn, offer_id, &query.company_id).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "success": true })),
        warp::http::StatusCode::OK,
    ))
}
