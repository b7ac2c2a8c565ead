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
use vinr_ledger::{CreativeType, PgPool};
use vinr_portal::creatives::{create_creative, delete_creative, list_creatives, CreativeParams};
use vinr_portal::notifications::Notifier;
use warp::Reply;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreativesQuery {
    pub company_id: String,
    pub offer_id: Option<i64>,
    pub program_id: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CompanyQuery {
    pub company_id: String,
}

/// The asset itself is uploaded to the platform's attachment storage by
/// the dashboard, this endpoint registers the returned reference.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreativeInput {
    pub company_id: String,
    pub offer_id: i64,
    pub experience_id: Option<String>,
    #[serde(rename = "type")]
    pub ctype: CreativeType,
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

pub async fn hndl_list_creatives(
    user_id: String,
    query: CreativesQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    let creatives = list_creatives(
        &mut conn,
        &query.company_id,
        query.offer_id,
        query.program_id,
    )
    .map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "creatives": creatives })),
        warp::http::StatusCode::OK,
    ))
}

pub async fn hndl_create_creative(
    user_id: String,
    input: CreativeInput,
    pool: PgPool,
    platform: Arc<PlatformClient>,
    notifier: Notifier,
) -> WebResult<impl Reply> {
    require_admin(&platform, &input.company_id, &user_id).await?;

    let params = CreativeParams {
        company_id: input.company_id,
        offer_id: input.offer_id,
        ctype: input.ctype,
        url: input.url,
        title: input.title,
        notes: input.notes,
        metadata: input.metadata,
    };
    let mut conn = get_conn(&pool)?;
    let creative = create_creative(&mut conn, &params).map_err(reject)?;

    if let Some(experience_id) = &input.experience_id {
        notifier.notify_new_creative(experience_id, &creative.title);
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "creative": creative })),
        warp::http::StatusCode::CREATED,
    ))
}

pub async fn hndl_delete_creative(
    user_id: String,
    creative_id: i64,
    query: CompanyQuery,
    pool: PgPool,
    platform: Arc<PlatformClient>,
) -> WebResult<impl Reply> {
    require_admin(&platform, &query.company_id, &user_id).await?;

    let mut conn = get_conn(&pool)?;
    delete_creative(&mut conn, creative_id, &query.company_id).map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "success": true })),
        warp::http::StatusCode::OK,
    ))
}
