/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::PortalError;
use crate::offers::offer_for_company;
use crate::programs::program_for_company;

use diesel::pg::PgConnection;
use vinr_ledger::{Creative, CreativeType, Offer, Program};

#[derive(Debug, Clone)]
pub struct CreativeParams {
    pub company_id: String,
    pub offer_id: i64,
    pub ctype: CreativeType,
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeView {
    #[serde(flatten)]
    pub creative: Creative,
    pub offer_name: String,
}

/// Register an uploaded asset reference under an offer. The file itself
/// lives in the platform's attachment storage, we only keep the URL and
/// the upload metadata.
pub fn create_creative(
    conn: &mut PgConnection,
    params: &CreativeParams,
) -> Result<Creative, PortalError> {
    let offer = offer_for_company(conn, params.offer_id, &params.company_id)?;

    let creative = Creative::create_creative(
        conn,
        &offer.id,
        &params.ctype,
        &params.url,
        &params.title,
        params.notes.as_ref(),
        params.metadata.as_ref(),
    )?;
    log::info!(
        "creative_uploaded: creative {}, offer {}, type {}",
        creative.id,
        offer.id,
        creative.ctype.to_string()
    );
    Ok(creative)
}

pub fn list_creatives(
    conn: &mut PgConnection,
    company_id: &str,
    offer_id: Option<i64>,
    program_id: Option<i64>,
) -> Result<Vec<CreativeView>, PortalError> {
    let creatives = match (offer_id, program_id) {
        (Some(oid), _) => {
            let offer = offer_for_company(conn, oid, company_id)?;
            Creative::get_creatives_for_offer(conn, offer.id)?
        }
        (None, Some(pid)) => {
            let program = program_for_company(conn, pid, company_id)?;
            Creative::get_creatives_for_program(conn, program.id)?
        }
        (None, None) => {
            return Err(PortalError::invalid("offerId or programId is required"));
        }
    };

    let mut views = Vec::<CreativeView>::new();
    for creative in creatives {
        let offer_name = match Offer::get_offer_by_id(conn, creative.offer_id)? {
            Some(offer) => offer.name,
            None => String::new(),
        };
        views.push(CreativeView {
            creative,
            offer_name,
        });
    }
    Ok(views)
}

/// Verify the creative -> offer -> program -> tenant chain before the
/// hard delete.
pub fn delete_creative(
    conn: &mut PgConnection,
    creative_id: i64,
    company_id: &str,
) -> Result<(), PortalError> {
    let creative = Creative::get_creative_by_id(conn, creative_id)?
        .ok_or_else(|| PortalError::not_found("Creative not found"))?;
    let offer = Offer::get_offer_by_id(conn, creative.offer_id)?
        .ok_or_else(|| PortalError::not_found("Creative not found"))?;
    match Program::get_program_by_id(conn, offer.program_id)? {
        Some(program) if program.company_id == company_id => {}
        _ => return Err(PortalError::not_found("Creative not found")),
    }

    Creative::remove_creative(conn, creative.id)?;
    log::info!("creative_deleted: creative {}", creative.id);
    Ok(())
}
