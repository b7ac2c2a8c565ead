/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::PortalError;
use crate::programs::{parse_rate, program_for_company};

use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use vinr_ledger::{Creative, Offer, OfferUpdate, OfferVisibility, Program};

#[derive(Debug, Clone)]
pub struct OfferParams {
    pub company_id: String,
    pub program_id: i64,
    pub experience_id: Option<String>,
    pub name: String,
    pub description: String,
    pub terms: Option<String>,
    pub visibility: Option<OfferVisibility>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub rate_override: Option<f64>,
}

/// Partial update, absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct OfferChanges {
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

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: Offer,
    pub creatives: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetail {
    #[serde(flatten)]
    pub offer: Offer,
    pub creatives: Vec<Creative>,
}

pub fn create_offer(conn: &mut PgConnection, params: &OfferParams) -> Result<Offer, PortalError> {
    let program = match Program::get_program_by_id(conn, params.program_id)? {
        Some(p) if p.company_id == params.company_id => p,
        _ => return Err(PortalError::invalid("Invalid program or company")),
    };

    let rate_override = match params.rate_override {
        Some(r) => Some(parse_rate(r)?),
        None => None,
    };
    let visibility = params.visibility.unwrap_or(OfferVisibility::Public);

    let offer = Offer::create_offer(
        conn,
        &program.id,
        params.experience_id.as_ref(),
        &params.name,
        &params.description,
        params.terms.as_ref(),
        &visibility,
        params.start_at.as_ref(),
        params.end_at.as_ref(),
        rate_override.as_ref(),
    )?;
    log::info!("offer_created: offer {}, program {}", offer.id, program.id);
    Ok(offer)
}

pub fn list_offers(
    conn: &mut PgConnection,
    program_id: i64,
    company_id: &str,
    visibility: Option<OfferVisibility>,
) -> Result<Vec<OfferView>, PortalError> {
    let program = program_for_company(conn, program_id, company_id)?;
    let offers = Offer::get_offers_for_program(conn, program.id, visibility)?;

    let mut views = Vec::<OfferView>::new();
    for offer in offers {
        let creatives = Offer::count_creatives(conn, offer.id)?;
        views.push(OfferView { offer, creatives });
    }
    Ok(views)
}

pub fn get_offer(
    conn: &mut PgConnection,
    offer_id: i64,
    company_id: &str,
) -> Result<OfferDetail, PortalError> {
    let offer = offer_for_company(conn, offer_id, company_id)?;
    let creatives = Creative::get_creatives_for_offer(conn, offer.id)?;
    Ok(OfferDetail { offer, creatives })
}

/// Apply a partial update. The returned flag says whether this update
/// flipped the offer from unpublished to published, which is the one
/// transition that triggers an announcement.
pub fn update_offer(
    conn: &mut PgConnection,
    offer_id: i64,
    company_id: &str,
    changes: &OfferChanges,
) -> Result<(Offer, bool), PortalError> {
    let existing = offer_for_company(conn, offer_id, company_id)?;
    let was_published = existing.is_published;

    let rate_override = match changes.rate_override {
        Some(r) => Some(parse_rate(r)?),
        None => None,
    };
    let update = OfferUpdate {
        experience_id: changes.experience_id.clone(),
        name: changes.name.clone(),
        description: changes.description.clone(),
        terms: changes.terms.clone(),
        visibility: changes.visibility,
        start_at: changes.start_at,
        end_at: changes.end_at,
        rate_override,
        is_published: changes.is_published,
    };

    let offer = if update.has_changes() {
        Offer::update_offer(conn, existing.id, &update)?
    } else {
        existing
    };
    let newly_published = should_announce_publish(was_published, offer.is_published);
    Ok((offer, newly_published))
}

pub fn delete_offer(
    conn: &mut PgConnection,
    offer_id: i64,
    company_id: &str,
) -> Result<(), PortalError> {
    let offer = offer_for_company(conn, offer_id, company_id)?;
    Offer::remove_offer(conn, offer.id)?;
    log::info!("offer_deleted: offer {}", offer.id);
    Ok(())
}

/// Announce only on the unpublished -> published edge, re-saving an
/// already published offer stays quiet.
pub fn should_announce_publish(was_published: bool, is_published: bool) -> bool {
    is_published && !was_published
}

/// Load an offer and verify the offer -> program -> tenant chain.
pub fn offer_for_company(
    conn: &mut PgConnection,
    offer_id: i64,
    company_id: &str,
) -> Result<Offer, PortalError> {
    let offer = Offer::get_offer_by_id(conn, offer_id)?
        .ok_or_else(|| PortalError::not_found("Offer not found"))?;
    match Program::get_program_by_id(conn, offer.program_id)? {
        Some(program) if program.company_id == company_id => Ok(offer),
        _ => Err(PortalError::not_found("Offer not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_edge_fires_once() {
        assert!(should_announce_publish(false, true));
        assert!(!should_announce_publish(true, true));
        assert!(!should_announce_publish(false, false));
        assert!(!should_announce_publish(true, false));
    }
}
