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
use vinr_ledger::{Affiliate, AffiliateStatus, EarningsEvent, Program, ProgramStatus};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateView {
    #[serde(flatten)]
    pub affiliate: Affiliate,
    pub events: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ApprovalParams {
    pub custom_rate: Option<f64>,
    pub tier: Option<String>,
    pub rate_expiry: Option<DateTime<Utc>>,
}

/// File an application for the calling user. Applying twice never
/// creates a second row, the original record comes back with the
/// AlreadyApplied error instead.
pub fn apply(
    conn: &mut PgConnection,
    program_id: i64,
    user_id: &String,
) -> Result<Affiliate, PortalError> {
    let program = match Program::get_program_by_id(conn, program_id)? {
        Some(p) => p,
        None => return Err(PortalError::invalid("Program not found or inactive")),
    };
    if program.status != ProgramStatus::Active {
        return Err(PortalError::invalid("Program not found or inactive"));
    }

    if let Some(existing) = Affiliate::get_affiliate_for_user(conn, program.id, user_id)? {
        return Err(PortalError::AlreadyApplied(Box::new(existing)));
    }

    let affiliate = Affiliate::create_application(conn, &program.id, user_id)?;
    log::info!(
        "affiliate_applied: affiliate {}, program {}, user {}",
        affiliate.id,
        program.id,
        user_id
    );
    Ok(affiliate)
}

pub fn list_affiliates(
    conn: &mut PgConnection,
    program_id: i64,
    company_id: &str,
    status: Option<AffiliateStatus>,
) -> Result<Vec<AffiliateView>, PortalError> {
    let program = program_for_company(conn, program_id, company_id)?;
    let affiliates = Affiliate::get_affiliates_for_program(conn, program.id, status)?;

    let mut views = Vec::<AffiliateView>::new();
    for affiliate in affiliates {
        let events = EarningsEvent::count_events_for_affiliate(conn, affiliate.id)?;
        views.push(AffiliateView { affiliate, events });
    }
    Ok(views)
}

pub fn approve(
    conn: &mut PgConnection,
    affiliate_id: i64,
    company_id: &str,
    params: &ApprovalParams,
) -> Result<Affiliate, PortalError> {
    let affiliate = affiliate_for_company(conn, affiliate_id, company_id)?;
    if affiliate.status != AffiliateStatus::Pending {
        return Err(PortalError::invalid("Application already decided"));
    }

    let custom_rate = match params.custom_rate {
        Some(r) => Some(parse_rate(r)?),
        None => None,
    };

    let updated = Affiliate::approve_affiliate(
        conn,
        affiliate.id,
        custom_rate.as_ref(),
        params.tier.as_ref(),
        params.rate_expiry.as_ref(),
    )?;
    log::info!(
        "affiliate_approved: affiliate {}, program {}, user {}",
        updated.id,
        updated.program_id,
        updated.user_id
    );
    Ok(updated)
}

pub fn reject(
    conn: &mut PgConnection,
    affiliate_id: i64,
    company_id: &str,
) -> Result<Affiliate, PortalError> {
    let affiliate = affiliate_for_company(conn, affiliate_id, company_id)?;
    if affiliate.status != AffiliateStatus::Pending {
        return Err(PortalError::invalid("Application already decided"));
    }

    let updated = Affiliate::reject_affiliate(conn, affiliate.id)?;
    log::info!(
        "affiliate_rejected: affiliate {}, program {}",
        updated.id,
        updated.program_id
    );
    Ok(updated)
}

/// Load an affiliate and verify the affiliate -> program -> tenant
/// chain.
pub fn affiliate_for_company(
    conn: &mut PgConnection,
    affiliate_id: i64,
    company_id: &str,
) -> Result<Affiliate, PortalError> {
    let affiliate = Affiliate::get_affiliate_by_id(conn, affiliate_id)?
        .ok_or_else(|| PortalError::not_found("Affiliate not found"))?;
    match Program::get_program_by_id(conn, affiliate.program_id)? {
        Some(program) if program.company_id == company_id => Ok(affiliate),
        _ => Err(PortalError::not_found("Affiliate not found")),
    }
}
