/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::affiliates::affiliate_for_company;
use crate::error::PortalError;
use crate::programs::program_for_company;

use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::Utc;
use diesel::pg::PgConnection;
use vinr_ledger::{
    summarize_events, Affiliate, AffiliateStatus, EarningsEvent, EventType, Program,
};

pub const RECENT_EVENTS_LIMIT: usize = 20;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateEarnings {
    pub affiliate_id: i64,
    pub user_id: String,
    pub status: AffiliateStatus,
    pub tier: String,
    pub clicks: i64,
    pub conversions: i64,
    pub pending_amount: BigDecimal,
    pub paid_amount: BigDecimal,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsTotals {
    pub total_affiliates: i64,
    pub total_clicks: i64,
    pub total_conversions: i64,
    pub total_pending: BigDecimal,
    pub total_paid: BigDecimal,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEarnings {
    pub earnings_by_affiliate: Vec<AffiliateEarnings>,
    pub totals: EarningsTotals,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEarningsSummary {
    pub clicks: i64,
    pub conversions_count: i64,
    pub pending_amount: BigDecimal,
    pub paid_amount: BigDecimal,
    pub total_earned: BigDecimal,
    pub commission_rate: BigDecimal,
    pub tier: String,
    pub status: AffiliateStatus,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEarnings {
    pub summary: MyEarningsSummary,
    pub recent_events: Vec<EarningsEvent>,
}

#[derive(Debug, Clone)]
pub struct TrackEventParams {
    pub company_id: String,
    pub affiliate_id: i64,
    pub etype: EventType,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub source_ref: Option<String>,
}

/// Admin earnings dashboard: one summary row per affiliate of the
/// program, biggest earners first, plus program-wide totals. The
/// optional status filter narrows the event set the same way the
/// dashboard does, "pending" counts conversions only, "paid" payouts
/// only.
pub fn program_earnings(
    conn: &mut PgConnection,
    program_id: i64,
    company_id: &str,
    status: Option<&str>,
) -> Result<ProgramEarnings, PortalError> {
    let etype_filter = match status {
        Some("paid") => Some(EventType::Payout),
        Some("pending") => Some(EventType::Conversion),
        Some(other) => {
            return Err(PortalError::invalid(&format!(
                "unknown earnings status filter: {}",
                other
            )))
        }
        None => None,
    };

    let program = program_for_company(conn, program_id, company_id)?;
    let affiliates = Affiliate::get_affiliates_for_program(conn, program.id, None)?;

    let mut rows = Vec::<AffiliateEarnings>::new();
    for affiliate in &affiliates {
        let events = EarningsEvent::get_events_for_affiliate(conn, affiliate.id, etype_filter)?;
        let summary = summarize_events(&events);
        rows.push(AffiliateEarnings {
            affiliate_id: affiliate.id,
            user_id: affiliate.user_id.clone(),
            status: affiliate.status,
            tier: affiliate.tier.clone(),
            clicks: summary.clicks,
            conversions: summary.conversions,
            pending_amount: summary.pending_amount,
            paid_amount: summary.paid_amount,
            total_amount: summary.total_amount,
        });
    }
    rows.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    let totals = EarningsTotals {
        total_affiliates: affiliates.len() as i64,
        total_clicks: rows.iter().map(|r| r.clicks).sum(),
        total_conversions: rows.iter().map(|r| r.conversions).sum(),
        total_pending: rows.iter().map(|r| r.pending_amount.clone()).sum(),
        total_paid: rows.iter().map(|r| r.paid_amount.clone()).sum(),
    };

    Ok(ProgramEarnings {
        earnings_by_affiliate: rows,
        totals,
    })
}

/// The affiliate's own earnings view, full summary plus the most recent
/// events for display.
pub fn my_earnings(
    conn: &mut PgConnection,
    program_id: i64,
    user_id: &String,
) -> Result<MyEarnings, PortalError> {
    let program = Program::get_program_by_id(conn, program_id)?
        .ok_or_else(|| PortalError::not_found("No affiliate record found"))?;
    let affiliate = Affiliate::get_affiliate_for_user(conn, program.id, user_id)?
        .ok_or_else(|| PortalError::not_found("No affiliate record found"))?;

    let events = EarningsEvent::get_events_for_affiliate(conn, affiliate.id, None)?;
    let summary = summarize_events(&events);
    let commission_rate = affiliate.effective_rate(None, &program.default_rate, Utc::now());

    let recent_events = events
        .into_iter()
        .take(RECENT_EVENTS_LIMIT)
        .collect::<Vec<EarningsEvent>>();

    Ok(MyEarnings {
        summary: MyEarningsSummary {
            clicks: summary.clicks,
            conversions_count: summary.conversions,
            pending_amount: summary.pending_amount,
            paid_amount: summary.paid_amount,
            total_earned: summary.total_amount,
            commission_rate,
            tier: affiliate.tier.clone(),
            status: affiliate.status,
        },
        recent_events,
    })
}

/// Tracking ingest for click and conversion events. Payout events only
/// ever come out of a settlement run.
pub fn track_event(
    conn: &mut PgConnection,
    params: &TrackEventParams,
) -> Result<EarningsEvent, PortalError> {
    let affiliate = affiliate_for_company(conn, params.affiliate_id, &params.company_id)?;

    let amount = match params.etype {
        EventType::Click => BigDecimal::from(0),
        EventType::Conversion => {
            let amount = params
                .amount
                .and_then(BigDecimal::from_f64)
                .ok_or_else(|| PortalError::invalid("amount is required for conversions"))?;
            if amount <= BigDecimal::from(0) {
                return Err(PortalError::invalid("amount must be positive"));
            }
            amount
        }
        EventType::Payout => {
            return Err(PortalError::invalid(
                "payout events are recorded by settlement runs",
            ))
        }
    };
    let currency = params.currency.clone().unwrap_or_else(|| "usd".to_string());

    let event = EarningsEvent::create_event(
        conn,
        &affiliate.id,
        &params.etype,
        &amount,
        &currency,
        params.source_ref.as_ref(),
    )?;
    log::info!(
        "event_tracked: event {}, affiliate {}, type {}",
        event.id,
        affiliate.id,
        event.etype.to_string()
    );
    Ok(event)
}
