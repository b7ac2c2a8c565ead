/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
#![allow(clippy::extra_unused_lifetimes)]

pub mod api;
pub use api::*;

use crate::error::LedgerError;
use crate::schema::{affiliates, earnings_events, payout_batches};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::*;

pub const DEFAULT_TIER: &str = "standard";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Affiliatestatus"]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
    #[db_rename = "pending"]
    Pending,
    #[db_rename = "approved"]
    Approved,
    #[db_rename = "rejected"]
    Rejected,
}

impl ToString for AffiliateStatus {
    fn to_string(&self) -> String {
        match self {
            Self::Pending => "pending".to_string(),
            Self::Approved => "approved".to_string(),
            Self::Rejected => "rejected".to_string(),
        }
    }
}

impl std::str::FromStr for AffiliateStatus {
    type Err = LedgerError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "pending" => Ok(AffiliateStatus::Pending),
            "approved" => Ok(AffiliateStatus::Approved),
            "rejected" => Ok(AffiliateStatus::Rejected),
            _ => Err(LedgerError::new(&format!(
                "Affiliate status {} does not exist",
                src
            ))),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Eventtype"]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[db_rename = "click"]
    Click,
    #[db_rename = "conversion"]
    Conversion,
    #[db_rename = "payout"]
    Payout,
}

impl ToString for EventType {
    fn to_string(&self) -> String {
        match self {
            Self::Click => "click".to_string(),
            Self::Conversion => "conversion".to_string(),
            Self::Payout => "payout".to_string(),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = LedgerError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "click" => Ok(EventType::Click),
            "conversion" => Ok(EventType::Conversion),
            "payout" => Ok(EventType::Payout),
            _ => Err(LedgerError::new(&format!(
                "Event type {} does not exist",
                src
            ))),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Batchstatus"]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[db_rename = "completed"]
    Completed,
    #[db_rename = "partial"]
    Partial,
}

impl ToString for BatchStatus {
    fn to_string(&self) -> String {
        match self {
            Self::Completed => "completed".to_string(),
            Self::Partial => "partial".to_string(),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = affiliates)]
pub struct Affiliate {
    pub id: i64,
    pub program_id: i64,
    pub user_id: String,
    pub status: AffiliateStatus,
    pub custom_rate: Option<BigDecimal>,
    pub tier: String,
    pub rate_expiry: Option<DateTime<Utc>>,
    pub applied_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = affiliates)]
pub struct AffiliateNew<'a> {
    pub program_id: &'a i64,
    pub user_id: &'a String,
    pub status: &'a AffiliateStatus,
    pub tier: &'a String,
}

#[derive(Queryable, Identifiable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = earnings_events)]
pub struct EarningsEvent {
    pub id: i64,
    pub affiliate_id: i64,
    #[serde(rename = "type")]
    pub etype: EventType,
    pub amount: BigDecimal,
    pub currency: String,
    pub source_ref: Option<String>,
    pub settled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = earnings_events)]
pub struct EarningsEventNew<'a> {
    pub affiliate_id: &'a i64,
    pub etype: &'a EventType,
    pub amount: &'a BigDecimal,
    pub currency: &'a String,
    pub source_ref: Option<&'a String>,
    pub settled: &'a bool,
}

#[derive(Queryable, Identifiable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = payout_batches)]
pub struct PayoutBatch {
    pub id: i64,
    pub program_id: i64,
    pub total: BigDecimal,
    pub count: i32,
    pub status: BatchStatus,
    pub metadata: serde_json::Value,
    pub processed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = payout_batches)]
pub struct PayoutBatchNew<'a> {
    pub program_id: &'a i64,
    pub total: &'a BigDecimal,
    pub count: &'a i32,
    pub status: &'a BatchStatus,
    pub metadata: &'a serde_json::Value,
    pub processed_at: &'a DateTime<Utc>,
}

/// Per-affiliate earnings breakdown, recomputed from the full event
/// history on every read.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub clicks: i64,
    pub conversions: i64,
    pub pending_amount: BigDecimal,
    pub paid_amount: BigDecimal,
    pub total_amount: BigDecimal,
}

/// Partition events by type and reduce the amounts. Pending only counts
/// conversions that no payout run has settled yet.
pub fn summarize_events(events: &[EarningsEvent]) -> EarningsSummary {
    let clicks = events.iter().filter(|e| e.etype == EventType::Click).count() as i64;
    let conversions = events
        .iter()
        .filter(|e| e.etype == EventType::Conversion)
        .count() as i64;
    let pending_amount: BigDecimal = events
        .iter()
        .filter(|e| e.etype == EventType::Conversion && !e.settled)
        .map(|e| e.amount.clone())
        .sum();
    let paid_amount: BigDecimal = events
        .iter()
        .filter(|e| e.etype == EventType::Payout)
        .map(|e| e.amount.clone())
        .sum();
    let total_amount = pending_amount.clone() + paid_amount.clone();

    EarningsSummary {
        clicks,
        conversions,
        pending_amount,
        paid_amount,
        total_amount,
    }
}

impl Affiliate {
    /// Commission rate precedence: custom rate, offer override, program
    /// default. An expired custom rate is skipped.
    pub fn effective_rate(
        &self,
        offer_override: Option<&BigDecimal>,
        program_default: &BigDecimal,
        now: DateTime<Utc>,
    ) -> BigDecimal {
        if let Some(rate) = &self.custom_rate {
            let expired = match self.rate_expiry {
                Some(expiry) => expiry <= now,
                None => false,
            };
            if !expired {
                return rate.clone();
            }
        }
        if let Some(rate) = offer_override {
            return rate.clone();
        }
        program_default.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::FromPrimitive;
    use chrono::Duration;

    fn event(id: i64, etype: EventType, amount: f64, settled: bool) -> EarningsEvent {
        EarningsEvent {
            id,
            affiliate_id: 1,
            etype,
            amount: BigDecimal::from_f64(amount).unwrap(),
            currency: "usd".to_string(),
            source_ref: None,
            settled,
            created_at: Utc::now(),
        }
    }

    fn affiliate(custom_rate: Option<f64>, rate_expiry: Option<DateTime<Utc>>) -> Affiliate {
        Affiliate {
            id: 1,
            program_id: 1,
            user_id: "user_1".to_string(),
            status: AffiliateStatus::Approved,
            custom_rate: custom_rate.map(|r| BigDecimal::from_f64(r).unwrap()),
            tier: DEFAULT_TIER.to_string(),
            rate_expiry,
            applied_at: Utc::now(),
            approved_at: Some(Utc::now()),
            rejected_at: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_partitions_by_type() {
        let events = vec![
            event(1, EventType::Click, 0.0, false),
            event(2, EventType::Click, 0.0, false),
            event(3, EventType::Conversion, 50.0, false),
            event(4, EventType::Conversion, 25.0, false),
            event(5, EventType::Payout, 30.0, false),
        ];
        let summary = summarize_events(&events);
        assert_eq!(summary.clicks, 2);
        assert_eq!(summary.conversions, 2);
        assert_eq!(summary.pending_amount, BigDecimal::from(75));
        assert_eq!(summary.paid_amount, BigDecimal::from(30));
    }

    #[test]
    fn summary_total_is_pending_plus_paid() {
        let events = vec![
            event(1, EventType::Conversion, 12.5, false),
            event(2, EventType::Conversion, 7.5, true),
            event(3, EventType::Payout, 7.5, false),
            event(4, EventType::Click, 0.0, false),
        ];
        let summary = summarize_events(&events);
        assert_eq!(
            summary.total_amount,
            summary.pending_amount.clone() + summary.paid_amount.clone()
        );
    }

    #[test]
    fn summary_skips_settled_conversions() {
        let events = vec![
            event(1, EventType::Conversion, 50.0, true),
            event(2, EventType::Conversion, 20.0, false),
            event(3, EventType::Payout, 50.0, false),
        ];
        let summary = summarize_events(&events);
        assert_eq!(summary.pending_amount, BigDecimal::from(20));
        assert_eq!(summary.paid_amount, BigDecimal::from(50));
        assert_eq!(summary.conversions, 2);
    }

    #[test]
    fn summary_of_empty_history_is_zero() {
        let summary = summarize_events(&[]);
        assert_eq!(summary.clicks, 0);
        assert_eq!(summary.conversions, 0);
        assert_eq!(summary.total_amount, BigDecimal::from(0));
    }

    #[test]
    fn effective_rate_prefers_custom_rate() {
        let aff = affiliate(Some(15.0), None);
        let offer_rate = BigDecimal::from(12);
        let program_rate = BigDecimal::from(10);
        let rate = aff.effective_rate(Some(&offer_rate), &program_rate, Utc::now());
        assert_eq!(rate, BigDecimal::from_f64(15.0).unwrap());
    }

    #[test]
    fn effective_rate_falls_back_to_offer_override() {
        let aff = affiliate(None, None);
        let offer_rate = BigDecimal::from(12);
        let program_rate = BigDecimal::from(10);
        let rate = aff.effective_rate(Some(&offer_rate), &program_rate, Utc::now());
        assert_eq!(rate, BigDecimal::from(12));
    }

    #[test]
    fn effective_rate_falls_back_to_program_default() {
        let aff = affiliate(None, None);
        let program_rate = BigDecimal::from(10);
        let rate = aff.effective_rate(None, &program_rate, Utc::now());
        assert_eq!(rate, BigDecimal::from(10));
    }

    #[test]
    fn effective_rate_skips_expired_custom_rate() {
        let now = Utc::now();
        let aff = affiliate(Some(20.0), Some(now - Duration::days(1)));
        let program_rate = BigDecimal::from(10);
        let rate = aff.effective_rate(None, &program_rate, now);
        assert_eq!(rate, BigDecimal::from(10));
    }
}
