/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use super::*;
use crate::error::LedgerError;
use crate::schema::*;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

impl Affiliate {
    pub fn get_affiliate_by_id(
        conn: &mut PgConnection,
        id_in: i64,
    ) -> Result<Option<Affiliate>, LedgerError> {
        use crate::schema::affiliates::dsl::*;
        let result = affiliates.find(id_in).first::<Affiliate>(conn).optional()?;
        Ok(result)
    }

    pub fn get_affiliate_for_user(
        conn: &mut PgConnection,
        program_id_in: i64,
        user_id_in: &String,
    ) -> Result<Option<Affiliate>, LedgerError> {
        use crate::schema::affiliates::dsl::*;
        let result = affiliates
            .filter(program_id.eq(program_id_in))
            .filter(user_id.eq(user_id_in))
            .first::<Affiliate>(conn)
            .optional()?;
        Ok(result)
    }

    pub fn get_affiliates_for_program(
        conn: &mut PgConnection,
        program_id_in: i64,
        status_in: Option<AffiliateStatus>,
    ) -> Result<Vec<Affiliate>, LedgerError> {
        use crate::schema::affiliates::dsl::*;
        let result = match status_in {
            Some(s) => affiliates
                .filter(program_id.eq(program_id_in))
                .filter(status.eq(s))
                .order(applied_at.desc())
                .load::<Affiliate>(conn)?,
            None => affiliates
                .filter(program_id.eq(program_id_in))
                .order(applied_at.desc())
                .load::<Affiliate>(conn)?,
        };
        Ok(result)
    }

    pub fn create_application<'a>(
        conn: &mut PgConnection,
        program_id: &'a i64,
        user_id: &'a String,
    ) -> Result<Affiliate, LedgerError> {
        let tier = DEFAULT_TIER.to_string();
        let new_affiliate = AffiliateNew {
            program_id,
            user_id,
            status: &AffiliateStatus::Pending,
            tier: &tier,
        };

        Ok(diesel::insert_into(affiliates::table)
            .values(&new_affiliate)
            .get_result::<Affiliate>(conn)?)
    }

    pub fn approve_affiliate<'a>(
        conn: &mut PgConnection,
        id_in: i64,
        custom_rate_in: Option<&'a BigDecimal>,
        tier_in: Option<&'a String>,
        rate_expiry_in: Option<&'a DateTime<Utc>>,
    ) -> Result<Affiliate, LedgerError> {
        use crate::schema::affiliates::dsl::*;
        let result = diesel::update(affiliates.find(id_in))
            .set((
                status.eq(AffiliateStatus::Approved),
                approved_at.eq(Some(Utc::now())),
                custom_rate.eq(custom_rate_in),
                tier.eq(tier_in.cloned().unwrap_or_else(|| DEFAULT_TIER.to_string())),
                rate_expiry.eq(rate_expiry_in),
            ))
            .get_result::<Affiliate>(conn)?;
        Ok(result)
    }

    pub fn reject_affiliate(conn: &mut PgConnection, id_in: i64) -> Result<Affiliate, LedgerError> {
        use crate::schema::affiliates::dsl::*;
        let result = diesel::update(affiliates.find(id_in))
            .set((
                status.eq(AffiliateStatus::Rejected),
                rejected_at.eq(Some(Utc::now())),
            ))
            .get_result::<Affiliate>(conn)?;
        Ok(result)
    }
}

impl EarningsEvent {
    pub fn get_events_for_affiliate(
        conn: &mut PgConnection,
        affiliate_id_in: i64,
        etype_in: Option<EventType>,
    ) -> Result<Vec<EarningsEvent>, LedgerError> {
        use crate::schema::earnings_events::dsl::*;
        let result = match etype_in {
            Some(t) => earnings_events
                .filter(affiliate_id.eq(affiliate_id_in))
                .filter(etype.eq(t))
                .order(created_at.desc())
                .load::<EarningsEvent>(conn)?,
            None => earnings_events
                .filter(affiliate_id.eq(affiliate_id_in))
                .order(created_at.desc())
                .load::<EarningsEvent>(conn)?,
        };
        Ok(result)
    }

    pub fn count_events_for_affiliate(
        conn: &mut PgConnection,
        affiliate_id_in: i64,
    ) -> Result<i64, LedgerError> {
        use crate::schema::earnings_events::dsl::*;
        let result = earnings_events
            .filter(affiliate_id.eq(affiliate_id_in))
            .count()
            .first::<i64>(conn)?;
        Ok(result)
    }

    pub fn create_event<'a>(
        conn: &mut PgConnection,
        affiliate_id: &'a i64,
        etype: &'a EventType,
        amount: &'a BigDecimal,
        currency: &'a String,
        source_ref: Option<&'a String>,
    ) -> Result<EarningsEvent, LedgerError> {
        let new_event = EarningsEventNew {
            affiliate_id,
            etype,
            amount,
            currency,
            source_ref,
            settled: &false,
        };

        Ok(diesel::insert_into(earnings_events::table)
            .values(&new_event)
            .get_result::<EarningsEvent>(conn)?)
    }

    /// Lock and mark the affiliate's unsettled conversion events as taken
    /// by a payout run. Returns the claimed event ids and their sum; an
    /// empty claim means there is nothing to pay. The row locks serialize
    /// concurrent settlement runs over the same affiliate.
    pub fn claim_pending_conversions(
        conn: &mut PgConnection,
        affiliate_id_in: i64,
    ) -> Result<(Vec<i64>, BigDecimal), LedgerError> {
        use crate::schema::earnings_events::dsl::*;
        conn.transaction::<_, LedgerError, _>(|conn| {
            let pending = earnings_events
                .filter(affiliate_id.eq(affiliate_id_in))
                .filter(etype.eq(EventType::Conversion))
                .filter(settled.eq(false))
                .for_update()
                .load::<EarningsEvent>(conn)?;

            let total: BigDecimal = pending.iter().map(|e| e.amount.clone()).sum();
            if total <= BigDecimal::from(0) {
                return Ok((Vec::new(), total));
            }

            let ids: Vec<i64> = pending.iter().map(|e| e.id).collect();
            diesel::update(earnings_events.filter(id.eq_any(&ids)))
                .set(settled.eq(true))
                .execute(conn)?;
            log::debug!(
                "claimed {} conversion events for affiliate {}",
                ids.len(),
                affiliate_id_in
            );

            Ok((ids, total))
        })
    }

    /// Undo a claim after a failed payment so the conversions count as
    /// pending again.
    pub fn release_claimed_conversions(
        conn: &mut PgConnection,
        ids_in: &[i64],
    ) -> Result<usize, LedgerError> {
        use crate::schema::earnings_events::dsl::*;
        let result = diesel::update(earnings_events.filter(id.eq_any(ids_in)))
            .set(settled.eq(false))
            .execute(conn)?;
        Ok(result)
    }

    pub fn summarize_affiliate(
        conn: &mut PgConnection,
        affiliate_id_in: i64,
    ) -> Result<EarningsSummary, LedgerError> {
        let events = Self::get_events_for_affiliate(conn, affiliate_id_in, None)?;
        Ok(summarize_events(&events))
    }
}

impl PayoutBatch {
    pub fn create_batch<'a>(
        conn: &mut PgConnection,
        program_id: &'a i64,
        total: &'a BigDecimal,
        count: &'a i32,
        status: &'a BatchStatus,
        metadata: &'a serde_json::Value,
    ) -> Result<PayoutBatch, LedgerError> {
        let now = Utc::now();
        let new_batch = PayoutBatchNew {
            program_id,
            total,
            count,
            status,
            metadata,
            processed_at: &now,
        };

        Ok(diesel::insert_into(payout_batches::table)
            .values(&new_batch)
            .get_result::<PayoutBatch>(conn)?)
    }

    pub fn get_batches_for_program(
        conn: &mut PgConnection,
        program_id_in: i64,
        limit_in: i64,
    ) -> Result<Vec<PayoutBatch>, LedgerError> {
        use crate::schema::payout_batches::dsl::*;
        let result = payout_batches
            .filter(program_id.eq(program_id_in))
            .order(processed_at.desc())
            .limit(limit_in)
            .load::<PayoutBatch>(conn)?;
        Ok(result)
    }
}
