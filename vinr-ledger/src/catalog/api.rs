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

use diesel::pg::PgConnection;
use diesel::prelude::*;

impl Program {
    pub fn get_program_by_id(
        conn: &mut PgConnection,
        id_in: i64,
    ) -> Result<Option<Program>, LedgerError> {
        use crate::schema::programs::dsl::*;
        let result = programs.find(id_in).first::<Program>(conn).optional()?;
        Ok(result)
    }

    pub fn get_program_by_company(
        conn: &mut PgConnection,
        company_id_in: &String,
    ) -> Result<Option<Program>, LedgerError> {
        use crate::schema::programs::dsl::*;
        let result = programs
            .filter(company_id.eq(company_id_in))
            .first::<Program>(conn)
            .optional()?;
        Ok(result)
    }

    /// One program per tenant. A second upsert for the same company
    /// overwrites all configuration fields, no history is kept.
    pub fn upsert_program<'a>(
        conn: &mut PgConnection,
        company_id_in: &'a String,
        default_rate_in: &'a BigDecimal,
        payout_frequency_in: &'a PayoutFrequency,
        cookie_window_in: &'a i32,
        status_in: &'a ProgramStatus,
    ) -> Result<Program, LedgerError> {
        use crate::schema::programs::dsl::*;
        let new_program = ProgramNew {
            company_id: company_id_in,
            default_rate: default_rate_in,
            payout_frequency: payout_frequency_in,
            cookie_window: cookie_window_in,
            status: status_in,
        };

        Ok(diesel::insert_into(programs)
            .values(&new_program)
            .on_conflict(company_id)
            .do_update()
            .set((
                default_rate.eq(default_rate_in),
                payout_frequency.eq(payout_frequency_in),
                cookie_window.eq(cookie_window_in),
                status.eq(status_in),
            ))
            .get_result::<Program>(conn)?)
    }

    pub fn count_offers(conn: &mut PgConnection, program_id_in: i64) -> Result<i64, LedgerError> {
        use crate::schema::offers::dsl::*;
        let result = offers
            .filter(program_id.eq(program_id_in))
            .count()
            .first::<i64>(conn)?;
        Ok(result)
    }

    pub fn count_affiliates(
        conn: &mut PgConnection,
        program_id_in: i64,
    ) -> Result<i64, LedgerError> {
        use crate::schema::affiliates::dsl::*;
        let result = affiliates
            .filter(program_id.eq(program_id_in))
            .count()
            .first::<i64>(conn)?;
        Ok(result)
    }
}

impl Offer {
    pub fn get_offer_by_id(
        conn: &mut PgConnection,
        id_in: i64,
    ) -> Result<Option<Offer>, LedgerError> {
        use crate::schema::offers::dsl::*;
        let result = offers.find(id_in).first::<Offer>(conn).optional()?;
        Ok(result)
    }

    pub fn get_offers_for_program(
        conn: &mut PgConnection,
        program_id_in: i64,
        visibility_in: Option<OfferVisibility>,
    ) -> Result<Vec<Offer>, LedgerError> {
        use crate::schema::offers::dsl::*;
        let result = match visibility_in {
            Some(v) => offers
                .filter(program_id.eq(program_id_in))
                .filter(visibility.eq(v))
                .order(created_at.desc())
                .load::<Offer>(conn)?,
            None => offers
                .filter(program_id.eq(program_id_in))
                .order(created_at.desc())
                .load::<Offer>(conn)?,
        };
        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_offer<'a>(
        conn: &mut PgConnection,
        program_id: &'a i64,
        experience_id: Option<&'a String>,
        name: &'a String,
        description: &'a String,
        terms: Option<&'a String>,
        visibility: &'a OfferVisibility,
        start_at: Option<&'a DateTime<Utc>>,
        end_at: Option<&'a DateTime<Utc>>,
        rate_override: Option<&'a BigDecimal>,
    ) -> Result<Offer, LedgerError> {
        let new_offer = OfferNew {
            program_id,
            experience_id,
            name,
            description,
            terms,
            visibility,
            start_at,
            end_at,
            rate_override,
            is_published: &false,
        };

        Ok(diesel::insert_into(offers::table)
            .values(&new_offer)
            .get_result::<Offer>(conn)?)
    }

    pub fn update_offer(
        conn: &mut PgConnection,
        id_in: i64,
        changes: &OfferUpdate,
    ) -> Result<Offer, LedgerError> {
        use crate::schema::offers::dsl::*;
        let result = diesel::update(offers.find(id_in))
            .set(changes)
            .get_result::<Offer>(conn)?;
        Ok(result)
    }

    /// Hard delete, the offer's creatives go with it.
    pub fn remove_offer(conn: &mut PgConnection, id_in: i64) -> Result<usize, LedgerError> {
        conn.transaction::<_, LedgerError, _>(|conn| {
            diesel::delete(creatives::table.filter(creatives::offer_id.eq(id_in)))
                .execute(conn)?;
            let result = diesel::delete(offers::table.find(id_in)).execute(conn)?;
            Ok(result)
        })
    }

    pub fn count_creatives(conn: &mut PgConnection, offer_id_in: i64) -> Result<i64, LedgerError> {
        use crate::schema::creatives::dsl::*;
        let result = creatives
            .filter(offer_id.eq(offer_id_in))
            .count()
            .first::<i64>(conn)?;
        Ok(result)
    }
}

impl Creative {
    pub fn get_creative_by_id(
        conn: &mut PgConnection,
        id_in: i64,
    ) -> Result<Option<Creative>, LedgerError> {
        use crate::schema::creatives::dsl::*;
        let result = creatives.find(id_in).first::<Creative>(conn).optional()?;
        Ok(result)
    }

    pub fn get_creatives_for_offer(
        conn: &mut PgConnection,
        offer_id_in: i64,
    ) -> Result<Vec<Creative>, LedgerError> {
        use crate::schema::creatives::dsl::*;
        let result = creatives
            .filter(offer_id.eq(offer_id_in))
            .order(created_at.desc())
            .load::<Creative>(conn)?;
        Ok(result)
    }

    pub fn get_creatives_for_program(
        conn: &mut PgConnection,
        program_id_in: i64,
    ) -> Result<Vec<Creative>, LedgerError> {
        let result = creatives::table
            .inner_join(offers::table.on(creatives::offer_id.eq(offers::id)))
            .filter(offers::program_id.eq(program_id_in))
            .select(creatives::all_columns)
            .order(creatives::created_at.desc())
            .load::<Creative>(conn)?;
        Ok(result)
    }

    pub fn create_creative<'a>(
        conn: &mut PgConnection,
        offer_id: &'a i64,
        ctype: &'a CreativeType,
        url: &'a String,
        title: &'a String,
        notes: Option<&'a String>,
        metadata: Option<&'a serde_json::Value>,
    ) -> Result<Creative, LedgerError> {
        let new_creative = CreativeNew {
            offer_id,
            ctype,
            url,
            title,
            notes,
            metadata,
        };

        Ok(diesel::insert_into(creatives::table)
            .values(&new_creative)
            .get_result::<Creative>(conn)?)
    }

    pub fn remove_creative(conn: &mut PgConnection, id_in: i64) -> Result<usize, LedgerError> {
        use crate::schema::creatives::dsl::*;
        let result = diesel::delete(creatives.find(id_in)).execute(conn)?;
        Ok(result)
    }
}
