/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::PortalError;

use bigdecimal::{BigDecimal, FromPrimitive};
use diesel::pg::PgConnection;
use vinr_ledger::{PayoutFrequency, Program, ProgramStatus};

pub const DEFAULT_COOKIE_WINDOW: i32 = 30;

#[derive(Debug, Clone)]
pub struct ProgramParams {
    pub company_id: String,
    pub default_rate: f64,
    pub payout_frequency: PayoutFrequency,
    pub cookie_window: Option<i32>,
    pub status: Option<ProgramStatus>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramOverview {
    #[serde(flatten)]
    pub program: Program,
    pub offers: i64,
    pub affiliates: i64,
}

/// Commission rates are percentages, anything outside [0,100] is a
/// caller mistake.
pub fn parse_rate(rate: f64) -> Result<BigDecimal, PortalError> {
    if !(0.0..=100.0).contains(&rate) {
        return Err(PortalError::invalid("rate must be between 0 and 100"));
    }
    BigDecimal::from_f64(rate).ok_or_else(|| PortalError::invalid("rate is not a valid number"))
}

/// Create the tenant's program or overwrite its configuration. There is
/// no history, a rate change applies retroactively to every effective
/// rate read that follows.
pub fn upsert_program(
    conn: &mut PgConnection,
    params: &ProgramParams,
) -> Result<Program, PortalError> {
    let rate = parse_rate(params.default_rate)?;
    let cookie_window = params.cookie_window.unwrap_or(DEFAULT_COOKIE_WINDOW);
    let status = params.status.unwrap_or(ProgramStatus::Active);

    let program = Program::upsert_program(
        conn,
        &params.company_id,
        &rate,
        &params.payout_frequency,
        &cookie_window,
        &status,
    )?;
    log::info!(
        "program_upserted: program {}, company {}",
        program.id,
        program.company_id
    );
    Ok(program)
}

pub fn get_program_overview(
    conn: &mut PgConnection,
    company_id: &String,
) -> Result<Option<ProgramOverview>, PortalError> {
    let program = match Program::get_program_by_company(conn, company_id)? {
        Some(p) => p,
        None => return Ok(None),
    };
    let offers = Program::count_offers(conn, program.id)?;
    let affiliates = Program::count_affiliates(conn, program.id)?;
    Ok(Some(ProgramOverview {
        program,
        offers,
        affiliates,
    }))
}

/// Load a program and verify it belongs to the calling tenant. A
/// mismatch looks the same as a missing program to the caller.
pub fn program_for_company(
    conn: &mut PgConnection,
    program_id: i64,
    company_id: &str,
) -> Result<Program, PortalError> {
    match Program::get_program_by_id(conn, program_id)? {
        Some(program) if program.company_id == company_id => Ok(program),
        _ => Err(PortalError::not_found("Program not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rates_within_bounds() {
        assert_eq!(parse_rate(0.0).unwrap(), BigDecimal::from(0));
        assert_eq!(parse_rate(100.0).unwrap(), BigDecimal::from(100));
        assert_eq!(
            parse_rate(12.5).unwrap(),
            BigDecimal::from_f64(12.5).unwrap()
        );
    }

    #[test]
    fn rejects_rates_out_of_bounds() {
        assert!(matches!(
            parse_rate(100.1),
            Err(PortalError::Invalid(_))
        ));
        assert!(matches!(parse_rate(-0.5), Err(PortalError::Invalid(_))));
        assert!(matches!(
            parse_rate(f64::NAN),
            Err(PortalError::Invalid(_))
        ));
    }
}
