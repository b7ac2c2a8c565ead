/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::PortalError;
use crate::notifications::Notifier;
use crate::programs::program_for_company;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use diesel::pg::PgConnection;
use serde_json::json;
use vinr_conduit::{ConduitError, LedgerAccount, PayUserParams, PlatformClient};
use vinr_ledger::{Affiliate, BatchStatus, EarningsEvent, EventType, PayoutBatch};

pub const DEFAULT_CURRENCY: &str = "usd";
pub const BATCH_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub company_id: String,
    pub program_id: i64,
    pub experience_id: Option<String>,
    pub affiliate_ids: Vec<i64>,
    pub currency: Option<String>,
}

/// Outcome of one affiliate inside a batch run.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub affiliate_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemResult {
    fn paid(affiliate_id: i64, user_id: String, amount: BigDecimal) -> ItemResult {
        ItemResult {
            affiliate_id,
            user_id: Some(user_id),
            amount: Some(amount),
            success: true,
            error: None,
        }
    }

    fn failed(affiliate_id: i64, error: String) -> ItemResult {
        ItemResult {
            affiliate_id,
            user_id: None,
            amount: None,
            success: false,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub batch: PayoutBatch,
    pub results: Vec<ItemResult>,
    pub success_count: i64,
    pub total_amount: BigDecimal,
}

/// Pay out the pending conversion balance of every requested affiliate.
///
/// Each affiliate is settled independently and in order: a failure for
/// one is recorded in its item result and never aborts the rest of the
/// batch. A payout that the platform confirmed stays committed even
/// when a later item fails, there is no batch-level rollback.
pub async fn process_payout_batch(
    conn: &mut PgConnection,
    platform: &PlatformClient,
    notifier: &Notifier,
    request: &SettlementRequest,
) -> Result<BatchOutcome, PortalError> {
    if request.affiliate_ids.is_empty() {
        return Err(PortalError::invalid(
            "companyId, programId, and affiliateIds are required",
        ));
    }
    let program = program_for_company(conn, request.program_id, &request.company_id)?;
    let currency = request
        .currency
        .clone()
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let ledger_account = match platform.get_company_ledger_account(&request.company_id).await {
        Ok(account) => account,
        Err(ConduitError::Api { status: 404, .. }) => {
            return Err(PortalError::invalid("Company ledger account not found"))
        }
        Err(e) => return Err(e.into()),
    };

    let batch_ref = format!("batch_{}", Utc::now().timestamp_millis());
    let mut results = Vec::<ItemResult>::new();

    for affiliate_id in &request.affiliate_ids {
        match settle_affiliate(
            conn,
            platform,
            &ledger_account,
            *affiliate_id,
            &currency,
            &batch_ref,
        )
        .await
        {
            Ok((affiliate, amount)) => {
                if let Some(experience_id) = &request.experience_id {
                    notifier.notify_payout_issued(
                        experience_id,
                        &affiliate.user_id,
                        &amount,
                        &currency,
                    );
                }
                results.push(ItemResult::paid(*affiliate_id, affiliate.user_id, amount));
            }
            Err(e) => {
                log::error!(
                    "error processing payout for affiliate {}: {:?}",
                    affiliate_id,
                    e.to_string()
                );
                results.push(ItemResult::failed(*affiliate_id, e.to_string()));
            }
        }
    }

    let (success_count, total_amount) = summarize_results(&results);
    let status = batch_status(success_count as usize, request.affiliate_ids.len());
    let metadata = json!({ "results": &results });

    let batch = PayoutBatch::create_batch(
        conn,
        &program.id,
        &total_amount,
        &(success_count as i32),
        &status,
        &metadata,
    )?;
    log::info!(
        "payout_processed: batch {}, program {}, paid {} of {} affiliates, total {}",
        batch.id,
        program.id,
        success_count,
        request.affiliate_ids.len(),
        total_amount
    );

    Ok(BatchOutcome {
        batch,
        results,
        success_count,
        total_amount,
    })
}

/// Settle one affiliate: claim the unsettled conversions, execute the
/// platform payment, record the payout event. The claim is released
/// again when the payment does not go through.
async fn settle_affiliate(
    conn: &mut PgConnection,
    platform: &PlatformClient,
    ledger_account: &LedgerAccount,
    affiliate_id: i64,
    currency: &str,
    batch_ref: &str,
) -> Result<(Affiliate, BigDecimal), PortalError> {
    let affiliate = Affiliate::get_affiliate_by_id(conn, affiliate_id)?
        .ok_or_else(|| PortalError::not_found("Affiliate not found"))?;

    let (claimed_ids, pending_amount) =
        EarningsEvent::claim_pending_conversions(conn, affiliate.id)?;
    if claimed_ids.is_empty() {
        return Err(PortalError::invalid("No pending earnings"));
    }

    let amount = match pending_amount.to_f64() {
        Some(a) => a,
        None => {
            EarningsEvent::release_claimed_conversions(conn, &claimed_ids)?;
            return Err(PortalError::invalid("pending amount is not payable"));
        }
    };

    let payment = platform
        .pay_user(&PayUserParams {
            amount,
            currency,
            destination_id: &affiliate.user_id,
            ledger_account_id: &ledger_account.id,
            transfer_fee: ledger_account.transfer_fee,
        })
        .await;

    if let Err(e) = payment {
        EarningsEvent::release_claimed_conversions(conn, &claimed_ids)?;
        return Err(e.into());
    }

    EarningsEvent::create_event(
        conn,
        &affiliate.id,
        &EventType::Payout,
        &pending_amount,
        &currency.to_string(),
        Some(&batch_ref.to_string()),
    )?;

    Ok((affiliate, pending_amount))
}

/// Success count and paid total over the per-item results.
pub fn summarize_results(results: &[ItemResult]) -> (i64, BigDecimal) {
    let success_count = results.iter().filter(|r| r.success).count() as i64;
    let total_amount: BigDecimal = results
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| r.amount.clone())
        .sum();
    (success_count, total_amount)
}

/// A batch is completed only when every requested affiliate was paid.
pub fn batch_status(success_count: usize, requested: usize) -> BatchStatus {
    if success_count == requested {
        BatchStatus::Completed
    } else {
        BatchStatus::Partial
    }
}

pub fn list_batches(
    conn: &mut PgConnection,
    program_id: i64,
    company_id: &str,
) -> Result<Vec<PayoutBatch>, PortalError> {
    let program = program_for_company(conn, program_id, company_id)?;
    Ok(PayoutBatch::get_batches_for_program(
        conn,
        program.id,
        BATCH_HISTORY_LIMIT,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::FromPrimitive;

    #[test]
    fn partial_batch_with_one_success() {
        // A has pending earnings, B has none, C does not exist.
        let results = vec![
            ItemResult::paid(1, "user_a".to_string(), BigDecimal::from(50)),
            ItemResult::failed(2, "No pending earnings".to_string()),
            ItemResult::failed(3, "Affiliate not found".to_string()),
        ];
        let (success_count, total_amount) = summarize_results(&results);
        assert_eq!(success_count, 1);
        assert_eq!(total_amount, BigDecimal::from(50));
        assert_eq!(
            batch_status(success_count as usize, results.len()),
            BatchStatus::Partial
        );
        assert!(results[0].success);
        assert_eq!(results[0].amount, Some(BigDecimal::from(50)));
        assert!(!results[1].success);
        assert!(!results[2].success);
    }

    #[test]
    fn completed_batch_sums_all_payouts() {
        let results = vec![
            ItemResult::paid(1, "user_a".to_string(), BigDecimal::from(50)),
            ItemResult::paid(2, "user_b".to_string(), BigDecimal::from(30)),
        ];
        let (success_count, total_amount) = summarize_results(&results);
        assert_eq!(success_count, 2);
        assert_eq!(total_amount, BigDecimal::from(80));
        assert_eq!(
            batch_status(success_count as usize, results.len()),
            BatchStatus::Completed
        );
    }

    #[test]
    fn empty_batch_counts_as_completed() {
        let (success_count, total_amount) = summarize_results(&[]);
        assert_eq!(success_count, 0);
        assert_eq!(total_amount, BigDecimal::from(0));
        assert_eq!(batch_status(0, 0), BatchStatus::Completed);
    }

    #[test]
    fn failed_items_do_not_count_into_the_total() {
        let results = vec![
            ItemResult::paid(1, "user_a".to_string(), BigDecimal::from_f64(12.5).unwrap()),
            ItemResult::failed(2, "payment declined".to_string()),
            ItemResult::paid(3, "user_c".to_string(), BigDecimal::from_f64(7.5).unwrap()),
        ];
        let (success_count, total_amount) = summarize_results(&results);
        assert_eq!(success_count, 2);
        assert_eq!(total_amount, BigDecimal::from(20));
        assert_eq!(
            batch_status(success_count as usize, results.len()),
            BatchStatus::Partial
        );
    }

    #[test]
    fn failure_results_carry_the_reason() {
        let result = ItemResult::failed(7, "No pending earnings".to_string());
        assert_eq!(result.affiliate_id, 7);
        assert_eq!(result.error.as_deref(), Some("No pending earnings"));
        assert_eq!(result.amount, None);
    }
}
