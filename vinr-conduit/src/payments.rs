/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::ConduitError;
use crate::PlatformClient;

use serde::{Deserialize, Serialize};

/// The tenant's money lives in a platform ledger account, payouts are
/// drawn from it.
#[derive(Deserialize, Debug, Clone)]
pub struct LedgerAccount {
    pub id: String,
    pub transfer_fee: Option<f64>,
}

#[derive(Serialize, Debug, Clone)]
pub struct PayUserParams<'a> {
    pub amount: f64,
    pub currency: &'a str,
    pub destination_id: &'a str,
    pub ledger_account_id: &'a str,
    pub transfer_fee: Option<f64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PaymentReceipt {
    pub id: String,
}

impl PlatformClient {
    pub async fn get_company_ledger_account(
        &self,
        company_id: &str,
    ) -> Result<LedgerAccount, ConduitError> {
        let url = self.endpoint(&format!("/v1/companies/{}/ledger-account", company_id));
        let response = self.request(self.http.get(url)).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json::<LedgerAccount>().await?)
    }

    /// Execute one transfer to a platform user. The transfer is committed
    /// on the platform side as soon as this returns Ok, there is no way
    /// to roll it back from here.
    pub async fn pay_user(
        &self,
        params: &PayUserParams<'_>,
    ) -> Result<PaymentReceipt, ConduitError> {
        let response = self
            .request(self.http.post(self.endpoint("/v1/payments/pay-user")))
            .json(params)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json::<PaymentReceipt>().await?)
    }
}
