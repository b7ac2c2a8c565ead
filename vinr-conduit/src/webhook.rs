/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::ConduitError;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

/// Header carrying the hex-encoded HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-platform-signature";

pub const ACTION_PAYMENT_SUCCEEDED: &str = "payment.succeeded";

type HmacSha256 = Hmac<Sha256>;

/// Check that an inbound webhook body was signed with the shared secret.
/// The platform sends the signature hex encoded, with or without a
/// "sha256=" prefix.
pub fn verify_webhook_signature(
    secret: &str,
    body: &[u8],
    signature: &str,
) -> Result<(), ConduitError> {
    let given = signature.trim().trim_start_matches("sha256=");
    let given = hex::decode(given).map_err(|_| ConduitError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| ConduitError::InvalidSignature)?;
    mac.update(body);
    mac.verify_slice(&given)
        .map_err(|_| ConduitError::InvalidSignature)
}

#[derive(Deserialize, Debug, Clone)]
pub struct WebhookEvent {
    pub action: String,
    pub data: WebhookPayment,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WebhookPayment {
    pub id: String,
    pub final_amount: Option<f64>,
    pub amount_after_fees: Option<f64>,
    pub currency: Option<String>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"action":"payment.succeeded"}"#;
    // openssl dgst -sha256 -hmac "whsec_test" over BODY
    const SIGNATURE: &str = "a4e12a2a01a06fbf63d1db84ef9507ec4668458e4ab316f01384108429449787";

    #[test]
    fn accepts_valid_signature() {
        assert!(verify_webhook_signature(SECRET, BODY, SIGNATURE).is_ok());
    }

    #[test]
    fn accepts_prefixed_signature() {
        let prefixed = format!("sha256={}", SIGNATURE);
        assert!(verify_webhook_signature(SECRET, BODY, &prefixed).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let tampered = br#"{"action":"payment.failed"}"#;
        assert!(verify_webhook_signature(SECRET, tampered, SIGNATURE).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        assert!(verify_webhook_signature("whsec_other", BODY, SIGNATURE).is_err());
    }

    #[test]
    fn rejects_garbage_signature() {
        assert!(verify_webhook_signature(SECRET, BODY, "not-hex").is_err());
    }

    #[test]
    fn parses_payment_event() {
        let raw = r#"{
            "action": "payment.succeeded",
            "data": {
                "id": "pay_123",
                "final_amount": 49.99,
                "amount_after_fees": 47.5,
                "currency": "usd",
                "user_id": "user_9",
                "metadata": {"experienceId": "exp_1", "offerId": "7"}
            }
        }"#;
        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.action, ACTION_PAYMENT_SUCCEEDED);
        assert_eq!(event.data.id, "pay_123");
        assert_eq!(event.data.metadata["experienceId"], "exp_1");
    }
}
