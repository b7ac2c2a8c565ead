/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::WebResult;

use bytes::Bytes;
use std::env;
use vinr_conduit::webhook::{
    verify_webhook_signature, WebhookEvent, WebhookPayment, ACTION_PAYMENT_SUCCEEDED,
};
use warp::Reply;

/// Inbound platform webhook. Always answers 200 so the platform stops
/// retrying, the actual follow-up work runs detached from the response.
pub async fn hndl_webhook(signature: Option<String>, body: Bytes) -> WebResult<impl Reply> {
    let ok = warp::reply::with_status("OK", warp::http::StatusCode::OK);

    let secret = env::var("PLATFORM_WEBHOOK_SECRET").unwrap_or_else(|_| "fallback".to_string());
    let signature = match signature {
        Some(s) => s,
        None => {
            log::warn!("webhook without signature header dropped");
            return Ok(ok);
        }
    };
    if let Err(e) = verify_webhook_signature(&secret, &body, &signature) {
        log::warn!("webhook signature rejected: {:?}", e.to_string());
        return Ok(ok);
    }

    let event = match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("webhook payload not parsable: {:?}", e.to_string());
            return Ok(ok);
        }
    };

    if event.action == ACTION_PAYMENT_SUCCEEDED {
        log::info!(
            "webhook payment.succeeded: payment {}, user {:?}, amount {:?}",
            event.data.id,
            event.data.user_id,
            event.data.final_amount
        );
        tokio::spawn(handle_payment_succeeded(event.data));
    }

    Ok(ok)
}

/// Follow-up on a confirmed payment, decoupled from the webhook
/// response.
async fn handle_payment_succeeded(payment: WebhookPayment) {
    if payment.metadata.get("experienceId").is_some() {
        log::info!(
            "webhook: affiliate-driven payment detected, payment {}, offer {:?}",
            payment.id,
            payment.metadata.get("offerId")
        );
        // TODO: record a conversion event for the referring affiliate once
        // the payment metadata carries the attribution link
    }

    if payment.metadata.get("accessPassId").is_some() {
        log::info!(
            "webhook: app subscription payment, payment {}, access pass {:?}",
            payment.id,
            payment.metadata.get("accessPassId")
        );
        // TODO: activate the tenant subscription from the access pass
    }
}
