/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use std::sync::Arc;

use bigdecimal::BigDecimal;
use vinr_conduit::{PlatformClient, PushNotification};

/// Best-effort messenger for state transitions. Every send runs as a
/// detached task, delivery failures end up in the log and never reach
/// the request that triggered them. Notifications are not part of the
/// financial record.
#[derive(Debug, Clone)]
pub struct Notifier {
    platform: Arc<PlatformClient>,
}

impl Notifier {
    pub fn new(platform: Arc<PlatformClient>) -> Notifier {
        Notifier { platform }
    }

    fn dispatch(&self, what: &'static str, notification: PushNotification) {
        let platform = Arc::clone(&self.platform);
        tokio::spawn(async move {
            if let Err(e) = platform.send_push_notification(&notification).await {
                log::warn!("{} notification failed: {:?}", what, e.to_string());
            }
        });
    }

    /// Announce a freshly published offer to all members of the
    /// experience.
    pub fn notify_new_offer(&self, experience_id: &str, offer_name: &str, offer_id: i64) {
        self.dispatch(
            "new offer",
            PushNotification {
                title: "New Affiliate Offer Available!".to_string(),
                content: format!("Check out our new offer: {}", offer_name),
                experience_id: Some(experience_id.to_string()),
                rest_path: Some(format!("/offers/{}", offer_id)),
                is_mention: true,
                ..Default::default()
            },
        );
    }

    pub fn notify_new_creative(&self, experience_id: &str, creative_title: &str) {
        self.dispatch(
            "new creative",
            PushNotification {
                title: "New Marketing Creative Available".to_string(),
                content: format!("{} is now ready for download", creative_title),
                experience_id: Some(experience_id.to_string()),
                rest_path: Some("/creatives".to_string()),
                ..Default::default()
            },
        );
    }

    pub fn notify_application_status(&self, experience_id: &str, user_id: &str, approved: bool) {
        let (title, content) = application_status_message(approved);
        self.dispatch(
            "application status",
            PushNotification {
                title,
                content,
                experience_id: Some(experience_id.to_string()),
                user_ids: Some(vec![user_id.to_string()]),
                rest_path: Some("/".to_string()),
                is_mention: true,
                ..Default::default()
            },
        );
    }

    pub fn notify_payout_issued(
        &self,
        experience_id: &str,
        user_id: &str,
        amount: &BigDecimal,
        currency: &str,
    ) {
        self.dispatch(
            "payout",
            PushNotification {
                title: "Payout Processed!".to_string(),
                content: payout_message(amount, currency),
                experience_id: Some(experience_id.to_string()),
                user_ids: Some(vec![user_id.to_string()]),
                rest_path: Some("/payouts".to_string()),
                is_mention: true,
                ..Default::default()
            },
        );
    }

    /// Admin-facing ping when an affiliate crosses a milestone.
    pub fn notify_milestone(&self, company_team_id: &str, message: &str) {
        self.dispatch(
            "milestone",
            PushNotification {
                title: "Affiliate Milestone Reached!".to_string(),
                content: message.to_string(),
                company_team_id: Some(company_team_id.to_string()),
                rest_path: Some("/earnings".to_string()),
                is_mention: true,
                ..Default::default()
            },
        );
    }
}

pub fn application_status_message(approved: bool) -> (String, String) {
    if approved {
        (
            "Application Approved!".to_string(),
            "Your affiliate application has been approved. Start promoting now!".to_string(),
        )
    } else {
        (
            "Application Update".to_string(),
            "Thank you for your interest in our affiliate program.".to_string(),
        )
    }
}

pub fn payout_message(amount: &BigDecimal, currency: &str) -> String {
    format!(
        "Your commission of {} {} has been paid",
        currency.to_uppercase(),
        amount
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::FromPrimitive;

    #[test]
    fn approval_and_rejection_read_differently() {
        let (approved_title, approved_content) = application_status_message(true);
        let (rejected_title, rejected_content) = application_status_message(false);
        assert!(approved_title.contains("Approved"));
        assert!(approved_content.contains("approved"));
        assert!(!rejected_title.contains("Approved"));
        assert_ne!(approved_content, rejected_content);
    }

    #[test]
    fn payout_message_names_currency_and_amount() {
        let msg = payout_message(&BigDecimal::from_f64(12.5).unwrap(), "usd");
        assert!(msg.contains("USD"));
        assert!(msg.contains("12.5"));
    }
}
