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

use serde::Serialize;

/// One push notification, addressed to all members of an experience, a
/// company team, or a specific set of users within an experience.
#[derive(Serialize, Debug, Clone, Default)]
pub struct PushNotification {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_path: Option<String>,
    pub is_mention: bool,
}

impl PlatformClient {
    pub async fn send_push_notification(
        &self,
        notification: &PushNotification,
    ) -> Result<(), ConduitError> {
        let response = self
            .request(self.http.post(self.endpoint("/v1/notifications/push")))
            .json(notification)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
