/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
pub mod access;
pub mod error;
pub mod notifications;
pub mod payments;
pub mod webhook;

pub use access::*;
pub use error::*;
pub use notifications::*;
pub use payments::*;
pub use webhook::*;

use std::env;

/// Client for the commerce platform's REST API. Identity checks, payment
/// execution, attachment delivery and push notifications are all platform
/// concerns, this crate only speaks to them over HTTP.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl PlatformClient {
    pub fn new(base_url: &str, app_id: &str, api_key: &str) -> PlatformClient {
        PlatformClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_env() -> Result<PlatformClient, ConduitError> {
        Ok(PlatformClient::new(
            &env::var("PLATFORM_API_URL")?,
            &env::var("PLATFORM_APP_ID")?,
            &env::var("PLATFORM_API_KEY")?,
        ))
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        self.base_url.clone() + path
    }

    pub(crate) fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.api_key)
            .header("x-app-id", &self.app_id)
    }

    /// Turn a non-2xx platform response into an Api error with the
    /// response body as message.
    pub(crate) async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ConduitError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ConduitError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
