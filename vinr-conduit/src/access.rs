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

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    NoAccess,
    Customer,
    Admin,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccessResult {
    pub has_access: bool,
    pub access_level: AccessLevel,
}

impl AccessResult {
    pub fn no_access() -> AccessResult {
        AccessResult {
            has_access: false,
            access_level: AccessLevel::NoAccess,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.has_access && self.access_level == AccessLevel::Admin
    }
}

#[derive(Serialize, Debug, Clone)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize, Debug, Clone)]
struct VerifyTokenResponse {
    user_id: Option<String>,
}

impl PlatformClient {
    /// Resolve an identity token from the request headers to a platform
    /// user id. Anything the platform does not accept is Unauthorized.
    pub async fn verify_token(&self, token: &str) -> Result<String, ConduitError> {
        let response = self
            .request(self.http.post(self.endpoint("/v1/tokens/verify")))
            .json(&VerifyTokenRequest { token })
            .send()
            .await
            .map_err(|e| ConduitError::Unauthorized(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConduitError::Unauthorized(format!(
                "token rejected with status {}",
                response.status()
            )));
        }

        let verified = response
            .json::<VerifyTokenResponse>()
            .await
            .map_err(|e| ConduitError::Unauthorized(e.to_string()))?;

        match verified.user_id {
            Some(user_id) => Ok(user_id),
            None => Err(ConduitError::Unauthorized(
                "no user id in token".to_string(),
            )),
        }
    }

    /// Dashboard-side capability lookup. A failed lookup degrades to
    /// no_access instead of erroring, the gates below turn that into a
    /// Forbidden rejection.
    pub async fn check_company_access(
        &self,
        company_id: &str,
        user_id: &str,
    ) -> AccessResult {
        let url = self.endpoint(&format!("/v1/companies/{}/access/{}", company_id, user_id));
        match self.fetch_access(&url).await {
            Ok(access) => access,
            Err(e) => {
                log::error!("error checking company access: {:?}", e.to_string());
                AccessResult::no_access()
            }
        }
    }

    /// Member-side capability lookup, same degradation as the company
    /// check.
    pub async fn check_experience_access(
        &self,
        experience_id: &str,
        user_id: &str,
    ) -> AccessResult {
        let url = self.endpoint(&format!(
            "/v1/experiences/{}/access/{}",
            experience_id, user_id
        ));
        match self.fetch_access(&url).await {
            Ok(access) => access,
            Err(e) => {
                log::error!("error checking experience access: {:?}", e.to_string());
                AccessResult::no_access()
            }
        }
    }

    async fn fetch_access(&self, url: &str) -> Result<AccessResult, ConduitError> {
        let response = self.request(self.http.get(url)).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json::<AccessResult>().await?)
    }

    pub async fn require_company_admin(
        &self,
        company_id: &str,
        user_id: &str,
    ) -> Result<(), ConduitError> {
        let access = self.check_company_access(company_id, user_id).await;
        if !access.is_admin() {
            return Err(ConduitError::Forbidden(
                "Company admin access required".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn require_experience_access(
        &self,
        experience_id: &str,
        user_id: &str,
    ) -> Result<(), ConduitError> {
        let access = self.check_experience_access(experience_id, user_id).await;
        if !access.has_access {
            return Err(ConduitError::Forbidden(
                "Experience access required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_level_parses_platform_values() {
        let access: AccessResult =
            serde_json::from_str(r#"{"has_access":true,"access_level":"admin"}"#).unwrap();
        assert!(access.is_admin());

        let access: AccessResult =
            serde_json::from_str(r#"{"has_access":true,"access_level":"customer"}"#).unwrap();
        assert_eq!(access.access_level, AccessLevel::Customer);
        assert!(!access.is_admin());

        let access: AccessResult =
            serde_json::from_str(r#"{"has_access":false,"access_level":"no_access"}"#).unwrap();
        assert!(!access.has_access);
    }

    #[test]
    fn admin_level_without_access_is_not_admin() {
        let access = AccessResult {
            has_access: false,
            access_level: AccessLevel::Admin,
        };
        assert!(!access.is_admin());
    }
}
