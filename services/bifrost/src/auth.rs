/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
use crate::error::Error;
use crate::WebResult;

use std::sync::Arc;
use vinr_conduit::PlatformClient;
use warp::{
    filters::header::headers_cloned,
    http::header::{HeaderMap, HeaderValue, AUTHORIZATION},
    reject, Filter, Rejection,
};

const BEARER: &str = "Bearer ";

/// Resolve the caller's platform identity token to a user id. Every
/// route sits behind this filter, the per-tenant gates come afterwards
/// in the handlers.
pub fn with_auth(
    platform: Arc<PlatformClient>,
) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    headers_cloned()
        .map(move |headers: HeaderMap<HeaderValue>| (Arc::clone(&platform), headers))
        .and_then(authorize)
}

async fn authorize(
    (platform, headers): (Arc<PlatformClient>, HeaderMap<HeaderValue>),
) -> WebResult<String> {
    let token = match token_from_header(&headers) {
        Ok(token) => token,
        Err(e) => return Err(reject::custom(e)),
    };
    match platform.verify_token(&token).await {
        Ok(user_id) => Ok(user_id),
        Err(e) => Err(reject::custom(Error::Unauthorized(e.to_string()))),
    }
}

fn token_from_header(headers: &HeaderMap<HeaderValue>) -> Result<String, Error> {
    let header = match headers.get(AUTHORIZATION) {
        Some(v) => v,
        None => return Err(Error::NoAuthHeaderError),
    };
    let auth_header = match std::str::from_utf8(header.as_bytes()) {
        Ok(v) => v,
        Err(_) => return Err(Error::NoAuthHeaderError),
    };
    if !auth_header.starts_with(BEARER) {
        return Err(Error::InvalidAuthHeaderError);
    }
    Ok(auth_header.trim_start_matches(BEARER).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok_123"));
        assert_eq!(token_from_header(&headers).unwrap(), "tok_123");
    }

    #[test]
    fn missing_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            token_from_header(&headers),
            Err(Error::NoAuthHeaderError)
        ));
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            token_from_header(&headers),
            Err(Error::InvalidAuthHeaderError)
        ));
    }
}
