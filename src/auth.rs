//! OAuth2 client-credentials token exchange.

use crate::api::ApiError;
use crate::config::Config;
use crate::http::{HttpRequest, HttpSend};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use std::time::SystemTime;

/// A bearer credential valid for the duration of one run. Fetched once;
/// no expiry handling (runs are short-lived operator sessions).
#[derive(Debug)]
pub struct Credential {
    pub access_token: String,
    pub obtained_at: SystemTime,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Token endpoint derived from the configured authorization URL.
pub fn token_url(auth_url: &str) -> String {
    format!("{}/oauth/token", auth_url.trim_end_matches('/'))
}

fn basic_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

/// Exchange client credentials for a bearer token.
///
/// A non-success status surfaces the remote status and body verbatim as
/// [`ApiError::Auth`]; nothing downstream can run without a credential.
pub fn acquire(transport: &dyn HttpSend, config: &Config) -> Result<Credential, ApiError> {
    let request = HttpRequest::post(token_url(&config.auth_url))
        .header(
            "Authorization",
            basic_header(&config.client_id, &config.client_secret),
        )
        .form(&[("grant_type", "client_credentials")]);
    let response = transport.send(&request).map_err(ApiError::Transport)?;
    if !response.is_success() {
        return Err(ApiError::Auth {
            status: response.status,
            body: response.body,
        });
    }
    let token: TokenResponse = response.json().map_err(ApiError::Transport)?;
    tracing::info!("access token acquired");
    Ok(Credential {
        access_token: token.access_token,
        obtained_at: SystemTime::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeTransport;
    use crate::http::RequestBody;
    use serde_json::json;

    fn test_config() -> Config {
        Config {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            auth_url: "https://auth.test///".to_string(),
            base_url: "https://api.test".to_string(),
        }
    }

    #[test]
    fn token_url_strips_trailing_slashes() {
        assert_eq!(token_url("https://a.test"), "https://a.test/oauth/token");
        assert_eq!(token_url("https://a.test///"), "https://a.test/oauth/token");
    }

    #[test]
    fn basic_header_encodes_colon_joined_pair() {
        // "id:secret" in base64
        assert_eq!(basic_header("id", "secret"), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn acquire_sends_form_encoded_grant() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({ "access_token": "tok-9" }));
        let credential = acquire(&transport, &test_config()).unwrap();
        assert_eq!(credential.access_token, "tok-9");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://auth.test/oauth/token");
        assert_eq!(
            requests[0].header_value("Authorization"),
            Some("Basic aWQ6c2VjcmV0")
        );
        match &requests[0].body {
            RequestBody::Form(pairs) => {
                assert_eq!(
                    pairs,
                    &[("grant_type".to_string(), "client_credentials".to_string())]
                );
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn acquire_surfaces_remote_failure_verbatim() {
        let transport = FakeTransport::new();
        transport.push(401, "invalid client");
        let err = acquire(&transport, &test_config()).unwrap_err();
        match err {
            ApiError::Auth { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid client");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
