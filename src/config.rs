//! Process configuration resolved once at startup.
//!
//! Environment is read here and nowhere else; everything below `main`
//! receives an explicit config value.

use anyhow::{anyhow, Result};
use std::env;

/// Connection settings for the AI Core tenant.
#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            client_id: require("AICORE_CLIENT_ID")?,
            client_secret: require("AICORE_CLIENT_SECRET")?,
            auth_url: require("AICORE_AUTH_URL")?,
            base_url: require("AICORE_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Docker Hub settings for image enumeration. Credentials are optional;
/// without them listing proceeds anonymously.
#[derive(Clone, Debug, Default)]
pub struct HubConfig {
    pub namespace: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl HubConfig {
    pub fn from_env() -> Self {
        HubConfig {
            namespace: optional("DOCKERHUB_NAMESPACE"),
            username: optional("DOCKERHUB_USERNAME"),
            password: optional("DOCKERHUB_PASSWORD"),
        }
    }
}

fn require(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| anyhow!("environment variable {name} is not set"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_missing_and_blank_values() {
        env::remove_var("AICD_TEST_REQUIRE_MISSING");
        assert!(require("AICD_TEST_REQUIRE_MISSING").is_err());

        env::set_var("AICD_TEST_REQUIRE_BLANK", "   ");
        assert!(require("AICD_TEST_REQUIRE_BLANK").is_err());
        env::remove_var("AICD_TEST_REQUIRE_BLANK");
    }

    #[test]
    fn optional_returns_trimmed_presence_only() {
        env::set_var("AICD_TEST_OPTIONAL_SET", "value");
        assert_eq!(
            optional("AICD_TEST_OPTIONAL_SET"),
            Some("value".to_string())
        );
        env::remove_var("AICD_TEST_OPTIONAL_SET");
        assert_eq!(optional("AICD_TEST_OPTIONAL_SET"), None);
    }
}
