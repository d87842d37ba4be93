//! Docker Hub image enumeration.
//!
//! Walks the paginated repository and tag listings for one namespace and
//! flattens them into a sorted `repo:tag` list. Login is optional; a failed
//! login downgrades to anonymous listing with a warning.

use crate::config::HubConfig;
use crate::http::{HttpRequest, HttpSend};
use anyhow::{anyhow, Result};
use serde::Deserialize;

pub const DOCKER_HUB: &str = "https://hub.docker.com";

const PAGE_SIZE: u32 = 100;

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    results: Vec<NamedResult>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct NamedResult {
    name: String,
}

pub struct HubLister<'a> {
    transport: &'a dyn HttpSend,
    hub_url: String,
}

impl<'a> HubLister<'a> {
    pub fn new(transport: &'a dyn HttpSend, hub_url: &str) -> Self {
        HubLister {
            transport,
            hub_url: hub_url.trim_end_matches('/').to_string(),
        }
    }

    fn login(&self, username: &str, password: &str) -> Result<String> {
        let request = HttpRequest::post(format!("{}/v2/users/login", self.hub_url)).json(
            &serde_json::json!({ "username": username, "password": password }),
        )?;
        let response = self.transport.send(&request)?;
        if !response.is_success() {
            return Err(anyhow!(
                "Docker Hub login failed ({}): {}",
                response.status,
                response.body
            ));
        }
        let login: LoginResponse = response.json()?;
        Ok(login.token)
    }

    /// Collect `name` fields across all pages, following `next` links.
    fn page_names(&self, first_url: String, jwt: Option<&str>) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next = Some(first_url);
        while let Some(url) = next {
            let mut request = HttpRequest::get(&url).header("Accept", "application/json");
            if let Some(token) = jwt {
                request = request.header("Authorization", format!("JWT {token}"));
            }
            let response = self.transport.send(&request)?;
            if !response.is_success() {
                return Err(anyhow!(
                    "request failed ({}) for {url}: {}",
                    response.status,
                    response.body
                ));
            }
            let page: Page = response.json()?;
            names.extend(page.results.into_iter().map(|result| result.name));
            next = page.next;
        }
        Ok(names)
    }

    /// Enumerate every `repo:tag` in the namespace, sorted.
    pub fn list_images(&self, config: &HubConfig) -> Result<Vec<String>> {
        let namespace = config
            .namespace
            .as_deref()
            .ok_or_else(|| anyhow!("set DOCKERHUB_NAMESPACE or pass --namespace"))?;

        let jwt = match (config.username.as_deref(), config.password.as_deref()) {
            (Some(username), Some(password)) => match self.login(username, password) {
                Ok(token) => Some(token),
                Err(err) => {
                    tracing::warn!(%err, "Docker Hub login failed, listing anonymously");
                    None
                }
            },
            _ => None,
        };

        let repos = self.page_names(
            format!(
                "{}/v2/repositories/{namespace}/?page_size={PAGE_SIZE}",
                self.hub_url
            ),
            jwt.as_deref(),
        )?;

        let mut images = Vec::new();
        for repo in &repos {
            let tags = self.page_names(
                format!(
                    "{}/v2/repositories/{namespace}/{repo}/tags?page_size={PAGE_SIZE}",
                    self.hub_url
                ),
                jwt.as_deref(),
            )?;
            images.extend(tags.into_iter().map(|tag| format!("{repo}:{tag}")));
        }
        images.sort();
        tracing::info!(namespace, count = images.len(), "enumerated images");
        Ok(images)
    }
}
