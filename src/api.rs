//! AI Core admin/lifecycle API client.
//!
//! Listing normalizes every kind to an `{id, label}` pair; the kind-specific
//! field names (`name`, `applicationName`, `resourceGroupId`, ...) live only
//! in the serde records here. Creation failures come back as values so the
//! workflow can report the remote status and body and stop.

use crate::http::{HttpRequest, HttpResponse, HttpSend};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const RESOURCE_GROUP_HEADER: &str = "AI-Resource-Group";

/// Default label attached to resource groups created by this tool.
pub const DEFAULT_GROUP_LABEL_KEY: &str = "ext.ai.sap.com/my-label";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Repositories,
    Applications,
    RegistrySecrets,
    ResourceGroups,
    Scenarios,
    ObjectStoreSecrets,
    Configurations,
}

impl ResourceKind {
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Repositories => "v2/admin/repositories",
            ResourceKind::Applications => "v2/admin/applications",
            ResourceKind::RegistrySecrets => "v2/admin/dockerRegistrySecrets",
            ResourceKind::ResourceGroups => "v2/admin/resourceGroups",
            ResourceKind::Scenarios => "v2/lm/scenarios",
            ResourceKind::ObjectStoreSecrets => "v2/admin/objectStoreSecrets",
            ResourceKind::Configurations => "v2/lm/configurations",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Repositories => "repository",
            ResourceKind::Applications => "application",
            ResourceKind::RegistrySecrets => "docker registry secret",
            ResourceKind::ResourceGroups => "resource group",
            ResourceKind::Scenarios => "scenario",
            ResourceKind::ObjectStoreSecrets => "object store secret",
            ResourceKind::Configurations => "deployment configuration",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remote failures, with the offending status and body carried verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("token request failed ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("listing {kind} failed ({status}): {body}")]
    List {
        kind: ResourceKind,
        status: u16,
        body: String,
    },
    #[error("creating {kind} failed ({status}): {body}")]
    Creation {
        kind: ResourceKind,
        status: u16,
        body: String,
    },
    #[error("{0}")]
    Transport(anyhow::Error),
}

/// A listed resource reduced to the identifier later stages thread forward
/// plus a human-facing label for menus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    pub id: String,
    pub label: String,
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<T>,
}

#[derive(Deserialize)]
struct NamedRecord {
    name: String,
}

#[derive(Deserialize)]
struct ApplicationRecord {
    #[serde(rename = "applicationName")]
    application_name: String,
}

#[derive(Deserialize)]
struct ResourceGroupRecord {
    #[serde(rename = "resourceGroupId")]
    resource_group_id: String,
}

#[derive(Deserialize)]
struct ScenarioRecord {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct CountEnvelope {
    #[serde(default)]
    count: u64,
}

#[derive(Deserialize)]
struct CreatedId {
    id: String,
}

#[derive(Deserialize)]
struct CreatedGroup {
    #[serde(rename = "resourceGroupId")]
    resource_group_id: String,
}

#[derive(Deserialize)]
struct RefreshMessage {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub repository_url: String,
    pub revision: String,
    pub path: String,
    pub application_name: String,
}

#[derive(Debug, Serialize)]
pub struct ObjectStoreSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub store_type: String,
    pub bucket: String,
    pub endpoint: String,
    #[serde(rename = "pathPrefix")]
    pub path_prefix: String,
    pub region: String,
    pub data: ObjectStoreKeys,
}

#[derive(Debug, Serialize)]
pub struct ObjectStoreKeys {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpec {
    pub name: String,
    pub executable_id: String,
    pub scenario_id: String,
    pub input_artifact_bindings: Vec<serde_json::Value>,
    pub parameter_bindings: Vec<serde_json::Value>,
}

/// Bearer-authenticated client scoped to one tenant base URL.
pub struct ApiClient<'a> {
    transport: &'a dyn HttpSend,
    base_url: String,
    token: String,
}

impl<'a> ApiClient<'a> {
    pub fn new(transport: &'a dyn HttpSend, base_url: &str, access_token: &str) -> Self {
        ApiClient {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: access_token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.send(&request).map_err(ApiError::Transport)
    }

    fn get(&self, path: &str, resource_group: Option<&str>) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::get(self.url(path)).header("Authorization", self.bearer());
        if let Some(group) = resource_group {
            request = request.header(RESOURCE_GROUP_HEADER, group);
        }
        self.send(request)
    }

    fn get_listed(
        &self,
        kind: ResourceKind,
        path: &str,
        resource_group: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let response = self.get(path, resource_group)?;
        if !response.is_success() {
            return Err(ApiError::List {
                kind,
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    fn post_json(
        &self,
        kind: ResourceKind,
        path: &str,
        resource_group: Option<&str>,
        payload: &impl Serialize,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::post(self.url(path)).header("Authorization", self.bearer());
        if let Some(group) = resource_group {
            request = request.header(RESOURCE_GROUP_HEADER, group);
        }
        let request = request.json(payload).map_err(ApiError::Transport)?;
        let response = self.send(request)?;
        if !response.is_success() {
            return Err(ApiError::Creation {
                kind,
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    fn parse<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
        response.json().map_err(ApiError::Transport)
    }

    /// List resources of a kind as normalized `{id, label}` entries.
    ///
    /// Scenarios require a resource group; other kinds ignore it.
    pub fn list(
        &self,
        kind: ResourceKind,
        resource_group: Option<&str>,
    ) -> Result<Vec<ResourceEntry>, ApiError> {
        if matches!(
            kind,
            ResourceKind::ObjectStoreSecrets | ResourceKind::Configurations
        ) {
            return Err(ApiError::Transport(anyhow::anyhow!(
                "{kind} entries are not listable"
            )));
        }
        let response = self.get_listed(kind, kind.path(), resource_group)?;
        let entries = match kind {
            ResourceKind::Repositories | ResourceKind::RegistrySecrets => {
                let listed: ListEnvelope<NamedRecord> = Self::parse(&response)?;
                listed
                    .resources
                    .into_iter()
                    .map(|record| ResourceEntry {
                        id: record.name.clone(),
                        label: record.name,
                    })
                    .collect()
            }
            ResourceKind::Applications => {
                let listed: ListEnvelope<ApplicationRecord> = Self::parse(&response)?;
                listed
                    .resources
                    .into_iter()
                    .map(|record| ResourceEntry {
                        id: record.application_name.clone(),
                        label: record.application_name,
                    })
                    .collect()
            }
            ResourceKind::ResourceGroups => {
                let listed: ListEnvelope<ResourceGroupRecord> = Self::parse(&response)?;
                listed
                    .resources
                    .into_iter()
                    .map(|record| ResourceEntry {
                        id: record.resource_group_id.clone(),
                        label: record.resource_group_id,
                    })
                    .collect()
            }
            ResourceKind::Scenarios => {
                let listed: ListEnvelope<ScenarioRecord> = Self::parse(&response)?;
                listed
                    .resources
                    .into_iter()
                    .map(|record| ResourceEntry {
                        id: record.id,
                        label: record.name,
                    })
                    .collect()
            }
            ResourceKind::ObjectStoreSecrets | ResourceKind::Configurations => Vec::new(),
        };
        tracing::debug!(kind = kind.label(), count = entries.len(), "listed resources");
        Ok(entries)
    }

    /// Whether the resource group already holds an object-store secret.
    /// A group holds at most one, so only the count is inspected.
    pub fn object_store_exists(&self, resource_group: &str) -> Result<bool, ApiError> {
        let response = self.get_listed(
            ResourceKind::ObjectStoreSecrets,
            ResourceKind::ObjectStoreSecrets.path(),
            Some(resource_group),
        )?;
        let counted: CountEnvelope = Self::parse(&response)?;
        Ok(counted.count != 0)
    }

    pub fn application_detail(&self, id: &str) -> Result<serde_json::Value, ApiError> {
        let path = format!("{}/{}", ResourceKind::Applications.path(), id);
        let response = self.get_listed(ResourceKind::Applications, &path, None)?;
        Self::parse(&response)
    }

    /// Trigger a sync of the application and return the remote message.
    pub fn refresh_application(&self, id: &str) -> Result<String, ApiError> {
        let path = format!("{}/{}/refresh", ResourceKind::Applications.path(), id);
        let request =
            HttpRequest::post(self.url(&path)).header("Authorization", self.bearer());
        let response = self.send(request)?;
        if !response.is_success() {
            return Err(ApiError::Creation {
                kind: ResourceKind::Applications,
                status: response.status,
                body: response.body,
            });
        }
        let message: RefreshMessage = Self::parse(&response)?;
        Ok(message.message)
    }

    pub fn application_status(&self, id: &str) -> Result<serde_json::Value, ApiError> {
        let path = format!("{}/{}/status", ResourceKind::Applications.path(), id);
        let response = self.get_listed(ResourceKind::Applications, &path, None)?;
        Self::parse(&response)
    }

    pub fn registry_secret_detail(&self, name: &str) -> Result<serde_json::Value, ApiError> {
        let path = format!("{}/{}", ResourceKind::RegistrySecrets.path(), name);
        let response = self.get_listed(ResourceKind::RegistrySecrets, &path, None)?;
        Self::parse(&response)
    }

    pub fn create_application(&self, spec: &NewApplication) -> Result<String, ApiError> {
        let response = self.post_json(
            ResourceKind::Applications,
            ResourceKind::Applications.path(),
            None,
            spec,
        )?;
        let created: CreatedId = Self::parse(&response)?;
        Ok(created.id)
    }

    pub fn create_resource_group(&self, name: &str) -> Result<String, ApiError> {
        let payload = serde_json::json!({
            "resourceGroupId": name,
            "labels": [{ "key": DEFAULT_GROUP_LABEL_KEY, "value": "string" }],
        });
        let response = self.post_json(
            ResourceKind::ResourceGroups,
            ResourceKind::ResourceGroups.path(),
            None,
            &payload,
        )?;
        let created: CreatedGroup = Self::parse(&response)?;
        Ok(created.resource_group_id)
    }

    pub fn create_object_store_secret(
        &self,
        resource_group: &str,
        spec: &ObjectStoreSpec,
    ) -> Result<(), ApiError> {
        self.post_json(
            ResourceKind::ObjectStoreSecrets,
            ResourceKind::ObjectStoreSecrets.path(),
            Some(resource_group),
            spec,
        )?;
        Ok(())
    }

    pub fn create_configuration(
        &self,
        resource_group: &str,
        spec: &ConfigurationSpec,
    ) -> Result<String, ApiError> {
        let response = self.post_json(
            ResourceKind::Configurations,
            ResourceKind::Configurations.path(),
            Some(resource_group),
            spec,
        )?;
        let created: CreatedId = Self::parse(&response)?;
        Ok(created.id)
    }
}
