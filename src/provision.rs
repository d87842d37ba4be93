//! The provisioning workflow.
//!
//! Stages run strictly in dependency order; each `?` is the gate that keeps
//! a failed stage's output from ever reaching a later request. No rollback
//! is attempted for resources created before a failure.

use crate::api::ApiClient;
use crate::auth;
use crate::config::Config;
use crate::http::HttpSend;
use crate::prompt::Prompter;
use crate::stages::{self, ObjectStoreOutcome};
use anyhow::Result;

/// Identifiers resolved by one complete run.
#[derive(Debug)]
pub struct ProvisionSummary {
    pub repository: Option<String>,
    pub application_id: String,
    pub registry_secret: Option<String>,
    pub resource_group: String,
    pub scenario_id: String,
    pub object_store: ObjectStoreOutcome,
    pub configuration_id: String,
}

/// Run the full provisioning sequence:
/// authenticate, repository, application (+optional sync), registry secret,
/// resource group, scenario, object store, deployment configuration.
pub fn run(
    transport: &dyn HttpSend,
    config: &Config,
    prompter: &mut dyn Prompter,
) -> Result<ProvisionSummary> {
    let credential = auth::acquire(transport, config)?;
    tracing::debug!(obtained_at = ?credential.obtained_at, "authenticated");
    let client = ApiClient::new(transport, &config.base_url, &credential.access_token);

    let repository = stages::choose_repository(&client, prompter)?;
    let application_id = stages::resolve_application(&client, prompter)?;
    stages::sync_application(&client, prompter, &application_id)?;
    let registry_secret = stages::choose_registry_secret(&client, prompter)?;
    let resource_group = stages::resolve_resource_group(&client, prompter)?;
    let scenario_id = stages::choose_scenario(&client, prompter, &resource_group)?;
    let object_store = stages::ensure_object_store_secret(&client, prompter, &resource_group)?;
    let configuration_id = stages::create_deployment_configuration(
        &client,
        prompter,
        &resource_group,
        &scenario_id,
    )?;

    tracing::info!(
        resource_group = %resource_group,
        scenario_id = %scenario_id,
        configuration_id = %configuration_id,
        "provisioning complete"
    );
    Ok(ProvisionSummary {
        repository,
        application_id,
        registry_secret,
        resource_group,
        scenario_id,
        object_store,
        configuration_id,
    })
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;
