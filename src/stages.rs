//! Per-resource provisioning stages.
//!
//! Every stage follows the same protocol: list what exists, let the
//! operator reuse an entry or create a new one, and return the resolved
//! identifier for the next stage. Failures propagate as typed errors; a
//! failed stage's output is never threaded forward.

use crate::api::{
    ApiClient, ConfigurationSpec, NewApplication, ObjectStoreKeys, ObjectStoreSpec, ResourceEntry,
    ResourceKind,
};
use crate::prompt::{input_or, Prompter};
use anyhow::{anyhow, Result};

/// Executable shipped with the demo scenario; offered as the default when
/// the operator does not name one.
pub const DEFAULT_EXECUTABLE_ID: &str = "demo-aicore-anomaly-serving";

const CREATE_APPLICATION: &str = "Create a new application";
const CREATE_RESOURCE_GROUP: &str = "Create a new resource group";
const SKIP_REPOSITORY: &str = "Continue without selecting";
const SYNC_APPLICATION: &str = "Sync the application";
const SKIP_SYNC: &str = "Skip sync";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectStoreOutcome {
    AlreadyExists,
    Created,
}

fn print_entries(kind: ResourceKind, entries: &[ResourceEntry]) {
    if entries.is_empty() {
        println!("No {} entries found.", kind.label());
        return;
    }
    println!("Existing {} entries:", kind.label());
    for entry in entries {
        println!("  - {}", entry.label);
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Show onboarded repositories and let the operator pick one for reference.
/// Nothing downstream depends on the choice.
pub fn choose_repository(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
) -> Result<Option<String>> {
    let entries = client.list(ResourceKind::Repositories, None)?;
    print_entries(ResourceKind::Repositories, &entries);
    if entries.is_empty() {
        return Ok(None);
    }
    let mut choices: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();
    choices.push(SKIP_REPOSITORY.to_string());
    let picked = prompter.select("Choose a repository:", &choices)?;
    if picked == entries.len() {
        return Ok(None);
    }
    tracing::info!(stage = "repository", id = %entries[picked].id, "resolved");
    Ok(Some(entries[picked].id.clone()))
}

/// Resolve an application id, creating the application when asked.
pub fn resolve_application(client: &ApiClient<'_>, prompter: &mut dyn Prompter) -> Result<String> {
    let entries = client.list(ResourceKind::Applications, None)?;
    print_entries(ResourceKind::Applications, &entries);

    let mut choices = vec![CREATE_APPLICATION.to_string()];
    choices.extend(entries.iter().map(|entry| entry.label.clone()));
    let picked = prompter.select("Choose an application:", &choices)?;

    let id = if picked == 0 {
        let spec = NewApplication {
            repository_url: prompter.input("Repository URL")?,
            path: prompter.input("Path (e.g. pipelines)")?,
            application_name: prompter.input("Application name")?,
            revision: input_or(prompter, "Revision", "HEAD")?,
        };
        let id = client.create_application(&spec)?;
        println!("Application created: {id}");
        id
    } else {
        entries[picked - 1].id.clone()
    };
    tracing::info!(stage = "application", id = %id, "resolved");
    Ok(id)
}

/// Show the application detail and offer a sync. Sync issues exactly one
/// refresh POST followed by one status GET, in that order.
pub fn sync_application(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
    id: &str,
) -> Result<()> {
    let detail = client.application_detail(id)?;
    println!("{}", pretty(&detail));

    let choices = vec![SYNC_APPLICATION.to_string(), SKIP_SYNC.to_string()];
    if prompter.select("Choose an option:", &choices)? != 0 {
        tracing::info!(stage = "application", id, "sync skipped");
        return Ok(());
    }
    let message = client.refresh_application(id)?;
    println!("{message}");
    let status = client.application_status(id)?;
    println!("{}", pretty(&status));
    tracing::info!(stage = "application", id, "sync completed");
    Ok(())
}

/// Pick an existing docker registry secret and show its detail. There is no
/// create endpoint for this kind; an empty list is reported and skipped.
pub fn choose_registry_secret(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
) -> Result<Option<String>> {
    let entries = client.list(ResourceKind::RegistrySecrets, None)?;
    print_entries(ResourceKind::RegistrySecrets, &entries);
    if entries.is_empty() {
        return Ok(None);
    }
    let choices: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();
    let picked = prompter.select("Choose a docker registry secret:", &choices)?;
    let name = entries[picked].id.clone();
    let detail = client.registry_secret_detail(&name)?;
    println!("{}", pretty(&detail));
    tracing::info!(stage = "registry-secret", name = %name, "resolved");
    Ok(Some(name))
}

/// Resolve the resource group that scopes every later stage.
pub fn resolve_resource_group(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    let entries = client.list(ResourceKind::ResourceGroups, None)?;
    print_entries(ResourceKind::ResourceGroups, &entries);

    let mut choices = vec![CREATE_RESOURCE_GROUP.to_string()];
    choices.extend(entries.iter().map(|entry| entry.label.clone()));
    let picked = prompter.select("Choose a resource group:", &choices)?;

    let id = if picked == 0 {
        let name = prompter.input("Resource group name")?;
        let id = client.create_resource_group(&name)?;
        println!("Resource group created: {id}");
        id
    } else {
        entries[picked - 1].id.clone()
    };
    tracing::info!(stage = "resource-group", id = %id, "resolved");
    Ok(id)
}

/// Pick a scenario from the group-scoped list. Scenarios are read-only;
/// an empty list leaves nothing to deploy.
pub fn choose_scenario(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
    resource_group: &str,
) -> Result<String> {
    let entries = client.list(ResourceKind::Scenarios, Some(resource_group))?;
    if entries.is_empty() {
        return Err(anyhow!(
            "no scenarios available in resource group {resource_group}"
        ));
    }
    let choices: Vec<String> = entries
        .iter()
        .map(|entry| format!("{} ({})", entry.label, entry.id))
        .collect();
    let picked = prompter.select("Choose a scenario:", &choices)?;
    let id = entries[picked].id.clone();
    tracing::info!(stage = "scenario", id = %id, "resolved");
    Ok(id)
}

/// Ensure the resource group holds an object-store secret. A group holds at
/// most one, so an existing secret short-circuits without any prompt.
pub fn ensure_object_store_secret(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
    resource_group: &str,
) -> Result<ObjectStoreOutcome> {
    if client.object_store_exists(resource_group)? {
        println!("Object store secret already exists.");
        tracing::info!(stage = "object-store", "already exists");
        return Ok(ObjectStoreOutcome::AlreadyExists);
    }
    let spec = ObjectStoreSpec {
        name: "default".to_string(),
        store_type: "S3".to_string(),
        bucket: prompter.input("S3 bucket name")?,
        endpoint: prompter.input("S3 endpoint")?,
        path_prefix: prompter.input("Path prefix")?,
        region: prompter.input("S3 region")?,
        data: ObjectStoreKeys {
            access_key_id: prompter.input("AWS_ACCESS_KEY_ID")?,
            secret_access_key: prompter.input("AWS_SECRET_ACCESS_KEY")?,
        },
    };
    client.create_object_store_secret(resource_group, &spec)?;
    println!("Object store secret added.");
    tracing::info!(stage = "object-store", "created");
    Ok(ObjectStoreOutcome::Created)
}

/// Create the deployment configuration binding the chosen scenario.
pub fn create_deployment_configuration(
    client: &ApiClient<'_>,
    prompter: &mut dyn Prompter,
    resource_group: &str,
    scenario_id: &str,
) -> Result<String> {
    let spec = ConfigurationSpec {
        name: prompter.input("Configuration name")?,
        executable_id: input_or(prompter, "Executable id", DEFAULT_EXECUTABLE_ID)?,
        scenario_id: scenario_id.to_string(),
        input_artifact_bindings: Vec::new(),
        parameter_bindings: Vec::new(),
    };
    let id = client.create_configuration(resource_group, &spec)?;
    tracing::info!(stage = "configuration", id = %id, "created");
    Ok(id)
}

#[cfg(test)]
#[path = "stages_tests.rs"]
mod tests;
