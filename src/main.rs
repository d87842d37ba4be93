use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod auth;
mod cli;
mod config;
mod http;
mod images;
mod prompt;
mod provision;
mod ship;
mod stages;

use cli::{Command, ImagesArgs, ProvisionArgs, RootArgs, ShipArgs};
use config::{Config, HubConfig};
use http::UreqTransport;
use images::{HubLister, DOCKER_HUB};
use prompt::{Prompter, TerminalPrompter};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Provision(args) => cmd_provision(args),
        Command::Images(args) => cmd_images(args),
        Command::Ship(args) => cmd_ship(args),
    }
}

fn cmd_provision(_args: ProvisionArgs) -> Result<()> {
    let config = Config::from_env()?;
    let transport = UreqTransport::new();
    let mut prompter = TerminalPrompter;

    let summary = provision::run(&transport, &config, &mut prompter)?;
    println!("Provisioning complete:");
    if let Some(repository) = &summary.repository {
        println!("  repository:      {repository}");
    }
    println!("  application:     {}", summary.application_id);
    if let Some(secret) = &summary.registry_secret {
        println!("  registry secret: {secret}");
    }
    println!("  resource group:  {}", summary.resource_group);
    println!("  scenario:        {}", summary.scenario_id);
    println!(
        "  object store:    {}",
        match summary.object_store {
            stages::ObjectStoreOutcome::AlreadyExists => "already present",
            stages::ObjectStoreOutcome::Created => "created",
        }
    );
    println!("  configuration:   {}", summary.configuration_id);
    Ok(())
}

fn cmd_images(args: ImagesArgs) -> Result<()> {
    let transport = UreqTransport::new();
    let mut hub = HubConfig::from_env();
    if args.namespace.is_some() {
        hub.namespace = args.namespace;
    }

    let images = HubLister::new(&transport, DOCKER_HUB).list_images(&hub)?;
    if images.is_empty() {
        println!("No images found for the given namespace.");
        return Ok(());
    }
    for image in images {
        println!("{image}");
    }
    Ok(())
}

fn cmd_ship(args: ShipArgs) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let image = match args.image {
        Some(image) => image,
        None => resolve_image(&args.namespace, &mut prompter)?,
    };

    println!("Updating manifest with image: {image}");
    let output = ship::run_update_script(&args.script, &image, args.file_path.as_deref())?;
    if !output.stdout.trim().is_empty() {
        println!("{}", output.stdout.trim());
    }
    if !output.stderr.trim().is_empty() {
        eprintln!("{}", output.stderr.trim());
    }
    if !output.success() {
        return Err(anyhow!("update command exited with code {}", output.exit_code));
    }
    println!("Image update completed.");
    Ok(())
}

/// Enumerate the namespace and let the operator pick an image; fall back to
/// free-text entry when enumeration fails.
fn resolve_image(namespace: &Option<String>, prompter: &mut dyn Prompter) -> Result<String> {
    let transport = UreqTransport::new();
    let mut hub = HubConfig::from_env();
    if namespace.is_some() {
        hub.namespace = namespace.clone();
    }

    match HubLister::new(&transport, DOCKER_HUB).list_images(&hub) {
        Ok(images) if !images.is_empty() => {
            let picked = prompter.select("Choose an image:", &images)?;
            Ok(images[picked].clone())
        }
        Ok(_) => Err(anyhow!("no images found for the given namespace")),
        Err(err) => {
            tracing::warn!(%err, "image enumeration failed");
            prompter.input("Image tag (repo:tag)")
        }
    }
}
