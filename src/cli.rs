//! CLI argument parsing.
//!
//! The CLI stays thin: commands route to the workflow modules without
//! embedding any provisioning policy here.
use clap::{Parser, Subcommand};

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "aicd",
    version,
    about = "Provision AI Core deployment resources and ship container images",
    after_help = "Examples:\n  aicd provision\n  aicd images --namespace myorg\n  aicd ship --script 'python3 update_image.py' --file-path serve.yaml",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Provision(ProvisionArgs),
    Images(ImagesArgs),
    Ship(ShipArgs),
}

/// Interactive provisioning run against the configured tenant.
#[derive(Parser, Debug)]
#[command(about = "Provision a deployment configuration step by step")]
pub struct ProvisionArgs {}

/// List container images for a Docker Hub namespace.
#[derive(Parser, Debug)]
#[command(about = "List repo:tag images for a Docker Hub namespace")]
pub struct ImagesArgs {
    /// Namespace to enumerate (overrides DOCKERHUB_NAMESPACE)
    #[arg(long, value_name = "NS")]
    pub namespace: Option<String>,
}

/// Pick an image and hand it to the manifest-update command.
#[derive(Parser, Debug)]
#[command(about = "Run the manifest-update command with a chosen image tag")]
pub struct ShipArgs {
    /// Command to run, split shell-style (e.g. "python3 update_image.py")
    #[arg(long, value_name = "CMD")]
    pub script: String,

    /// Image tag to ship; skips enumeration and prompting when given
    #[arg(long, value_name = "REPO:TAG")]
    pub image: Option<String>,

    /// Manifest path forwarded to the command as --file-path
    #[arg(long, value_name = "PATH")]
    pub file_path: Option<String>,

    /// Namespace to enumerate (overrides DOCKERHUB_NAMESPACE)
    #[arg(long, value_name = "NS")]
    pub namespace: Option<String>,
}
