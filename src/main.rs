/// iksctl - IBM Cloud Kubernetes Service automation
///
/// Prints one JSON result document per run on stdout, Ansible-module style,
/// and exits non-zero when the run failed.
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iksctl::config::Config;
use iksctl::iam::{ApiKey, BearerToken, API_KEY_ENV, IAM_TOKEN_ENV};
use iksctl::iks::{AlbType, ClusterClient, WorkerAction, WorkerClient, WorkerCommand};
use iksctl::ops::{self, ClusterInfoParams, Credentials, ModuleResult, NodeReloader, ReloadMode};

#[derive(Parser)]
#[command(name = "iksctl")]
#[command(about = "Query and operate IBM Cloud Kubernetes Service clusters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "iksctl.yaml")]
    config: PathBuf,

    /// IBM Cloud API key (falls back to IC_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report cluster details, worker pools, workers, ALBs and bound services
    ClusterInfo {
        /// Name or ID of the cluster
        #[arg(long)]
        name: String,

        /// Type of ALBs to report
        #[arg(long, value_enum, default_value_t = AlbType::All)]
        alb_type: AlbType,

        /// ID of the resource group the cluster is in
        #[arg(long)]
        resource_group_id: Option<String>,

        /// Whether to list the services bound to the cluster
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        list_bound_services: bool,
    },

    /// Report a single worker node
    WorkerInfo {
        /// Name or ID of the cluster
        #[arg(long)]
        name: String,

        /// ID of the worker
        #[arg(long)]
        worker_id: String,

        /// ID of the resource group the cluster is in
        #[arg(long)]
        resource_group_id: Option<String>,
    },

    /// Reboot, reload or update a worker node
    WorkerUpdate {
        /// Name or ID of the cluster
        #[arg(long)]
        name: String,

        /// ID of the worker
        #[arg(long)]
        worker_id: String,

        /// ID of the resource group the cluster is in
        #[arg(long)]
        resource_group_id: Option<String>,

        /// Action to perform on the worker node
        #[arg(long, value_enum)]
        action: WorkerAction,

        /// Ignore an unavailable master during os_reboot and reload
        #[arg(long, action = ArgAction::Set, required = true)]
        force: bool,
    },

    /// Reload worker nodes and optionally wait for them to become Ready
    NodeReload {
        /// Node operation
        #[arg(long, value_enum)]
        mode: ReloadMode,

        /// Name or ID of the cluster
        #[arg(long)]
        name: String,

        /// Worker to reload in single mode
        #[arg(long)]
        worker_id: Option<String>,
    },

    /// Generate example configuration file
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the result document, logs go to stderr
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("iksctl={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Error: {:#}", e);
            let failure = ModuleResult::<()>::fail(format!("{:#}", e), Value::Null);
            if let Ok(doc) = serde_json::to_string_pretty(&failure) {
                println!("{}", doc);
            }
            std::process::exit(1);
        }
    }
}

/// Run the selected command; `Ok(false)` means the module reported a failure
async fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Init => init_config(cli).await,
        Commands::ClusterInfo {
            name,
            alb_type,
            resource_group_id,
            list_bound_services,
        } => {
            if let Some(rg) = resource_group_id {
                debug!("Cluster queries are not scoped, ignoring resource group {}", rg);
            }
            let config = load_config(cli)?;
            let client = ops::connect(&config, &api_key_credentials(cli)?)
                .await
                .context("Failed to connect to IBM Cloud")?;
            let cluster = ClusterClient::new(client, name.as_str());
            let params = ClusterInfoParams {
                alb_type: *alb_type,
                list_bound_services: *list_bound_services,
            };
            emit(&ops::cluster_info(&cluster, &params).await?)
        }
        Commands::WorkerInfo {
            name,
            worker_id,
            resource_group_id,
        } => {
            let config = load_config(cli)?;
            let client = ops::connect(&config, &api_key_credentials(cli)?)
                .await
                .context("Failed to connect to IBM Cloud")?;
            let worker = WorkerClient::new(client, name.as_str(), worker_id.as_str())
                .with_resource_group(resource_group_id.clone());
            emit(&ops::worker_info(&worker).await?)
        }
        Commands::WorkerUpdate {
            name,
            worker_id,
            resource_group_id,
            action,
            force,
        } => {
            let config = load_config(cli)?;
            let client = ops::connect(&config, &api_key_credentials(cli)?)
                .await
                .context("Failed to connect to IBM Cloud")?;
            let worker = WorkerClient::new(client, name.as_str(), worker_id.as_str())
                .with_resource_group(resource_group_id.clone());
            let command = WorkerCommand::new(*action, *force);
            emit(&ops::update_worker(&worker, &command).await?)
        }
        Commands::NodeReload {
            mode,
            name,
            worker_id,
        } => {
            let config = load_config(cli)?;
            let credentials = match non_empty_env(IAM_TOKEN_ENV) {
                Some(token) => Credentials::Token(BearerToken::new(token)),
                None => api_key_credentials(cli)?,
            };
            let client = ops::connect(&config, &credentials)
                .await
                .context("Failed to connect to IBM Cloud")?;
            let reloader = NodeReloader::new(client, name.as_str(), config.reload.clone());
            emit(&reloader.run(*mode, worker_id.as_deref()).await?)
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load_or_default(&cli.config).context("Failed to load configuration")
}

/// Resolve the API key once, here, from the flag or IC_API_KEY
fn api_key_credentials(cli: &Cli) -> Result<Credentials> {
    let key = ApiKey::resolve(cli.api_key.clone(), std::env::var(API_KEY_ENV).ok())?;
    Ok(Credentials::ApiKey(key))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Print the result document; returns whether the module succeeded
fn emit<T: Serialize>(result: &ModuleResult<T>) -> Result<bool> {
    let doc = serde_json::to_string_pretty(result).context("Failed to encode result")?;
    println!("{}", doc);
    Ok(!result.is_failed())
}

#[derive(Serialize)]
struct InitResult {
    path: PathBuf,
}

/// Write the example configuration, refusing to overwrite an existing file
async fn init_config(cli: &Cli) -> Result<bool> {
    if cli.config.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}",
            cli.config.display()
        );
    }

    let example = Config::example();
    example.validate()?;
    let yaml = serde_yaml::to_string(&example).context("Failed to encode configuration")?;
    tokio::fs::write(&cli.config, yaml)
        .await
        .context("Failed to write configuration file")?;

    info!(
        "Wrote {}; the API key is read from --api-key or {}",
        cli.config.display(),
        API_KEY_ENV
    );
    emit(&ModuleResult::exit(
        true,
        InitResult {
            path: cli.config.clone(),
        },
    ))
}
