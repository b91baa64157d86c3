// Patchbay - multi-backend code-improvement pipeline
// Main entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use patchbay::config::constants::HISTORY_FILE;
use patchbay::config::{load_config, Config, FailurePolicy};
use patchbay::context::ContextCollector;
use patchbay::inference::OpenRouterClient;
use patchbay::patch::Quarantine;
use patchbay::pipeline::{history, CredentialSource, EnvCredentials, Orchestrator};
use patchbay::prompt;
use patchbay::vcs::{GitCli, Vcs};

#[derive(Parser)]
#[command(name = "patchbay", version, about = "Ask specialist models for patches and apply them")]
struct Cli {
    /// Repository to operate on (any path inside it)
    #[arg(long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Configuration file (default: <repo>/.opencode/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every configured profile once
    Run {
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        /// Override the configured inference failure policy
        #[arg(long, value_enum)]
        policy: Option<FailurePolicy>,

        /// Do not list working-tree changes afterwards
        #[arg(long)]
        no_status: bool,
    },
    /// List profiles and whether their credentials are set
    Profiles,
    /// Print the prompt a profile would receive, without calling it
    Prompt {
        /// Profile identity, e.g. deepseek/deepseek-r1-0528
        profile: String,
    },
    /// List quarantined diffs
    Quarantine,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "patchbay=debug" } else { "patchbay=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run {
            json,
            policy,
            no_status,
        } => {
            let git = GitCli::discover(&cli.repo).await?;
            let mut config = load_config(git.root(), cli.config.as_deref())?;
            if let Some(policy) = policy {
                config.failure_policy = policy;
            }
            if no_status {
                config.show_status = false;
            }
            run(&config, &git, json).await
        }
        Command::Profiles => {
            let root = config_root(&cli.repo).await;
            let config = load_config(&root, cli.config.as_deref())?;
            list_profiles(&config, &EnvCredentials);
            Ok(())
        }
        Command::Prompt { profile } => {
            let git = GitCli::discover(&cli.repo).await?;
            let config = load_config(git.root(), cli.config.as_deref())?;
            print_prompt(&config, &git, &profile).await
        }
        Command::Quarantine => {
            let git = GitCli::discover(&cli.repo).await?;
            let config = load_config(git.root(), cli.config.as_deref())?;
            list_quarantine(&config, &git)
        }
    }
}

/// Where to look for the repository config: the enclosing git root when there
/// is one, otherwise `start` itself.
async fn config_root(start: &Path) -> PathBuf {
    match GitCli::discover(start).await {
        Ok(git) => git.root().to_path_buf(),
        Err(e) => {
            tracing::debug!("No repository around {}: {:#}", start.display(), e);
            start.to_path_buf()
        }
    }
}

async fn run(config: &Config, git: &GitCli, json: bool) -> Result<()> {
    let client = OpenRouterClient::new(config)?;
    let orchestrator = Orchestrator::new(config, git, &client, &EnvCredentials);

    let report = orchestrator.run().await?;

    if let Err(e) = history::append_run(&git.root().join(HISTORY_FILE), &report) {
        tracing::warn!("Failed to record run history: {:#}", e);
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?
        );
    } else {
        println!("{}", report);
    }

    Ok(())
}

fn list_profiles(config: &Config, credentials: &dyn CredentialSource) {
    for (idx, profile) in config.profiles.iter().enumerate() {
        let state = if credentials.credential(&profile.credential_env).is_some() {
            "set"
        } else {
            "missing"
        };
        println!(
            "{}. {} [{}: {}]\n   {}",
            idx + 1,
            profile.id,
            profile.credential_env,
            state,
            profile.responsibility
        );
    }
}

async fn print_prompt(config: &Config, git: &GitCli, profile_id: &str) -> Result<()> {
    let profile = config.profile(profile_id).with_context(|| {
        format!(
            "Unknown profile '{}'. Run `patchbay profiles` to list them.",
            profile_id
        )
    })?;

    let context = ContextCollector::new(config, git).collect().await?;
    println!("{}", prompt::compose(&profile.responsibility, &context));
    Ok(())
}

fn list_quarantine(config: &Config, git: &GitCli) -> Result<()> {
    let quarantine = Quarantine::new(git.root().join(&config.quarantine_dir));
    let entries = quarantine.entries()?;

    if entries.is_empty() {
        println!("No quarantined diffs in {}", quarantine.dir().display());
        return Ok(());
    }

    for entry in entries {
        println!("{}  ({} bytes)", entry.file_name, entry.size);
    }
    Ok(())
}
