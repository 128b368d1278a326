mod config;
mod harness_cmds;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use dun_core::harness::default_registry;

use config::DunConfig;

#[derive(Parser)]
#[command(name = "dun", about = "Reconcile answers from LLM CLI harnesses")]
struct Cli {
    /// Per-execution timeout in seconds (overrides DUN_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harness management and diagnostics
    Harness {
        #[command(subcommand)]
        command: HarnessCommands,
    },
    /// Exercise the harness subsystem without live processes
    Selftest,
}

#[derive(Subcommand)]
enum HarnessCommands {
    /// List registered harnesses
    List,
    /// Execute one harness with a prompt and print its response
    Exec {
        /// Harness name (claude, gemini, codex, mock)
        name: String,
        /// Prompt passed to the harness
        prompt: String,
        /// Automation mode (manual, plan, auto, yolo; overrides DUN_MODE)
        #[arg(long)]
        mode: Option<String>,
        /// Working directory for the harness subprocess
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
    /// Probe one harness for liveness
    Ping {
        /// Harness name
        name: String,
    },
    /// Probe every harness and persist the availability cache
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Ctrl-C cancels in-flight executions, which kills their children.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let registry = default_registry();

    match cli.command {
        Commands::Harness { command } => match command {
            HarnessCommands::List => harness_cmds::cmd_list(registry),
            HarnessCommands::Exec {
                name,
                prompt,
                mode,
                work_dir,
            } => {
                let config = DunConfig::resolve(cli.timeout, mode.as_deref())?;
                harness_cmds::cmd_exec(
                    &cancel,
                    registry,
                    &config,
                    &name,
                    &prompt,
                    work_dir.as_deref(),
                )
                .await
                .with_context(|| format!("harness {name} failed"))
            }
            HarnessCommands::Ping { name } => {
                let config = DunConfig::resolve(cli.timeout, None)?;
                harness_cmds::cmd_ping(&cancel, registry, &config, &name).await
            }
            HarnessCommands::Doctor => {
                let config = DunConfig::resolve(cli.timeout, None)?;
                harness_cmds::cmd_doctor(&cancel, registry, &config, None).await
            }
        },
        Commands::Selftest => harness_cmds::cmd_selftest(&cancel).await,
    }
}
