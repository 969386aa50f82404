//! holepuncher CLI
//!
//! Creates, inspects and destroys censorship-circumvention tunnel instances
//! through the holepuncher orchestration server.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error};

use holepuncher_cli::linode_cmd::{self, LinodeAction};
use holepuncher_cli::provider::{ProviderError, cloud_provider, linode_provider};
use holepuncher_cli::tunnel_cmd;
use holepuncher_cli::var_cmd::{self, SessionVar};
use holepuncher_core::Settings;
use holepuncher_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "holepuncher")]
#[command(version, about = "holepuncher client", long_about = None)]
struct Cli {
    /// Config file
    #[arg(short, long, global = true, env = "HOLEPUNCHER_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "HOLEPUNCHER_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create tunnel
    Create,
    /// Destroy tunnel
    Destroy,
    /// Display tunnel info
    Info,
    /// Linode-specific actions
    Linode {
        #[command(subcommand)]
        action: LinodeAction,
    },
    /// Print variable from current session
    Var {
        #[command(subcommand)]
        var: SessionVar,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing("holepuncher=info", cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                provider_err.report();
            }
            let message = format!("{e:#}");
            error!(error = %message, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let mut out = io::stdout();

    match cli.command {
        Command::Create => {
            let provider = cloud_provider(&settings)?;
            tunnel_cmd::create(&provider, settings.runtime_dir()).await
        }
        Command::Destroy => {
            let provider = cloud_provider(&settings)?;
            tunnel_cmd::destroy(&provider, settings.runtime_dir()).await
        }
        Command::Info => {
            let provider = cloud_provider(&settings)?;
            tunnel_cmd::info(&provider, &mut out).await
        }
        Command::Linode { action } => {
            let provider = linode_provider(&settings)?;
            debug!(action = ?action, "Running Linode action");
            linode_cmd::run(action, &provider, settings.runtime_dir(), &mut out).await
        }
        Command::Var { var } => var_cmd::run(var, settings.runtime_dir(), &mut out),
    }
}
