use std::path::PathBuf;

use acadsched_core::ObservabilityConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "acadsched", version, about = "Acadsched audit trail CLI")]
struct Cli {
    /// Configuration file. A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "acadsched.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the audit trail
    Audit {
        #[command(subcommand)]
        cmd: AuditCommand,
    },

    /// Validate the configuration and print what it resolves to
    Check,
}

#[derive(Subcommand, Debug)]
enum AuditCommand {
    /// List entries, most recent first
    List {
        /// Only entries for this entity type (e.g. FACULTY)
        #[arg(long)]
        entity: Option<String>,

        /// Only entries with this action (CREATE, UPDATE or DELETE)
        #[arg(long)]
        action: Option<String>,

        /// Only entries attributed to this principal
        #[arg(long)]
        user: Option<String>,

        /// Maximum number of entries to print
        #[arg(long)]
        limit: Option<usize>,

        /// Print entries as a JSON array
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(&cli.config)?;

    init_tracing(&config.observability);
    tracing::debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.cmd {
        Command::Audit { cmd } => match cmd {
            AuditCommand::List {
                entity,
                action,
                user,
                limit,
                json,
            } => {
                let filter = commands::audit::build_filter(entity, action.as_deref(), user, limit)?;
                commands::audit::list(&config, filter, json).await?
            }
        },

        Command::Check => commands::check::run(&cli.config, &config)?,
    }

    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_level));

    if observability.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
