use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lq_agent::bootstrap;
use lq_agent::cli::{self, Cli, Command, ConfigCommand};
use lq_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default to simulate when no subcommand is given.
        None => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let state = bootstrap::build_app_state(Arc::new(config))?;
            cli::simulate::run(state, false, None).await
        }
        Some(Command::Simulate { fast, linger_secs }) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let state = bootstrap::build_app_state(Arc::new(config))?;
            cli::simulate::run(state, fast, linger_secs).await
        }
        Some(Command::Leads { json }) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let state = bootstrap::build_app_state(Arc::new(config))?;
            cli::leads::run(&state, json)
        }
        Some(Command::Submit { name }) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let state = bootstrap::build_app_state(Arc::new(config))?;
            cli::submit::run(&state, &name)
        }
        Some(Command::Ask { lead_id, message }) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let state = bootstrap::build_app_state(Arc::new(config))?;
            cli::ask::run(&state, &lead_id, &message)
                .await
                .with_context(|| format!("asking lead {lead_id}"))
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = cli::load_config()?;
            let valid = cli::config::validate(&config, &config_path);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _config_path) = cli::load_config()?;
            cli::config::show(&config)
        }
        Some(Command::Version) => {
            println!("leadqual {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Install the global subscriber on stderr, keeping stdout for the
/// conversation transcript and command output.
///
/// Output is JSON when `observability.json_logs` is set, compact text
/// otherwise.
fn init_tracing(obs: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lq_agent=debug"));

    if obs.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
