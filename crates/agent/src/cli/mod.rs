pub mod ask;
pub mod config;
pub mod leads;
pub mod simulate;
pub mod submit;

use clap::{Parser, Subcommand};

/// LeadQual: a lead-qualification conversation agent.
#[derive(Debug, Parser)]
#[command(name = "leadqual", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the scripted demo conversations (default when no subcommand is given).
    Simulate {
        /// Skip the random think-time and stagger delays.
        #[arg(long)]
        fast: bool,
        /// Override how long the follow-up sweep keeps running afterwards.
        #[arg(long)]
        linger_secs: Option<u64>,
    },
    /// Print the persisted lead table.
    Leads {
        /// Output as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Register a new lead under a fresh id and print its greeting.
    Submit {
        /// The lead's name as entered on the form.
        #[arg(long)]
        name: String,
    },
    /// Send an open-ended message from a lead and print the generated reply.
    Ask {
        /// Lead id (must already exist).
        lead_id: String,
        /// The message from the lead.
        message: String,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `LQ_CONFIG` (or
/// `config.toml` by default).  Returns the parsed [`Config`] and the
/// path that was used.
///
/// [`Config`]: lq_domain::config::Config
pub fn load_config() -> anyhow::Result<(lq_domain::config::Config, String)> {
    let config_path = std::env::var("LQ_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

/// Parse `path` as TOML; a missing file yields the defaults.
pub fn load_config_from(path: &str) -> anyhow::Result<lq_domain::config::Config> {
    if !std::path::Path::new(path).exists() {
        return Ok(lq_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("reading {path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["leadqual"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn simulate_flags_parse() {
        let cli = Cli::try_parse_from(["leadqual", "simulate", "--fast", "--linger-secs", "3"]).unwrap();
        match cli.command {
            Some(Command::Simulate { fast, linger_secs }) => {
                assert!(fast);
                assert_eq!(linger_secs, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn submit_requires_name() {
        assert!(Cli::try_parse_from(["leadqual", "submit"]).is_err());
        let cli = Cli::try_parse_from(["leadqual", "submit", "--name", "Zoe"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Submit { name }) if name == "Zoe"));
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.followup.idle_threshold_secs, 10);
    }

    #[test]
    fn bad_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[followup\n").unwrap();
        let err = load_config_from(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("parsing "));
    }
}
