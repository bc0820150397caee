//! CLI definitions for the `axis` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Authenticated chat API over pluggable language models.
#[derive(Parser)]
#[command(name = "axis", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML config file (defaults to ./axis.toml when present).
    #[arg(long, global = true, env = "AXIS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// List the configured model aliases.
    Models {
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "axis", "serve", "--port", "9000", "--host", "127.0.0.1", "--config", "dev.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            Commands::Models { .. } => panic!("expected serve"),
        }
    }

    #[test]
    fn test_serve_without_flags() {
        let cli = Cli::try_parse_from(["axis", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: None,
                host: None
            }
        ));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["axis"]).is_err());
    }
}
