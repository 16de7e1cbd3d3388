use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use questionnaire::RemoteId;

#[derive(Parser)]
#[command(name = "questionnaire")]
#[command(about = "Build questionnaires and sync them with the survey backend")]
#[command(version)]
pub struct Cli {
    /// Base URL of the REST API, e.g. https://surveys.example.org/api
    #[arg(long, global = true, env = "QUESTIONNAIRE_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with API requests
    #[arg(long, global = true, env = "QUESTIONNAIRE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new questionnaire with one empty section to a file
    New {
        #[arg(long)]
        title: String,
        /// Owning program (UUID)
        #[arg(long)]
        program: Option<String>,
        /// Questionnaire type, e.g. survey, poll, assessment
        #[arg(long, default_value = "survey")]
        kind: String,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Print the outline of a questionnaire file
    Show { file: PathBuf },
    /// Edit a questionnaire file interactively
    Edit {
        file: PathBuf,
        /// Plain prompts without colors
        #[arg(long)]
        plain: bool,
    },
    /// Download a questionnaire into a file
    Pull {
        #[arg(value_parser = parse_remote_id)]
        id: RemoteId,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Validate a questionnaire file and upload it
    Push {
        #[arg(value_parser = parse_remote_id)]
        id: RemoteId,
        file: PathBuf,
    },
    /// Save --api-url, --token and the request timeout to config.toml
    Configure {
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// Numeric ids are sent as numbers, anything else as a string.
pub fn parse_remote_id(s: &str) -> Result<RemoteId, Infallible> {
    Ok(match s.parse::<i64>() {
        Ok(n) => RemoteId::Int(n),
        Err(_) => RemoteId::Str(s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_id_parsing() {
        assert_eq!(parse_remote_id("42"), Ok(RemoteId::Int(42)));
        assert_eq!(
            parse_remote_id("9b1f0c7e-4d2a"),
            Ok(RemoteId::Str("9b1f0c7e-4d2a".into()))
        );
    }

    #[test]
    fn test_cli_parses_push() {
        let cli = Cli::try_parse_from([
            "questionnaire",
            "--api-url",
            "https://surveys.example.org/api",
            "push",
            "7",
            "pulse.json",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://surveys.example.org/api"));
        match cli.command {
            Commands::Push { id, file } => {
                assert_eq!(id, RemoteId::Int(7));
                assert_eq!(file, PathBuf::from("pulse.json"));
            }
            _ => panic!("expected push"),
        }
    }

    #[test]
    fn test_cli_parses_configure() {
        let cli =
            Cli::try_parse_from(["questionnaire", "configure", "--token", "t", "--timeout", "9"])
                .unwrap();
        assert_eq!(cli.token.as_deref(), Some("t"));
        assert!(matches!(cli.command, Commands::Configure { timeout: Some(9) }));
    }
}
