//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for triage results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    Text,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormat> for triage_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => triage_domain::OutputFormat::Text,
            OutputFormat::Json => triage_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for triage
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author, version, about = "Resilient multi-agent fraud triage")]
#[command(long_about = r#"
Triage plans a request into agent steps (fraud, insights, kb, compliance)
and runs them in order. Every agent call is screened for prompt injection,
retried on transient failures, and guarded by a circuit breaker.

Configuration files are loaded from (in priority order):
1. TRIAGE_* environment variables (TRIAGE_RETRY__MAX_ATTEMPTS=3)
2. --config <path>     Explicit config file
3. ./triage.toml       Project-level config
4. ~/.config/triage/config.toml   Global config

Example:
  triage run "is this charge fraud?" --customer cust_002 --transaction txn.json
  triage plan "what are my spend insights"
  triage batch fixtures/batch.json --output json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to the configured format, then text)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Plan and execute one request
    Run {
        /// Free-text request, planned by keyword
        query: String,

        /// Customer the request is about
        #[arg(short = 'c', long, value_name = "ID")]
        customer: String,

        /// JSON file holding the transaction under review
        #[arg(short, long, value_name = "FILE")]
        transaction: Option<PathBuf>,

        /// Run these steps instead of planning from the query (repeatable)
        #[arg(short, long = "step", value_name = "STEP")]
        steps: Vec<String>,
    },

    /// Show the plan a query would run, without running it
    Plan {
        query: String,
    },

    /// Assess a JSON array of requests
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show circuit breaker status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "triage",
            "run",
            "check for fraud",
            "--customer",
            "cust_1",
            "--step",
            "fraud",
            "--step",
            "kb",
            "-o",
            "json",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(
            cli.command,
            Some(Command::Run {
                query: "check for fraud".to_string(),
                customer: "cust_1".to_string(),
                transaction: None,
                steps: vec!["fraud".to_string(), "kb".to_string()],
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["triage", "status", "-vv", "--no-config"]);
        assert_eq!(cli.command, Some(Command::Status));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
    }

    #[test]
    fn test_run_requires_customer() {
        assert!(Cli::try_parse_from(["triage", "run", "hello"]).is_err());
    }
}
