//! # formify CLI entry point
//!
//! Parses command-line arguments, configures logging and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formify_cli::check::{run_check, CheckArgs};
use formify_cli::describe::{run_describe, DescribeArgs};

/// formify: typed field validation for key/value documents.
#[derive(Parser, Debug)]
#[command(name = "formify", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check an input document against a schema descriptor.
    Check(CheckArgs),

    /// Print a summary of every field in a schema descriptor.
    Describe(DescribeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "formify CLI starting");

    let result = match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Describe(args) => run_describe(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formify_cli::check::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from(["formify", "check", "--schema", "s.yaml", "--input", "i.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.log_json);
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("s.yaml"));
            assert_eq!(args.input, PathBuf::from("i.json"));
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_check_json_format() {
        let cli = Cli::try_parse_from([
            "formify", "-vv", "--log-json", "check", "--schema", "s.yaml", "--input", "i.json", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.format, OutputFormat::Json);
        }
    }

    #[test]
    fn cli_parse_check_requires_input() {
        assert!(Cli::try_parse_from(["formify", "check", "--schema", "s.yaml"]).is_err());
    }

    #[test]
    fn cli_parse_describe() {
        let cli = Cli::try_parse_from(["formify", "describe", "--schema", "s.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Describe(_)));
    }

    #[test]
    fn cli_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "formify", "check", "--schema", "s", "--input", "i", "--format", "xml",
        ]);
        assert!(result.is_err());
    }
}
