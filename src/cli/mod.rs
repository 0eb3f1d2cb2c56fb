//! # Command Line Interface
//!
//! Provides CLI commands for validating, formatting and inspecting
//! `mule-configuration` documents.

pub mod commands;
pub mod output;

use crate::config::Settings;
use crate::observability::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mule-config")]
#[command(about = "Mule configuration document tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration document
    #[command(
        long_about = "Parse a configuration document and report every violation found.\n\nExits with an error when the document has errors (or warnings, when warnings count as errors).",
        after_help = "EXAMPLES:\n    # Validate a file\n    mule-config validate mule-config.xml\n\n    # Machine-readable report\n    mule-config validate mule-config.xml --output json\n\n    # Report bad attribute values instead of failing the parse\n    mule-config validate mule-config.xml --lenient"
    )]
    Validate {
        /// Configuration document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (text, json, or yaml)
        #[arg(short, long, default_value = "text", value_parser = ["text", "json", "yaml"])]
        output: String,

        /// Store invalid attribute literals and report them as violations
        #[arg(long)]
        lenient: bool,
    },

    /// Rewrite a configuration document in canonical form
    #[command(
        long_about = "Parse a configuration document and write it back in canonical form.\n\nAttributes left at their defaults stay absent and attributes are written in declaration order. Children of most elements are rewritten in schema order, so interleaved siblings are regrouped: an inbound-router listing endpoint, global-endpoint, endpoint comes out with both endpoint elements first. Elements that accept mixed content (mule-configuration, model, mule-descriptor, properties) keep their children, text and comments in document order. Comments elsewhere are dropped.",
        after_help = "EXAMPLES:\n    # Print the canonical form\n    mule-config format mule-config.xml\n\n    # Rewrite the file in place\n    mule-config format mule-config.xml --write"
    )]
    Format {
        /// Configuration document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Summarise catalogs and descriptors
    Inspect {
        /// Configuration document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (text, json, or yaml)
        #[arg(short, long, default_value = "text", value_parser = ["text", "json", "yaml"])]
        output: String,
    },

    /// Resolve an endpoint name or address against the global endpoints
    Resolve {
        /// Configuration document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Global endpoint name or endpoint address
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,

        /// Output format (text, json, or yaml)
        #[arg(short, long, default_value = "text", value_parser = ["text", "json", "yaml"])]
        output: String,
    },
}

/// Run CLI commands
pub fn run_cli() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    }
    init_logging(&settings.logging);

    match cli.command {
        Commands::Validate { file, output, lenient } => {
            commands::validate(&settings, &file, &output, lenient)?
        }
        Commands::Format { file, write } => commands::format(&settings, &file, write)?,
        Commands::Inspect { file, output } => commands::inspect(&settings, &file, &output)?,
        Commands::Resolve { file, endpoint, output } => {
            commands::resolve(&settings, &file, &endpoint, &output)?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn format_help_describes_reordering() {
        let mut command = Cli::command();
        let help = command
            .find_subcommand_mut("format")
            .expect("format subcommand")
            .render_long_help()
            .to_string();
        assert!(help.contains("schema order"), "{}", help);
        assert!(help.contains("document order"), "{}", help);
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mule-config", "validate", "a.xml", "--output", "json", "--verbose"])
            .expect("parse");
        assert!(cli.verbose);
        match cli.command {
            Commands::Validate { output, lenient, .. } => {
                assert_eq!(output, "json");
                assert!(!lenient);
            }
            _ => panic!("expected validate"),
        }
    }
}
