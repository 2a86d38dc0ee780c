//! Command-line interface for registrar.
//!
//! This module provides the CLI structure for the `registrar` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    parse_assignment, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    StatsCommand, SubmitCommand,
};

/// registrar - Event registrations from the command line
///
/// Submit a registration, or review, edit and delete registrations and see
/// their age and gender breakdown.
#[derive(Debug, Parser)]
#[command(name = "registrar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new registration
    Submit(SubmitCommand),

    /// List all registrations
    List(ListCommand),

    /// Show age and gender distributions
    Stats(StatsCommand),

    /// Change fields of a registration
    Edit(EditCommand),

    /// Delete a registration
    Delete(DeleteCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::Field;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "registrar");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["registrar", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["registrar", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["registrar", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["registrar", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_submit() {
        let cli = parse(&[
            "registrar",
            "submit",
            "--full-name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--age",
            "36",
            "--meetup-area",
            "Park",
        ]);
        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(cmd.full_name, "Ada Lovelace");
        assert_eq!(cmd.age, "36");
        assert_eq!(cmd.meetup_area, "Park");
        assert_eq!(cmd.phone, "");
    }

    #[test]
    fn test_parse_submit_requires_name_and_email() {
        assert!(Cli::try_parse_from(["registrar", "submit", "--email", "a@b.c"]).is_err());
        assert!(Cli::try_parse_from(["registrar", "submit", "--full-name", "A"]).is_err());
    }

    #[test]
    fn test_parse_list_default_format() {
        let Command::List(cmd) = parse(&["registrar", "list"]).command else {
            panic!("expected list");
        };
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_list_json() {
        let Command::List(cmd) = parse(&["registrar", "list", "--format", "json"]).command else {
            panic!("expected list");
        };
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_stats() {
        let cli = parse(&["registrar", "stats", "--json"]);
        assert!(matches!(cli.command, Command::Stats(StatsCommand { json: true })));
    }

    #[test]
    fn test_parse_edit() {
        let cli = parse(&[
            "registrar",
            "edit",
            "abc123",
            "--set",
            "fullName=B",
            "-s",
            "age=44",
        ]);
        let Command::Edit(cmd) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(cmd.id.as_str(), "abc123");
        assert_eq!(
            cmd.assignments,
            vec![
                (Field::FullName, "B".to_string()),
                (Field::Age, "44".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_edit_requires_assignment() {
        assert!(Cli::try_parse_from(["registrar", "edit", "abc123"]).is_err());
    }

    #[test]
    fn test_parse_edit_rejects_unknown_field() {
        assert!(Cli::try_parse_from(["registrar", "edit", "abc123", "--set", "nope=1"]).is_err());
    }

    #[test]
    fn test_parse_delete() {
        let Command::Delete(cmd) = parse(&["registrar", "delete", "7"]).command else {
            panic!("expected delete");
        };
        assert_eq!(cmd.id.as_str(), "7");
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["registrar", "config", "validate", "--file", "/tmp/c.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["registrar", "-c", "/custom/config.toml", "list"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
