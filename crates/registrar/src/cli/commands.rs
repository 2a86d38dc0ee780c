//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::registration::{Field, RegistrationForm, RegistrationId};

/// Submit command arguments: one field per flag.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Participant's full name (required)
    #[arg(long)]
    pub full_name: String,

    /// Contact email (required)
    #[arg(long)]
    pub email: String,

    /// Contact phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Age in years
    #[arg(long, default_value = "")]
    pub age: String,

    /// Gender, e.g. Male or Female
    #[arg(long, default_value = "")]
    pub gender: String,

    /// Preferred meet-up area
    #[arg(long, default_value = "")]
    pub meetup_area: String,

    /// Free-text message
    #[arg(long, default_value = "")]
    pub message: String,
}

impl SubmitCommand {
    /// The form these arguments describe.
    #[must_use]
    pub fn to_form(&self) -> RegistrationForm {
        RegistrationForm {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            age: self.age.clone(),
            gender: self.gender.clone(),
            meetup_area: self.meetup_area.clone(),
            message: self.message.clone(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Identifier of the registration to edit
    pub id: RegistrationId,

    /// Field assignment such as `age=31` or `meetupArea=Park`; repeatable
    #[arg(short = 's', long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment, required = true)]
    pub assignments: Vec<(Field, String)>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Identifier of the registration to delete
    pub id: RegistrationId,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for the participants list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One indented block per participant
    Plain,
    /// Aligned table
    #[default]
    Table,
    /// JSON array in wire format
    Json,
}

/// Parse a `FIELD=VALUE` assignment. The value may be empty.
///
/// # Errors
///
/// Returns a message if there is no `=` or the field name is unknown.
pub fn parse_assignment(s: &str) -> Result<(Field, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {s:?}"))?;
    let field: Field = name.trim().parse().map_err(|e| format!("{e}"))?;
    Ok((field, value.to_string()))
}
