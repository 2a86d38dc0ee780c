//! `registrar` - CLI for submitting and managing event registrations

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use registrar::cli::{
    Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    StatsCommand, SubmitCommand,
};
use registrar::submit::{FAILURE_MESSAGE, SUCCESS_MESSAGE};
use registrar::{init_logging, render, Config, Dashboard, HttpRegistrationApi, Submitter};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Config commands must work even when the configuration is broken.
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone())?;
    let api = HttpRegistrationApi::new(&config.base_url()?, config.timeout())?;

    match cli.command {
        Command::Submit(cmd) => handle_submit(&api, &cmd).await,
        Command::List(cmd) => handle_list(&api, &cmd).await,
        Command::Stats(cmd) => handle_stats(&api, &cmd).await,
        Command::Edit(cmd) => handle_edit(&api, cmd).await,
        Command::Delete(cmd) => handle_delete(&api, &cmd).await,
        Command::Config(_) => Ok(()),
    }
}

async fn handle_submit(api: &HttpRegistrationApi, cmd: &SubmitCommand) -> CliResult {
    let mut submitter = Submitter::with_form(cmd.to_form());
    match submitter.submit(api).await {
        Ok(submitted) => {
            println!("{SUCCESS_MESSAGE}");
            if let Some(record) = submitted.record {
                println!("Registration id: {}", record.id);
            }
            Ok(())
        }
        Err(e) if e.is_validation_error() => Err(e.into()),
        Err(e) => {
            eprintln!("{FAILURE_MESSAGE}");
            Err(e.into())
        }
    }
}

async fn load(api: &HttpRegistrationApi) -> Result<Dashboard, registrar::Error> {
    let mut dashboard = Dashboard::new();
    dashboard.load(api).await?;
    Ok(dashboard)
}

// A failed load still renders, as an empty list, before the error is reported.
async fn handle_list(api: &HttpRegistrationApi, cmd: &ListCommand) -> CliResult {
    let mut dashboard = Dashboard::new();
    let loaded = dashboard.load(api).await;

    let mut out = io::stdout().lock();
    match cmd.format {
        OutputFormat::Plain => render::write_plain(&mut out, dashboard.records())?,
        OutputFormat::Table => render::write_table(&mut out, dashboard.records())?,
        OutputFormat::Json => render::write_json(&mut out, dashboard.records())?,
    }
    out.flush()?;

    loaded?;
    Ok(())
}

async fn handle_stats(api: &HttpRegistrationApi, cmd: &StatsCommand) -> CliResult {
    let mut dashboard = Dashboard::new();
    let loaded = dashboard.load(api).await;

    let (age, gender) = (dashboard.age_chart(), dashboard.gender_chart());
    let mut out = io::stdout().lock();
    if cmd.json {
        render::write_stats_json(&mut out, &age, &gender)?;
    } else {
        render::write_stats(&mut out, &age, &gender)?;
    }
    out.flush()?;

    loaded?;
    Ok(())
}

async fn handle_edit(api: &HttpRegistrationApi, cmd: EditCommand) -> CliResult {
    let mut dashboard = load(api).await?;
    dashboard.begin_edit(&cmd.id)?;
    for (field, value) in cmd.assignments {
        dashboard.update_field(field, value)?;
    }
    dashboard.save(api).await?;

    if let Some(record) = dashboard.state().find(&cmd.id) {
        render::write_plain(&mut io::stdout().lock(), std::slice::from_ref(record))?;
    }
    Ok(())
}

async fn handle_delete(api: &HttpRegistrationApi, cmd: &DeleteCommand) -> CliResult {
    let mut dashboard = load(api).await?;
    if dashboard.state().find(&cmd.id).is_none() {
        return Err(registrar::Error::UnknownRecord(cmd.id.clone()).into());
    }
    dashboard.delete(api, &cmd.id).await?;
    println!(
        "Deleted registration {} ({} remaining)",
        cmd.id,
        dashboard.records().len()
    );
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                match config.timeout() {
                    Some(timeout) => println!("  Timeout:            {}s", timeout.as_secs()),
                    None => println!("  Timeout:            none"),
                }
            }
        }
        ConfigCommand::Path => {
            println!(
                "{}",
                config_path
                    .unwrap_or_else(Config::default_config_path)
                    .display()
            );
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}
