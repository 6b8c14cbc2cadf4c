//! Command-line interface parsing for the ROI HR client
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the typed inputs the API layer expects.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::data::PersonInput;

/// Error types for CLI argument handling
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// A person needs a non-blank name
    #[error("Invalid name: a person needs a non-empty name")]
    EmptyName,

    /// Deletion requires explicit confirmation
    #[error("Refusing to delete person {0} without --yes")]
    DeleteNotConfirmed(u32),
}

/// ROI HR management client - list, view and edit people records
#[derive(Parser, Debug)]
#[command(name = "roihr")]
#[command(about = "ROI HR management client with offline cache")]
#[command(version)]
pub struct Cli {
    /// Path to config file (default: ./roihr.yaml or $XDG_CONFIG_HOME/roihr/config.yaml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Treat the network as unavailable and answer reads from the cache
    #[arg(long, global = true)]
    pub offline: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List all people
    List,
    /// Show one person
    Show { id: u32 },
    /// Add a new person
    Add(PersonArgs),
    /// Replace an existing person's details
    Update {
        id: u32,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Delete a person
    Delete {
        id: u32,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List departments
    Departments,
    /// Manage the local response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheAction {
    /// Remove every cached response
    Clear,
}

/// Person fields accepted on the command line
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, value_name = "ID")]
    pub department_id: Option<u32>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

impl PersonArgs {
    /// Validates the arguments into an API payload
    ///
    /// # Returns
    /// * `Ok(PersonInput)` with the name trimmed
    /// * `Err(CliError::EmptyName)` if the name is blank
    pub fn into_input(self) -> Result<PersonInput, CliError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CliError::EmptyName);
        }

        Ok(PersonInput {
            name,
            phone: self.phone,
            department_id: self.department_id,
            street: self.street,
            city: self.city,
            state: self.state,
            zip: self.zip,
            country: self.country,
        })
    }
}

/// Checks that a deletion was confirmed
pub fn confirm_delete(id: u32, yes: bool) -> Result<(), CliError> {
    if yes {
        Ok(())
    } else {
        Err(CliError::DeleteNotConfirmed(id))
    }
}

/// Default log filter for a `-v` count
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
