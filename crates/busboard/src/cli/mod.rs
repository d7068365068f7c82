//! Command-line interface for busboard.
//!
//! This module provides the CLI structure and command handlers for the
//! `busboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ArriveCommand, BoardCommand, ClearCommand, ComplainCommand, ComplaintsCommand,
    ComplaintsDeleteCommand, ConfigCommand, InsightsCommand, LogsCommand, LogsDeleteCommand,
    RemoveCommand, SuggestCommand, TemplateCommand,
};

/// busboard - Offline fleet board for bus stations
///
/// Tracks today's bus roster, saves end-of-day logs, and mines the history
/// for suggestions, anomalies, and trend forecasts. Everything is stored
/// locally; no network access is ever needed.
#[derive(Debug, Parser)]
#[command(name = "busboard")]
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
    /// Show today's roster
    Board(BoardCommand),

    /// Add a bus to today's roster
    Add(AddCommand),

    /// Mark a bus as arrived
    Arrive(ArriveCommand),

    /// Revert a bus to not arrived
    Unarrive(ArriveCommand),

    /// Remove a bus from the roster
    Remove(RemoveCommand),

    /// Save today's roster as a day log and clear the board
    SaveDay,

    /// List saved day logs
    Logs(LogsCommand),

    /// Delete a saved day log
    LogsDelete(LogsDeleteCommand),

    /// Suggest platform and destination for a line
    Suggest(SuggestCommand),

    /// Show anomalies, forecast, and the narrative summary
    Insights(InsightsCommand),

    /// Manage roster templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// File a complaint about a bus
    Complain(ComplainCommand),

    /// List filed complaints
    Complaints(ComplaintsCommand),

    /// Delete a filed complaint
    ComplaintsDelete(ComplaintsDeleteCommand),

    /// Export all stored data as JSON
    Export,

    /// Delete all stored data
    Clear(ClearCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
