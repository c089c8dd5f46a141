//! Command-line interface for flightlog.
//!
//! This module provides the CLI structure and command handlers for the
//! `fltlog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddAircraftArgs, AddAirfieldArgs, AddFlightArgs, AddPilotArgs, AircraftCommand,
    AirfieldCommand, ConfigCommand, FlightCommand, PilotCommand, ReportCommand, TotalsCommand,
};

use crate::logging::Verbosity;

/// fltlog - Your personal flight logbook
///
/// Records flights alongside pilot, aircraft and airfield registries,
/// computes flight time totals, and produces paginated PDF logbook reports.
#[derive(Debug, Parser)]
#[command(name = "fltlog")]
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
    /// Manage logbook flights
    #[command(subcommand)]
    Flight(FlightCommand),

    /// Manage the pilot registry
    #[command(subcommand)]
    Pilot(PilotCommand),

    /// Manage the aircraft registry
    #[command(subcommand)]
    Aircraft(AircraftCommand),

    /// Manage the airfield registry
    #[command(subcommand)]
    Airfield(AirfieldCommand),

    /// Show flight time totals
    Totals(TotalsCommand),

    /// Generate and manage archived PDF reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
