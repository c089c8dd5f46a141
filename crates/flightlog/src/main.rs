//! `fltlog` - CLI for flightlog
//!
//! This binary provides the command-line interface for keeping the logbook,
//! its registries, and the archived PDF reports.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use tracing::warn;

use flightlog::cli::{
    AircraftCommand, AirfieldCommand, Cli, Command, ConfigCommand, FlightCommand, PilotCommand,
    ReportCommand, TotalsCommand,
};
use flightlog::{init_logging, report, Config, FlightTotals, ReportArchive, Storage, StoredReport};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Flight(cmd) => handle_flight(&config, cmd),
        Command::Pilot(cmd) => handle_pilot(&config, cmd),
        Command::Aircraft(cmd) => handle_aircraft(&config, cmd),
        Command::Airfield(cmd) => handle_airfield(&config, cmd),
        Command::Totals(cmd) => handle_totals(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    Ok(Storage::open(config.database_path())?)
}

fn open_archive(config: &Config) -> anyhow::Result<ReportArchive> {
    Ok(ReportArchive::new(
        config.reports_dir(),
        config.staging_dir(),
    )?)
}

fn handle_flight(config: &Config, cmd: FlightCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        FlightCommand::Add(args) => {
            let record = args.into_record();
            let id = storage.insert_flight(&record)?;
            println!(
                "Added flight {id}: {} {} -> {} ({})",
                record.date.format("%d %b %Y"),
                record.departure,
                record.arrival,
                record.flight_time()
            );
        }
        FlightCommand::List { json } => {
            let flights = storage.flights()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&flights)?);
            } else if flights.is_empty() {
                println!("No flights logged.");
            } else {
                println!(
                    "{:>5}  {:<12} {:<20} {:<9} {:<5} {:<5} {:<9} {:>3}  {:>3}",
                    "ID", "Date", "Pilot", "Aircraft", "From", "To", "Duration", "T/O", "Ldg"
                );
                for flight in &flights {
                    let date = flight.date.format("%d %b %Y").to_string();
                    let duration = flight.flight_time().to_string();
                    println!(
                        "{:>5}  {:<12} {:<20} {:<9} {:<5} {:<5} {:<9} {:>3}  {:>3}",
                        flight.id.unwrap_or_default(),
                        date,
                        flight.pilot,
                        flight.aircraft,
                        flight.departure,
                        flight.arrival,
                        duration,
                        flight.takeoffs,
                        flight.landings
                    );
                }
            }
        }
        FlightCommand::Remove { id } => {
            if storage.delete_flight(id)? {
                println!("Removed flight {id}");
            } else {
                bail!("no flight with id {id}");
            }
        }
    }
    Ok(())
}

fn handle_pilot(config: &Config, cmd: PilotCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        PilotCommand::Add(args) => {
            let pilot = args.into_pilot();
            let id = storage.insert_pilot(&pilot)?;
            println!("Added pilot {id}: {}", pilot.name);
        }
        PilotCommand::List { json } => {
            let pilots = storage.pilots()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pilots)?);
            } else if pilots.is_empty() {
                println!("No pilots registered.");
            } else {
                println!(
                    "{:>5}  {:<24} {:<24} {}",
                    "ID", "Name", "Email", "Telephone"
                );
                for pilot in &pilots {
                    println!(
                        "{:>5}  {:<24} {:<24} {}",
                        pilot.id.unwrap_or_default(),
                        pilot.name,
                        pilot.email,
                        pilot.telephone
                    );
                }
            }
        }
        PilotCommand::Remove { id } => {
            if storage.delete_pilot(id)? {
                println!("Removed pilot {id}");
            } else {
                bail!("no pilot with id {id}");
            }
        }
    }
    Ok(())
}

fn handle_aircraft(config: &Config, cmd: AircraftCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        AircraftCommand::Add(args) => {
            let aircraft = args.into_aircraft();
            let id = storage.insert_aircraft(&aircraft)?;
            println!("Added aircraft {id}: {}", aircraft.registration);
        }
        AircraftCommand::List { json } => {
            let fleet = storage.aircraft()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&fleet)?);
            } else if fleet.is_empty() {
                println!("No aircraft registered.");
            } else {
                println!(
                    "{:>5}  {:<13} {:<24} {:<6} {}",
                    "ID", "Registration", "Type", "Code", "Engine"
                );
                for aircraft in &fleet {
                    let kind = format!("{} {}", aircraft.make, aircraft.model);
                    println!(
                        "{:>5}  {:<13} {:<24} {:<6} {}",
                        aircraft.id.unwrap_or_default(),
                        aircraft.registration,
                        kind.trim(),
                        aircraft.code,
                        aircraft.engine_type
                    );
                }
            }
        }
        AircraftCommand::Remove { id } => {
            if storage.delete_aircraft(id)? {
                println!("Removed aircraft {id}");
            } else {
                bail!("no aircraft with id {id}");
            }
        }
    }
    Ok(())
}

fn handle_airfield(config: &Config, cmd: AirfieldCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        AirfieldCommand::Add(args) => {
            let airfield = args.into_airfield();
            let id = storage.insert_airfield(&airfield)?;
            println!("Added airfield {id}: {}", airfield.code);
        }
        AirfieldCommand::List { json } => {
            let airfields = storage.airfields()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&airfields)?);
            } else if airfields.is_empty() {
                println!("No airfields registered.");
            } else {
                println!("{:>5}  {:<6} {:<24} {}", "ID", "Code", "Name", "County");
                for airfield in &airfields {
                    println!(
                        "{:>5}  {:<6} {:<24} {}",
                        airfield.id.unwrap_or_default(),
                        airfield.code,
                        airfield.name,
                        airfield.county
                    );
                }
            }
        }
        AirfieldCommand::Remove { id } => {
            if storage.delete_airfield(id)? {
                println!("Removed airfield {id}");
            } else {
                bail!("no airfield with id {id}");
            }
        }
    }
    Ok(())
}

fn handle_totals(config: &Config, cmd: &TotalsCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let flights = storage.flights()?;
    let totals = FlightTotals::from_records(&flights);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&totals.statistics())?);
    } else {
        println!("Flight Totals");
        println!("-------------");
        for stat in totals.statistics() {
            println!("{:<24} {}", format!("{}:", stat.label), stat.value);
        }
    }
    Ok(())
}

fn handle_report(config: &Config, cmd: ReportCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        ReportCommand::Generate { out } => {
            let flights = storage.flights()?;
            let layout = config.report_layout();
            let rendered = report::generate(&flights, &layout)?;

            let archive = open_archive(config)?;
            let staged = archive.stage(&rendered.bytes)?;
            let record = match archive.promote(&storage, &staged) {
                Ok(record) => record,
                Err(promote_err) => {
                    // Nothing will retry the staged file in a one-shot run.
                    if let Err(discard_err) = archive.discard(staged) {
                        warn!("Failed to discard staged report: {discard_err}");
                    }
                    return Err(promote_err.into());
                }
            };

            println!(
                "Archived {} ({} pages, {} flights)",
                record.file_name,
                rendered.page_count(),
                flights.len()
            );
            if let Some(out) = out {
                fs::write(&out, &rendered.bytes)
                    .with_context(|| format!("writing report copy to {}", out.display()))?;
                println!("Wrote a copy to {}", out.display());
            }
        }
        ReportCommand::List { json } => {
            let archive = open_archive(config)?;
            let reports = archive.list(&storage)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else if reports.is_empty() {
                println!("No archived reports.");
            } else {
                println!("{:>5}  {:<17} {}", "ID", "Created", "File");
                for report in &reports {
                    let created = report
                        .created_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string();
                    println!("{:>5}  {:<17} {}", report.id, created, report.file_name);
                }
            }
        }
        ReportCommand::Export { id, to } => {
            let archive = open_archive(config)?;
            let record = find_report(&storage, id)?;
            match archive.load(&record) {
                Ok(bytes) => {
                    fs::write(&to, bytes)
                        .with_context(|| format!("writing report to {}", to.display()))?;
                    println!("Exported {} to {}", record.file_name, to.display());
                }
                Err(e) if e.is_stale_report() => {
                    bail!(
                        "the file for report {id} ({}) is missing; \
                         `fltlog report delete {id}` removes the dangling record",
                        record.file_name
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        ReportCommand::Delete { id } => {
            let archive = open_archive(config)?;
            let record = find_report(&storage, id)?;
            archive.delete(&storage, &record)?;
            println!("Deleted {}", record.file_name);
        }
    }
    Ok(())
}

fn find_report(storage: &Storage, id: i64) -> anyhow::Result<StoredReport> {
    storage
        .stored_report(id)?
        .ok_or_else(|| anyhow::anyhow!("no archived report with id {id}"))
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path: {}", config.database_path().display());
                println!("  Reports dir:   {}", config.reports_dir().display());
                println!("  Staging dir:   {}", config.staging_dir().display());
                println!();
                println!("[Report]");
                println!("  Title:         {}", config.report.title);
                println!("  Repeat header: {}", config.report.repeat_header);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
