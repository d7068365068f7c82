//! `busboard` - CLI for the offline fleet board
//!
//! This binary provides the command-line interface for managing today's
//! roster, the day-log history, templates, complaints, and the analytics
//! built on top of them.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use busboard::analytics::{detect_anomalies, forecast, narrative, suggest_for_line};
use busboard::cli::{
    AddCommand, Cli, Command, ComplainCommand, ConfigCommand, InsightsCommand, LogsCommand,
    SuggestCommand, TemplateCommand,
};
use busboard::roster::{BusRecord, Complaint, DayLog, Template};
use busboard::store::Store;
use busboard::{init_logging, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        // Config subcommands skip the normal startup path so that
        // `config validate` can report problems instead of aborting on them.
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
        command => {
            let config =
                Config::load_from(cli.config.clone()).context("failed to load configuration")?;
            let store = Store::open(&config);
            run(&store, command)
        }
    }
}

fn run(store: &Store, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Board(cmd) => handle_board(store, cmd.json),
        Command::Add(cmd) => handle_add(store, &cmd),
        Command::Arrive(cmd) => handle_arrival(store, &cmd.bus, true),
        Command::Unarrive(cmd) => handle_arrival(store, &cmd.bus, false),
        Command::Remove(cmd) => handle_remove(store, &cmd.bus),
        Command::SaveDay => handle_save_day(store),
        Command::Logs(cmd) => handle_logs(store, &cmd),
        Command::LogsDelete(cmd) => {
            store.delete_day_log(&cmd.id);
            println!("Deleted log {}.", cmd.id);
            Ok(())
        }
        Command::Suggest(cmd) => handle_suggest(store, &cmd),
        Command::Insights(cmd) => handle_insights(store, &cmd),
        Command::Template(cmd) => handle_template(store, cmd),
        Command::Complain(cmd) => handle_complain(store, cmd),
        Command::Complaints(cmd) => handle_complaints(store, cmd.json),
        Command::ComplaintsDelete(cmd) => {
            store.delete_complaint(&cmd.id);
            println!("Deleted complaint {}.", cmd.id);
            Ok(())
        }
        Command::Export => handle_export(store),
        Command::Clear(cmd) => handle_clear(store, cmd.yes),
        Command::Config(_) => unreachable!("handled before startup"),
    }
}

fn handle_board(store: &Store, json: bool) -> anyhow::Result<()> {
    let roster = store.roster();
    if json {
        println!("{}", serde_json::to_string_pretty(&roster)?);
        return Ok(());
    }

    if roster.is_empty() {
        println!("The board is empty. Add a bus with `busboard add <line>`.");
        return Ok(());
    }

    let arrived = roster.iter().filter(|b| b.arrived).count();
    println!("Today's board ({arrived}/{} arrived)", roster.len());
    println!("----------------------------------");
    for bus in &roster {
        print_bus(bus);
    }
    Ok(())
}

fn print_bus(bus: &BusRecord) {
    let mark = if bus.arrived { "x" } else { " " };
    let platform = if bus.platform_number.is_empty() {
        "-".to_string()
    } else {
        bus.platform_number.clone()
    };
    let mut line = format!(
        "[{mark}] line {:<5} platform {:<3} {}",
        bus.line_number, platform, bus.destination
    );
    if !bus.plate_number.is_empty() {
        line.push_str(&format!("  ({})", bus.plate_number));
    }
    if !bus.notes.is_empty() {
        line.push_str(&format!("  note: {}", bus.notes));
    }
    println!("{}", line.trim_end());
}

fn handle_add(store: &Store, cmd: &AddCommand) -> anyhow::Result<()> {
    let mut roster = store.roster();

    let mut bus = BusRecord::new();
    bus.line_number = cmd.line.clone();
    bus.plate_number = cmd.plate.clone().unwrap_or_default();
    bus.platform_number = cmd.platform.clone().unwrap_or_default();
    bus.destination = cmd.destination.clone().unwrap_or_default();
    bus.notes = cmd.notes.clone().unwrap_or_default();

    // Prefill missing fields from history unless suppressed
    if !cmd.no_suggest && (bus.platform_number.is_empty() || bus.destination.is_empty()) {
        if let Some(suggestion) = suggest_for_line(&cmd.line, &store.day_logs(), Some(&roster)) {
            if bus.platform_number.is_empty() && !suggestion.platform.is_empty() {
                bus.platform_number = suggestion.platform.clone();
                println!("Prefilled platform {} from history.", suggestion.platform);
            }
            if bus.destination.is_empty() && !suggestion.destination.is_empty() {
                bus.destination = suggestion.destination.clone();
                println!(
                    "Prefilled destination {} from history.",
                    suggestion.destination
                );
            }
        }
    }

    roster.push(bus.clone());
    store.save_roster(&roster);
    println!("Added line {} (id {}).", bus.line_number, bus.id);
    Ok(())
}

fn handle_arrival(store: &Store, key: &str, arrived: bool) -> anyhow::Result<()> {
    let mut roster = store.roster();
    let Some(bus) = roster.iter_mut().find(|b| b.matches_key(key)) else {
        bail!("no bus on the board matches '{key}'");
    };

    bus.arrived = arrived;
    let line = bus.line_number.clone();
    store.save_roster(&roster);

    if arrived {
        println!("Marked line {line} as arrived.");
    } else {
        println!("Reverted line {line} to not arrived.");
    }
    Ok(())
}

fn handle_remove(store: &Store, key: &str) -> anyhow::Result<()> {
    let roster = store.roster();
    let remaining: Vec<BusRecord> = roster
        .iter()
        .filter(|b| !b.matches_key(key))
        .cloned()
        .collect();

    if remaining.len() == roster.len() {
        bail!("no bus on the board matches '{key}'");
    }

    let removed = roster.len() - remaining.len();
    store.save_roster(&remaining);
    println!("Removed {removed} bus(es).");
    Ok(())
}

fn handle_save_day(store: &Store) -> anyhow::Result<()> {
    let roster = store.roster();
    match store.save_day_log(&roster) {
        Some(log) => {
            store.save_roster(&[]);
            println!(
                "Saved day log {}: {}/{} arrived. The board has been cleared.",
                log.id, log.arrived_count, log.total_count
            );
        }
        None => println!("The board is empty; nothing to log."),
    }
    Ok(())
}

fn handle_logs(store: &Store, cmd: &LogsCommand) -> anyhow::Result<()> {
    let logs = store.day_logs();
    let shown: Vec<&DayLog> = logs.iter().take(cmd.limit).collect();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No day logs saved yet.");
        return Ok(());
    }

    for log in shown {
        #[allow(clippy::cast_possible_truncation)]
        let rate = log.arrival_rate().round() as i64;
        println!(
            "{}  {}/{} arrived ({rate}%)  id {}",
            log.date.format("%Y-%m-%d %H:%M"),
            log.arrived_count,
            log.total_count,
            log.id
        );
    }
    Ok(())
}

fn handle_suggest(store: &Store, cmd: &SuggestCommand) -> anyhow::Result<()> {
    let suggestion = suggest_for_line(&cmd.line, &store.day_logs(), Some(&store.roster()));

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
        return Ok(());
    }

    match suggestion {
        Some(s) => {
            println!("Line {}:", cmd.line);
            if !s.platform.is_empty() {
                println!("  Platform:    {}", s.platform);
            }
            if !s.destination.is_empty() {
                println!("  Destination: {}", s.destination);
            }
            #[allow(clippy::cast_possible_truncation)]
            let pct = (s.confidence * 100.0).round() as i64;
            println!("  Confidence:  {pct}%");
        }
        None => println!("No history for line {} yet.", cmd.line),
    }
    Ok(())
}

fn handle_insights(store: &Store, cmd: &InsightsCommand) -> anyhow::Result<()> {
    let roster = store.roster();
    let logs = store.day_logs();

    let anomalies = detect_anomalies(&roster, &logs);
    let forecast = forecast(&logs);
    let report = narrative(&logs);

    if cmd.json {
        let payload = serde_json::json!({
            "anomalies": anomalies,
            "forecast": forecast,
            "narrative": report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{report}");

    if let Some(f) = forecast {
        println!();
        println!("Forecast");
        println!("  Arrival rate: {}%", f.predicted_arrival_rate);
        println!("  Volume:       {} buses", f.predicted_volume);
        println!("  Trend:        {} ({:+}%)", f.trend, f.trend_pct);
    }

    if !anomalies.is_empty() {
        println!();
        println!("Anomalies");
        for anomaly in &anomalies {
            println!("  [{}] {}", anomaly.severity, anomaly.message);
        }
    }
    Ok(())
}

fn handle_template(store: &Store, cmd: TemplateCommand) -> anyhow::Result<()> {
    match cmd {
        TemplateCommand::Save { name, day } => {
            let roster = store.roster();
            if roster.is_empty() {
                bail!("the board is empty; nothing to save as a template");
            }
            let template = Template::from_roster(name, day.unwrap_or_default(), &roster);
            println!(
                "Saved template '{}' with {} buses (id {}).",
                template.name,
                template.buses.len(),
                template.id
            );
            store.save_template(&template);
        }
        TemplateCommand::List { json } => {
            let templates = store.templates();
            if json {
                println!("{}", serde_json::to_string_pretty(&templates)?);
            } else if templates.is_empty() {
                println!("No templates saved yet.");
            } else {
                for t in &templates {
                    let day = if t.day_of_week.is_empty() {
                        "any day".to_string()
                    } else {
                        t.day_of_week.clone()
                    };
                    println!("{}  ({day}, {} buses)  id {}", t.name, t.buses.len(), t.id);
                }
            }
        }
        TemplateCommand::Load { template } => {
            let templates = store.templates();
            let Some(found) = templates
                .iter()
                .find(|t| t.id == template || t.name == template)
            else {
                bail!("no template named '{template}'");
            };
            let roster = found.instantiate();
            store.save_roster(&roster);
            println!("Loaded template '{}': {} buses on the board.", found.name, roster.len());
        }
        TemplateCommand::Delete { template } => {
            let templates = store.templates();
            let Some(found) = templates
                .iter()
                .find(|t| t.id == template || t.name == template)
            else {
                bail!("no template named '{template}'");
            };
            let id = found.id.clone();
            let name = found.name.clone();
            store.delete_template(&id);
            println!("Deleted template '{name}'.");
        }
    }
    Ok(())
}

fn handle_complain(store: &Store, cmd: ComplainCommand) -> anyhow::Result<()> {
    let complaint = Complaint::new(
        cmd.line,
        cmd.plate.unwrap_or_default(),
        cmd.driver.unwrap_or_default(),
        cmd.complaint_type,
        cmd.details.unwrap_or_default(),
    );
    println!(
        "Filed '{}' complaint about line {} (id {}).",
        complaint.complaint_type, complaint.line_number, complaint.id
    );
    store.save_complaint(&complaint);
    Ok(())
}

fn handle_complaints(store: &Store, json: bool) -> anyhow::Result<()> {
    let complaints = store.complaints();
    if json {
        println!("{}", serde_json::to_string_pretty(&complaints)?);
        return Ok(());
    }

    if complaints.is_empty() {
        println!("No complaints filed.");
        return Ok(());
    }
    for c in &complaints {
        let mut line = format!(
            "{}  line {}  [{}]",
            c.date.format("%Y-%m-%d"),
            c.line_number,
            c.complaint_type
        );
        if !c.details.is_empty() {
            line.push_str(&format!("  {}", c.details));
        }
        line.push_str(&format!("  id {}", c.id));
        println!("{line}");
    }
    Ok(())
}

fn handle_export(store: &Store) -> anyhow::Result<()> {
    let all = store.get_all();
    println!("{}", serde_json::to_string_pretty(&all)?);
    Ok(())
}

fn handle_clear(store: &Store, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("This will delete the roster, all day logs, templates, and complaints.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    store.clear_all();
    println!("All stored data deleted.");
    Ok(())
}

fn handle_config(
    cli_path: Option<std::path::PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(cli_path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path: {}", config.database_path().display());
                println!("  Legacy dir:    {}", config.legacy_dir().display());
                println!("  Max day logs:  {}", config.storage.max_day_logs);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(cli_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
