//! gtracker: record litter reports from the command line.
//!
//! Reports live in `<data-dir>/gtracker.redb`; settings are read from
//! `<data-dir>/config.toml` when present.

mod commands;
mod format;
mod image;

use anyhow::{Context, anyhow};
use clap::ArgMatches;
use gtracker_core::links;
use gtracker_core::types::{
    AppConfig, Config, Coordinates, NewReport, Report, ReportId, Status, StoreConfig,
};
use gtracker_core::{RedbSlot, ReportStore, StoreError};
use std::path::{Path, PathBuf};
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use commands::build_cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(PathBuf::from)
        .context("no data directory")?;
    let app_config = load_config(&data_dir)?;

    let (name, sub) = matches.subcommand().context("no command given")?;
    if name == "config" {
        print!("{}", toml::to_string_pretty(&app_config)?);
        return Ok(());
    }

    let config = Config {
        base_path: data_dir,
    };
    let slot = RedbSlot::open(&config, app_config.storage.slot_capacity)
        .with_context(|| format!("cannot open {}", config.db_path().display()))?;
    let mut store =
        ReportStore::open(slot, StoreConfig::from(&app_config)).map_err(user_error)?;

    match name {
        "add" => add(&mut store, sub, &app_config),
        "list" => list(&store, sub),
        "status" => {
            let id = report_id(sub)?;
            let status = sub.get_one::<String>("status").context("no status given")?;
            let trimmed = store.update_status(&id, status).map_err(user_error)?;
            if let Some(trimmed) = trimmed {
                println!("{}", format::trimmed_notice(&trimmed));
            }
            println!("Report {id} is now {status}.");
            Ok(())
        }
        "rm" => {
            let id = report_id(sub)?;
            store.remove(&id).map_err(user_error)?;
            println!("Deleted report {id}.");
            Ok(())
        }
        "stats" => {
            format::print_stats(&store.stats());
            Ok(())
        }
        "map" => {
            let id = report_id(sub)?;
            let report = find(&store, &id)?;
            println!("{}", links::map_url(&app_config.map, report.location()));
            Ok(())
        }
        "route" => {
            let id = report_id(sub)?;
            let report = find(&store, &id)?;
            let from = coordinates(sub, "from-lat", "from-lon")?;
            println!(
                "{}",
                links::route_url(&app_config.map, from, report.location())
            );
            println!(
                "{}",
                links::graphhopper_route_url(&app_config.map, from, report.location())
            );
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn add(
    store: &mut ReportStore<RedbSlot>,
    sub: &ArgMatches,
    app_config: &AppConfig,
) -> anyhow::Result<()> {
    let image = sub.get_one::<String>("image").context("no image given")?;
    let image_data = image::read_data_uri(Path::new(image), &app_config.image)?;
    let location = coordinates(sub, "lat", "lon")?;

    let mut candidate = NewReport::new(image_data, location);
    candidate.description = sub.get_one::<String>("description").cloned();

    let outcome = store.add(candidate, chrono::Utc::now()).map_err(user_error)?;
    if let Some(trimmed) = &outcome.trimmed {
        println!("{}", format::trimmed_notice(trimmed));
    }
    println!("Report submitted: {}", outcome.id);
    Ok(())
}

fn list(store: &ReportStore<RedbSlot>, sub: &ArgMatches) -> anyhow::Result<()> {
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<Status>())
        .transpose()?;

    let reports = store.filter(status);
    if sub.get_flag("json") {
        format::print_reports_json(reports)
    } else {
        format::print_reports(reports);
        Ok(())
    }
}

/// Loads config.toml, replacing invalid values with defaults.
fn load_config(data_dir: &Path) -> anyhow::Result<AppConfig> {
    let path = AppConfig::path(data_dir);
    let config =
        AppConfig::load(&path).with_context(|| format!("cannot load {}", path.display()))?;

    let errors = config.validate();
    if errors.is_empty() {
        return Ok(config);
    }
    for error in &errors {
        warn!(path = %path.display(), "invalid config: {error}");
    }
    Ok(config.with_defaults_for_invalid())
}

fn report_id(sub: &ArgMatches) -> anyhow::Result<ReportId> {
    let raw = sub.get_one::<String>("id").context("no report id given")?;
    ReportId::try_from(raw.as_str()).with_context(|| format!("invalid report id '{raw}'"))
}

fn coordinates(sub: &ArgMatches, lat: &str, lon: &str) -> anyhow::Result<Coordinates> {
    let latitude = *sub
        .get_one::<f64>(lat)
        .with_context(|| format!("--{lat} is required"))?;
    let longitude = *sub
        .get_one::<f64>(lon)
        .with_context(|| format!("--{lon} is required"))?;
    Ok(Coordinates::new(latitude, longitude))
}

fn find<'a>(store: &'a ReportStore<RedbSlot>, id: &ReportId) -> anyhow::Result<&'a Report> {
    store
        .get(id)
        .ok_or_else(|| user_error(StoreError::NotFound(id.clone())))
}

fn user_error(error: StoreError) -> anyhow::Error {
    let message = format::user_message(&error);
    anyhow::Error::new(error).context(message)
}
