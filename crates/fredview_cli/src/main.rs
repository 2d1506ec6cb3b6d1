//! FredView command-line entry point.
//!
//! # Responsibility
//! - Resolve settings, start logging and dispatch commands to core.
//! - Keep output plain text: one record per line, tab-separated.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SelectionArgs, ViewCommands};
use fredview_core::db::{open_db, open_db_read_only};
use fredview_core::{
    init_logging, load_series_payload, AppSettings, BrowseService, JsonViewConfigStore,
    SqliteObservationStore, SqliteObservationWriter, ViewConfig, ViewConfigStore, ViewSelection,
};
use log::info;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = AppSettings::from_env();
    start_logging(&settings)?;

    match cli.command {
        Commands::Ping => {
            println!("fredview_core ping={}", fredview_core::ping());
            println!("fredview_core version={}", fredview_core::core_version());
        }
        Commands::Series => {
            let conn = open_db_read_only(&settings.db_path)
                .with_context(|| format!("opening {}", settings.db_path.display()))?;
            let service = BrowseService::new(SqliteObservationStore::new(&conn));
            for series_id in service.list_series_ids()? {
                println!("{series_id}");
            }
        }
        Commands::Show { view, selection } => {
            let selection = match view {
                Some(name) => JsonViewConfigStore::new(&settings.views_path)
                    .load(&name)?
                    .selection(),
                None => to_selection(selection),
            };
            if selection.selected_series.is_empty() {
                bail!("select at least one series with --series or --view");
            }

            let conn = open_db_read_only(&settings.db_path)
                .with_context(|| format!("opening {}", settings.db_path.display()))?;
            let mut service = BrowseService::new(SqliteObservationStore::new(&conn));
            let output = service.browse(&selection)?;
            for row in output.table_rows() {
                println!("{}\t{}\t{}", row.date, row.value, row.series_id);
            }
        }
        Commands::Views { command } => run_views(&settings, command)?,
        Commands::Ingest { series_id, file } => ingest_file(&settings, &series_id, &file)?,
    }

    Ok(())
}

fn start_logging(settings: &AppSettings) -> Result<()> {
    let Some(log_dir) = settings.log_dir.as_ref() else {
        return Ok(());
    };
    let absolute = if log_dir.is_absolute() {
        log_dir.clone()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    let log_dir = absolute
        .to_str()
        .context("log directory must be valid UTF-8")?;
    init_logging(&settings.log_level, log_dir)?;
    Ok(())
}

fn run_views(settings: &AppSettings, command: ViewCommands) -> Result<()> {
    let store = JsonViewConfigStore::new(&settings.views_path);
    match command {
        ViewCommands::List => {
            for name in store.load_all().keys() {
                println!("{name}");
            }
        }
        ViewCommands::Show { name } => {
            let config = store.load(&name)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ViewCommands::Save {
            name,
            selection,
            theme,
        } => {
            let selection = to_selection(selection);
            let config = ViewConfig {
                name: name.clone(),
                selected_series: selection.selected_series,
                transform: selection.transform,
                formula: selection.formula,
                second_series: selection.second_series,
                theme,
            };
            store.save(&name, &config)?;
            println!(
                "saved view `{}` to {}",
                name.trim(),
                settings.views_path.display()
            );
        }
    }
    Ok(())
}

fn ingest_file(settings: &AppSettings, series_id: &str, file: &Path) -> Result<()> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let mut conn = open_db(&settings.db_path)
        .with_context(|| format!("opening {}", settings.db_path.display()))?;
    let mut writer = SqliteObservationWriter::new(&mut conn);
    let stored = load_series_payload(&mut writer, series_id, &body)?;
    info!("event=cli_ingest module=cli status=ok stored_rows={stored}");
    println!("{}: {stored} observations stored", series_id.trim());
    Ok(())
}

fn to_selection(args: SelectionArgs) -> ViewSelection {
    ViewSelection {
        selected_series: args.series,
        transform: args.transform,
        formula: args.formula,
        second_series: args.second,
    }
}
