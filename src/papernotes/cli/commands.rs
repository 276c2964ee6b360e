//! Dispatch from parsed arguments to the API, and from `CmdResult`s to the terminal.
//!
//! - `run()`: parses, installs logging, builds the context, dispatches
//! - `handle_*()`: per-command handlers that call the API and format output
//!
//! Whole-database operations never fail at the API level; their failures arrive as
//! error messages, which the handlers turn into a non-zero exit code.

use super::render::{print_full_records, print_messages, print_record_list, render_config};
use super::setup::{Cli, Commands, FieldArgs};
use clap::Parser;
use papernotes::api::{CmdMessage, CmdResult, ConfigAction};
use papernotes::error::Result;
use papernotes::filter::{parse_constraint, RecordFilter};
use papernotes::init::{data_dir, initialize, PapersContext};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let dir = data_dir()?;
    let mut ctx = initialize(&dir);

    match cli.command {
        Some(Commands::Add { fields }) => handle_add(&mut ctx, fields),
        Some(Commands::List {
            search,
            constraints,
        }) => handle_list(&ctx, search, constraints),
        Some(Commands::View { selectors }) => handle_view(&ctx, selectors),
        Some(Commands::Edit { selector, fields }) => handle_edit(&mut ctx, selector, fields),
        Some(Commands::Delete { selectors }) => handle_delete(&mut ctx, selectors),
        Some(Commands::Export { file, save }) => handle_export(&ctx, file, save),
        Some(Commands::Import { file }) => handle_import(&mut ctx, file),
        Some(Commands::Backup) => handle_backup(&ctx),
        Some(Commands::Restore) => handle_restore(&mut ctx),
        Some(Commands::Purge { yes }) => handle_purge(&mut ctx, yes),
        Some(Commands::Csv { file, save }) => handle_csv(&ctx, file, save),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, None, Vec::new()),
    }
}

/// Warnings by default; each `-v` lowers the threshold one level. `RUST_LOG` wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_add(ctx: &mut PapersContext, fields: FieldArgs) -> Result<()> {
    let result = ctx.api.add(fields.into_fields())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &PapersContext,
    search: Option<String>,
    constraints: Vec<String>,
) -> Result<()> {
    let mut filter = RecordFilter::all();
    for raw in &constraints {
        let (field, value) = parse_constraint(raw)?;
        filter = filter.with_field(field, value);
    }
    if let Some(term) = search {
        filter = filter.with_search(term);
    }

    let result = ctx.api.list(&filter)?;
    print_record_list(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &PapersContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.view(&selectors)?;
    print_full_records(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut PapersContext, selector: String, fields: FieldArgs) -> Result<()> {
    let result = ctx.api.update(&selector, &fields.into_patch())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut PapersContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.remove(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &PapersContext, file: Option<String>, save: bool) -> Result<()> {
    let result = ctx.api.export()?;
    print_messages(&result.messages);
    exit_on_errors(&result);

    let Some(snapshot) = result.snapshot else {
        return Ok(());
    };
    match output_path(file, save, &ctx.config.export_file) {
        Some(path) => {
            std::fs::write(&path, snapshot)?;
            print_messages(&[CmdMessage::success(format!(
                "Exported database to {}",
                path.display()
            ))]);
        }
        None => print_text(&snapshot),
    }
    Ok(())
}

fn handle_import(ctx: &mut PapersContext, file: String) -> Result<()> {
    let text = std::fs::read_to_string(&file)?;
    debug!(file = %file, bytes = text.len(), "Read import file");
    let result = ctx.api.import(&text, ctx.config.backup_before_import)?;
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

fn handle_backup(ctx: &PapersContext) -> Result<()> {
    let result = ctx.api.backup()?;
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

fn handle_restore(ctx: &mut PapersContext) -> Result<()> {
    let result = ctx.api.restore()?;
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

fn handle_purge(ctx: &mut PapersContext, yes: bool) -> Result<()> {
    if !yes {
        let count = ctx.api.purge_count();
        if count != Some(0) && !confirm_purge(count)? {
            print_messages(&[CmdMessage::info("Operation cancelled.")]);
            return Ok(());
        }
    }

    let result = ctx.api.purge()?;
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

/// `None` means the database could not be read; purging then resets it.
fn confirm_purge(count: Option<usize>) -> Result<bool> {
    match count {
        Some(count) => println!("This will permanently remove all {} records.", count),
        None => println!("The papers database cannot be read. Purging resets it to empty."),
    }
    print!("[Y] To purge: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "Y")
}

fn handle_csv(ctx: &PapersContext, file: Option<String>, save: bool) -> Result<()> {
    let result = ctx.api.csv()?;
    let Some(report) = result.report else {
        return Ok(());
    };

    match output_path(file, save, &ctx.config.csv_file) {
        Some(path) => {
            std::fs::write(&path, report)?;
            print_messages(&result.messages);
            print_messages(&[CmdMessage::success(format!(
                "Wrote report to {}",
                path.display()
            ))]);
        }
        None => print_text(&report),
    }
    Ok(())
}

fn handle_config(ctx: &PapersContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(&config.list_all()));
        }
    }
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

/// An explicit file wins; `--save` falls back to the configured name.
fn output_path(file: Option<String>, save: bool, configured: &str) -> Option<PathBuf> {
    match file {
        Some(file) => Some(PathBuf::from(file)),
        None if save => Some(PathBuf::from(configured)),
        None => None,
    }
}

/// Stdout output ending in exactly one newline.
fn print_text(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

fn exit_on_errors(result: &CmdResult) {
    if result.has_errors() {
        std::process::exit(1);
    }
}
