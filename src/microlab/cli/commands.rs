//! # CLI Layer
//!
//! One client of the microlab library. This is the only place that knows
//! about stdout, stderr, and exit codes.
//!
//! - `run()`: parses arguments, installs logging, builds the context, dispatches
//! - `handle_*()`: one per command; call the API and print what comes back
//! - `apply_fields()`: folds report flags into a [`ReportDraft`]
//!
//! Business rules (readiness, id resolution, persistence) live below the API;
//! tests here cover argument folding only.

use super::render::{
    print_messages, render_config, render_report_details, render_report_list, render_stats,
};
use super::setup::{Choice, Cli, Commands, ReportArgs};
use chrono::Local;
use clap::Parser;
use microlab::api::{ConfigAction, MicrolabApi, ReportDraft, ReportFilter};
use microlab::error::{MicrolabError, Result};
use microlab::init::{initialize, resolve_data_dir};
use microlab::model::{CountUnit, MicroorganismCount, ReportStatus, SampleType, TestResult};
use microlab::store::fs::FileSlots;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MICROLAB_LOG";

struct AppContext {
    api: MicrolabApi<FileSlots>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let mut ctx = AppContext {
        api: initialize(data_dir)?.api,
    };

    match cli.command {
        Some(Commands::Create { fields, status }) => handle_create(&mut ctx, fields, status),
        Some(Commands::List {
            search,
            status,
            sample_type,
        }) => handle_list(&ctx, search, status, sample_type),
        Some(Commands::View { ids }) => handle_view(&ctx, ids),
        Some(Commands::Edit { id, fields, status }) => handle_edit(&mut ctx, id, fields, status),
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, ids),
        Some(Commands::Export { ids, output }) => handle_export(&ctx, ids, output),
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_dashboard(&ctx),
    }
}

/// Diagnostics go to stderr. `MICROLAB_LOG` takes an `EnvFilter` directive;
/// without it the level follows `-v`.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "microlab=debug",
        _ => "trace",
    };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn handle_create(ctx: &mut AppContext, fields: ReportArgs, status: ReportStatus) -> Result<()> {
    let settings = ctx.api.settings().clone();
    let mut draft = ReportDraft::new(Local::now().date_naive());
    draft.sample_type = settings.default_sample_type;
    apply_fields(&mut draft, fields, &settings.default_unit)?;

    let result = ctx.api.create_report(draft, status)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    search: Option<String>,
    status: Choice<ReportStatus>,
    sample_type: Choice<SampleType>,
) -> Result<()> {
    let filter = ReportFilter {
        search: search.filter(|s| !s.trim().is_empty()),
        status: status.only(),
        sample_type: sample_type.only(),
    };
    let result = ctx.api.list_reports(&filter)?;
    print!("{}", render_report_list(&result.listed_reports));
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.view_reports(&ids)?;
    if !result.listed_reports.is_empty() {
        print!("{}", render_report_details(&result.listed_reports));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    id: String,
    fields: ReportArgs,
    status: Option<ReportStatus>,
) -> Result<()> {
    let default_unit = ctx.api.settings().default_unit.clone();
    let result = ctx
        .api
        .update_report(&id, status, |draft| apply_fields(draft, fields, &default_unit))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_reports(&ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, ids: Vec<String>, output: PathBuf) -> Result<()> {
    let result = ctx.api.export_reports(&ids, &output)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print!("{}", render_stats(stats));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(&config.list_all()));
        }
    }
    print_messages(&result.messages);
    Ok(())
}

/// Bare `microlab`: counts, then every report. Messages come from the stats
/// half only, so a recovery warning shows once.
fn handle_dashboard(ctx: &AppContext) -> Result<()> {
    handle_stats(ctx)?;
    println!();
    let listed = ctx.api.list_reports(&ReportFilter::default())?;
    print!("{}", render_report_list(&listed.listed_reports));
    Ok(())
}

/// Overwrite the draft with every flag that was given. Row flags replace
/// the whole list.
fn apply_fields(draft: &mut ReportDraft, args: ReportArgs, default_unit: &CountUnit) -> Result<()> {
    if let Some(v) = args.title {
        draft.title = v;
    }
    if let Some(v) = args.sample_id {
        draft.sample_id = v;
    }
    if let Some(v) = args.sample_type {
        draft.sample_type = v;
    }
    if let Some(v) = args.description {
        draft.sample_description = v;
    }
    if let Some(v) = args.collected {
        draft.collection_date = v;
    }
    if let Some(v) = args.analyzed {
        draft.analysis_date = v;
    }
    if let Some(v) = args.client {
        draft.client.name = v;
    }
    if let Some(v) = args.email {
        draft.client.email = v;
    }
    if args.institution.is_some() {
        draft.client.institution = args.institution;
    }
    if args.phone.is_some() {
        draft.client.phone = args.phone;
    }
    if args.address.is_some() {
        draft.client.address = args.address;
    }
    if !args.organisms.is_empty() {
        draft.microorganisms = args
            .organisms
            .iter()
            .map(|entry| parse_organism(entry, default_unit))
            .collect::<Result<_>>()?;
    }
    if !args.tests.is_empty() {
        draft.additional_tests = Some(
            args.tests
                .iter()
                .map(|entry| parse_test(entry))
                .collect::<Result<_>>()?,
        );
    }
    if let Some(v) = args.conclusion {
        draft.conclusion = v;
    }
    if let Some(v) = args.recommendations {
        draft.recommendations = v;
    }
    if let Some(v) = args.analyst {
        draft.analyst = v;
    }
    if let Some(v) = args.supervisor {
        draft.supervisor = v;
    }
    if let Some(v) = args.notes {
        draft.notes = v;
    }
    Ok(())
}

/// `NAME:COUNT[:UNIT]`
fn parse_organism(entry: &str, default_unit: &CountUnit) -> Result<MicroorganismCount> {
    let mut parts = split_entry(entry, 3)?.into_iter();
    let name = parts.next().unwrap_or_default();
    let count = parts
        .next()
        .ok_or_else(|| MicrolabError::Api(format!("Missing count in '{}'", entry)))?;
    let count: u64 = count
        .parse()
        .map_err(|_| MicrolabError::Api(format!("Invalid count '{}' in '{}'", count, entry)))?;
    let unit = match parts.next() {
        Some(unit) if !unit.is_empty() => CountUnit::from(unit),
        _ => default_unit.clone(),
    };
    Ok(MicroorganismCount::new(name, count, unit))
}

/// `NAME:RESULT[:RANGE[:INTERPRETATION]]`
fn parse_test(entry: &str) -> Result<TestResult> {
    let mut parts = split_entry(entry, 4)?.into_iter();
    let test_name = parts.next().unwrap_or_default();
    let result = parts
        .next()
        .ok_or_else(|| MicrolabError::Api(format!("Missing result in '{}'", entry)))?;
    let mut optional = || parts.next().filter(|s| !s.is_empty());
    Ok(TestResult {
        test_name,
        result,
        normal_range: optional(),
        interpretation: optional(),
    })
}

/// Split a row flag on `:` into at most `max` trimmed parts. A backslash
/// makes the next character literal, so `1\:10` stays one part.
fn split_entry(entry: &str, max: usize) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = entry.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.push(chars.next().unwrap_or('\\')),
            ':' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);

    if parts.len() > max {
        return Err(MicrolabError::Api(format!(
            "Too many ':' in '{}' (write a literal colon as \\:)",
            entry
        )));
    }
    Ok(parts.into_iter().map(|p| p.trim().to_string()).collect())
}
