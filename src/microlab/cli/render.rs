//! # Rendering
//!
//! Turns command results into terminal text. Width math (truncation, padding,
//! relative ages) happens here in Rust; the templates in `templates.rs` only
//! arrange the pieces and choose styles through the `style` filter.
//!
//! Output goes through `outstanding`, which owns the `style` filter and the
//! theme lookup. Every `render_*` function has an `_internal` twin taking an
//! explicit color switch so tests can assert on plain text.

use super::styles::{names, MICROLAB_THEME};
use super::templates::{
    CONFIG_TEMPLATE, DETAIL_TEMPLATE, LIST_TEMPLATE, MESSAGES_TEMPLATE, STATS_TEMPLATE,
};
use chrono::{Local, NaiveDate};
use console::Term;
use microlab::api::{CmdMessage, MessageLevel, ReportDraft, StatusCounts};
use microlab::model::{Report, ReportStatus};
use outstanding::{render_with_color, ThemeChoice};
use serde::Serialize;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const SAMPLE_TYPE_WIDTH: usize = 8;
const STATUS_WIDTH: usize = 9;
const DETAIL_SEPARATOR: &str = "================================";

#[derive(Serialize)]
struct ReportLine {
    short_id: String,
    title: String,
    padding: String,
    sample_type: String,
    status: String,
    status_style: &'static str,
    age: String,
}

#[derive(Serialize)]
struct ListData {
    reports: Vec<ReportLine>,
    empty: bool,
}

#[derive(Serialize)]
struct DetailEntry<'a> {
    report: &'a Report,
    status: &'static str,
    status_style: &'static str,
    missing: Vec<&'static str>,
}

#[derive(Serialize)]
struct DetailData<'a> {
    entries: Vec<DetailEntry<'a>>,
    empty: bool,
    separator: &'static str,
}

#[derive(Serialize)]
struct StatsData {
    total: usize,
    draft: usize,
    completed: usize,
    sent: usize,
}

#[derive(Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct ConfigData {
    entries: Vec<ConfigEntry>,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: &'static str,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

fn use_color() -> bool {
    Term::stdout().features().colors_supported()
}

fn render_template<T: Serialize>(
    source: &str,
    data: &T,
    use_color: bool,
) -> Result<String, minijinja::Error> {
    render_with_color(source, data, ThemeChoice::from(&*MICROLAB_THEME), use_color)
}

fn status_style(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Draft => names::DRAFT,
        ReportStatus::Completed => names::COMPLETED,
        ReportStatus::Sent => names::SENT,
    }
}

/// One line per report: short id, title, sample type, status, age.
pub fn render_report_list(reports: &[Report]) -> String {
    render_report_list_internal(reports, Local::now().date_naive(), use_color())
}

fn render_report_list_internal(reports: &[Report], today: NaiveDate, use_color: bool) -> String {
    let fixed = 2 + 8 + 2 + 2 + SAMPLE_TYPE_WIDTH + 2 + STATUS_WIDTH + 2 + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);

    let lines = reports
        .iter()
        .map(|r| {
            let label = format!("{} · {}", r.title, r.sample_id);
            let title = truncate_to_width(&label, available);
            let padding = " ".repeat(available.saturating_sub(title.width()));
            ReportLine {
                short_id: format!("{:<8}", r.short_id()),
                title,
                padding,
                sample_type: format!("{:<width$}", r.sample_type.as_str(), width = SAMPLE_TYPE_WIDTH),
                status: format!("{:<width$}", r.status.label(), width = STATUS_WIDTH),
                status_style: status_style(r.status),
                age: format_age(r.date, today),
            }
        })
        .collect::<Vec<_>>();

    let data = ListData {
        empty: lines.is_empty(),
        reports: lines,
    };
    render_template(LIST_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// Every field of each report. Drafts also list what is still missing.
pub fn render_report_details(reports: &[Report]) -> String {
    render_report_details_internal(reports, use_color())
}

fn render_report_details_internal(reports: &[Report], use_color: bool) -> String {
    let entries = reports
        .iter()
        .map(|report| DetailEntry {
            report,
            status: report.status.label(),
            status_style: status_style(report.status),
            missing: if report.status == ReportStatus::Draft {
                ReportDraft::from_report(report).readiness()
            } else {
                Vec::new()
            },
        })
        .collect::<Vec<_>>();

    let data = DetailData {
        empty: entries.is_empty(),
        entries,
        separator: DETAIL_SEPARATOR,
    };
    render_template(DETAIL_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

pub fn render_stats(stats: &StatusCounts) -> String {
    render_stats_internal(stats, use_color())
}

fn render_stats_internal(stats: &StatusCounts, use_color: bool) -> String {
    let data = StatsData {
        total: stats.total(),
        draft: stats.draft,
        completed: stats.completed,
        sent: stats.sent,
    };
    render_template(STATS_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

pub fn render_config(entries: &[(String, String)]) -> String {
    let data = ConfigData {
        entries: entries
            .iter()
            .map(|(key, value)| ConfigEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
    };
    render_template(CONFIG_TEMPLATE, &data, use_color())
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_internal(messages, use_color())
}

fn render_messages_internal(messages: &[CmdMessage], use_color: bool) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let data = MessagesData {
        messages: messages
            .iter()
            .map(|msg| MessageData {
                content: msg.content.clone(),
                style: match msg.level {
                    MessageLevel::Info => names::INFO,
                    MessageLevel::Success => names::SUCCESS,
                    MessageLevel::Warning => names::WARNING,
                    MessageLevel::Error => names::ERROR,
                },
            })
            .collect(),
    };

    render_template(MESSAGES_TEMPLATE, &data, use_color).unwrap_or_else(|_| {
        messages
            .iter()
            .map(|m| format!("{}\n", m.content))
            .collect()
    })
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

/// "today" for reports created today, otherwise a rounded relative age.
fn format_age(date: NaiveDate, today: NaiveDate) -> String {
    let days = today.signed_duration_since(date).num_days();
    let text = if days <= 0 {
        "today".to_string()
    } else {
        let formatter = timeago::Formatter::new();
        formatter.convert(Duration::from_secs(days as u64 * 24 * 60 * 60))
    };
    format!("{:>width$}", text, width = TIME_WIDTH)
}
