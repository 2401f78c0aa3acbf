use crate::commands::{CmdMessage, CmdResult};
use crate::document::{file_name, render_markdown};
use crate::error::{MicrolabError, Result};
use crate::model::Report;
use crate::store::{ReportStore, SlotStorage};
use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::helpers::resolve_id;

/// Export reports as Markdown documents into `out_dir`.
///
/// With no references every report is exported. A single report becomes one
/// `.md` file; several are bundled into a `.tar.gz` archive.
pub fn run<S: SlotStorage, R: AsRef<str>>(
    store: &ReportStore<S>,
    references: &[R],
    out_dir: &Path,
    lab_name: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let reports = resolve_reports(store, references, &mut result)?;

    if reports.is_empty() {
        result.add_message(CmdMessage::info("No reports to export."));
        return Ok(result);
    }

    if !out_dir.exists() {
        fs::create_dir_all(out_dir).map_err(MicrolabError::Io)?;
    }

    let path = if let [report] = reports.as_slice() {
        let path = out_dir.join(file_name(report));
        fs::write(&path, render_markdown(report, lab_name)?).map_err(MicrolabError::Io)?;
        path
    } else {
        let now = Local::now();
        let path = out_dir.join(format!("microlab-{}.tar.gz", now.format("%Y-%m-%d_%H-%M-%S")));
        let file = File::create(&path).map_err(MicrolabError::Io)?;
        write_archive(file, &reports, lab_name)?;
        path
    };

    result.add_message(CmdMessage::success(format!(
        "Exported {} report(s) to {}",
        reports.len(),
        path.display()
    )));
    Ok(result
        .with_affected_reports(reports)
        .with_export_paths(vec![path]))
}

fn resolve_reports<S: SlotStorage, R: AsRef<str>>(
    store: &ReportStore<S>,
    references: &[R],
    result: &mut CmdResult,
) -> Result<Vec<Report>> {
    if references.is_empty() {
        return Ok(store.list().to_vec());
    }

    let mut reports = Vec::new();
    for reference in references {
        let reference = reference.as_ref();
        match resolve_id(store, reference)?.and_then(|id| store.get_by_id(&id).cloned()) {
            Some(report) => reports.push(report),
            None => result.add_message(CmdMessage::warning(format!(
                "Report not found: {}",
                reference
            ))),
        }
    }
    Ok(reports)
}

fn write_archive<W: Write>(writer: W, reports: &[Report], lab_name: &str) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for report in reports {
        let entry_name = format!(
            "microlab/{}-{}",
            report.short_id(),
            file_name(report)
        );
        let content = render_markdown(report, lab_name)?;

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, content.as_bytes())
            .map_err(MicrolabError::Io)?;
    }

    tar.into_inner()
        .and_then(|enc| enc.finish())
        .map_err(MicrolabError::Io)?;
    Ok(())
}
