use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{ReportStore, SlotStorage};

use super::helpers::resolve_id;

pub fn run<S: SlotStorage, R: AsRef<str>>(
    store: &mut ReportStore<S>,
    references: &[R],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for reference in references {
        let reference = reference.as_ref();
        let Some(id) = resolve_id(store, reference)? else {
            result.add_message(CmdMessage::info(format!(
                "No report with id {}, nothing deleted",
                reference
            )));
            continue;
        };

        let removed = store.delete_by_id(&id)?;
        for report in removed {
            result.add_message(CmdMessage::success(format!(
                "Report deleted ({}): {}",
                report.short_id(),
                report.title
            )));
            result.affected_reports.push(report);
        }
    }

    Ok(result)
}
