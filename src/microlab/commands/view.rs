use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{ReportStore, SlotStorage};

use super::helpers::resolve_id;

/// Look up reports for display. A reference that matches nothing is reported
/// as a message; it is not an error.
pub fn run<S: SlotStorage, R: AsRef<str>>(
    store: &ReportStore<S>,
    references: &[R],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for reference in references {
        let reference = reference.as_ref();
        let found = resolve_id(store, reference)?
            .and_then(|id| store.get_by_id(&id).cloned());
        match found {
            Some(report) => result.listed_reports.push(report),
            None => result.add_message(CmdMessage::warning(format!(
                "Report not found: {}. It does not exist or has been deleted.",
                reference
            ))),
        }
    }

    Ok(result)
}
