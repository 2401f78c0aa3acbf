use crate::commands::{CmdResult, StatusCounts};
use crate::error::Result;
use crate::model::ReportStatus;
use crate::store::{ReportStore, SlotStorage};

use super::helpers::recovery_warning;

/// Dashboard numbers: reports per status, plus a note when the store had to
/// start from scratch because its slot was unreadable.
pub fn run<S: SlotStorage>(store: &ReportStore<S>) -> Result<CmdResult> {
    let mut counts = StatusCounts::default();
    for report in store.list() {
        match report.status {
            ReportStatus::Draft => counts.draft += 1,
            ReportStatus::Completed => counts.completed += 1,
            ReportStatus::Sent => counts.sent += 1,
        }
    }

    let mut result = CmdResult::default().with_stats(counts);
    if let Some(warning) = recovery_warning(store) {
        result.add_message(warning);
    }
    Ok(result)
}
