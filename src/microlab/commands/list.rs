use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Report, ReportStatus, SampleType};
use crate::store::{ReportStore, SlotStorage};

use super::helpers::recovery_warning;

/// Listing filter. `None` on a field means "all".
///
/// The search term matches title, sample id or client name (any of them,
/// case-insensitive substring); status and sample type must match exactly.
/// All three conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub search: Option<String>,
    pub status: Option<ReportStatus>,
    pub sample_type: Option<SampleType>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.matches_search(report)
            && self.status.map_or(true, |s| report.status == s)
            && self.sample_type.map_or(true, |t| report.sample_type == t)
    }

    fn matches_search(&self, report: &Report) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let term = term.to_lowercase();
        [
            report.title.as_str(),
            report.sample_id.as_str(),
            report.client.name.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// Matching reports, in collection order.
    pub fn apply<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        reports.iter().filter(|r| self.matches(r)).collect()
    }
}

pub fn run<S: SlotStorage>(store: &ReportStore<S>, filter: &ReportFilter) -> Result<CmdResult> {
    let listed = filter.apply(store.list()).into_iter().cloned().collect();
    let mut result = CmdResult::default().with_listed_reports(listed);
    if let Some(warning) = recovery_warning(store) {
        result.add_message(warning);
    }
    Ok(result)
}
