use crate::commands::create::{check_ready, ReportDraft};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MicrolabError, Result};
use crate::model::ReportStatus;
use crate::store::{ReportStore, SlotStorage, UpdateOutcome};

use super::helpers::resolve_id;

/// Edit a stored report.
///
/// The stored record is loaded into a [`ReportDraft`], `edit` changes it, and
/// the result replaces the record in place. Id and creation date never change.
/// `status` keeps the current status when `None`; the readiness gate applies
/// exactly as on create.
pub fn run<S, F>(
    store: &mut ReportStore<S>,
    reference: &str,
    status: Option<ReportStatus>,
    edit: F,
) -> Result<CmdResult>
where
    S: SlotStorage,
    F: FnOnce(&mut ReportDraft) -> Result<()>,
{
    let existing = resolve_id(store, reference)?
        .and_then(|id| store.get_by_id(&id).cloned())
        .ok_or_else(|| MicrolabError::ReportNotFound(reference.to_string()))?;

    let mut result = CmdResult::default();
    if existing.status != ReportStatus::Draft {
        result.add_message(CmdMessage::warning(format!(
            "Report {} was already {}",
            existing.short_id(),
            existing.status
        )));
    }

    let mut draft = ReportDraft::from_report(&existing);
    edit(&mut draft)?;

    let status = status.unwrap_or(existing.status);
    check_ready(&draft, status)?;

    let updated = draft.into_report(existing.id.clone(), existing.date, status);
    match store.update_by_id(&existing.id, updated.clone())? {
        UpdateOutcome::Found => {
            result.add_message(CmdMessage::success(format!(
                "Report updated ({}): {}",
                updated.short_id(),
                updated.title
            )));
            Ok(result.with_affected_reports(vec![updated]))
        }
        UpdateOutcome::NotFound => Err(MicrolabError::ReportNotFound(existing.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::{report_fixture, StoreFixture};

    #[test]
    fn edits_fields_and_keeps_identity() {
        let mut f = StoreFixture::new()
            .with_report(report_fixture("r1", "Before"))
            .with_report(report_fixture("r2", "Other"));
        let date = f.store.get_by_id("r1").unwrap().date;

        let result = run(&mut f.store, "r1", Some(ReportStatus::Completed), |d| {
            d.title = "After".into();
            Ok(())
        })
        .unwrap();

        let stored = &f.store.list()[0];
        assert_eq!(stored.id, "r1");
        assert_eq!(stored.title, "After");
        assert_eq!(stored.date, date);
        assert_eq!(stored.status, ReportStatus::Completed);
        assert_eq!(result.affected_reports[0], *stored);
        assert!(result.messages.iter().all(|m| m.level == MessageLevel::Success));
    }

    #[test]
    fn completing_requires_readiness() {
        let mut f = StoreFixture::new().with_report(report_fixture("r1", "Draft"));

        let err = run(&mut f.store, "r1", Some(ReportStatus::Sent), |d| {
            d.analyst.clear();
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, MicrolabError::Incomplete(_)));
        assert_eq!(f.store.list()[0].analyst, "M. Ortiz");
    }

    #[test]
    fn editing_a_sent_report_warns() {
        let mut f = StoreFixture::new().with_status("s1", ReportStatus::Sent);

        let result = run(&mut f.store, "s1", None, |d| {
            d.notes = "corrected typo".into();
            Ok(())
        })
        .unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(f.store.list()[0].status, ReportStatus::Sent);
        assert_eq!(f.store.list()[0].notes.as_deref(), Some("corrected typo"));
    }

    #[test]
    fn unknown_report_is_not_found() {
        let mut f = StoreFixture::new();
        let err = run(&mut f.store, "nope", None, |_| Ok(())).unwrap_err();
        assert!(matches!(err, MicrolabError::ReportNotFound(_)));
    }
}
