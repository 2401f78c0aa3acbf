use crate::commands::CmdMessage;
use crate::error::{MicrolabError, Result};
use crate::store::{Hydration, ReportStore, SlotStorage};

/// A warning for commands that run on a store which started empty because
/// its saved reports could not be loaded.
pub fn recovery_warning<S: SlotStorage>(store: &ReportStore<S>) -> Option<CmdMessage> {
    match store.hydration() {
        Hydration::Recovered(reason) => Some(CmdMessage::warning(format!(
            "Saved reports could not be loaded ({}); started with an empty list",
            reason
        ))),
        _ => None,
    }
}

/// Resolve a user-typed reference to a stored report id.
///
/// An exact id wins. Otherwise the reference is treated as an id prefix and
/// must match exactly one report. `Ok(None)` means nothing matched.
pub fn resolve_id<S: SlotStorage>(store: &ReportStore<S>, reference: &str) -> Result<Option<String>> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(MicrolabError::Api("Report id cannot be empty".into()));
    }

    if store.get_by_id(reference).is_some() {
        return Ok(Some(reference.to_string()));
    }

    let mut candidates: Vec<&str> = store
        .list()
        .iter()
        .filter(|r| r.id.starts_with(reference))
        .map(|r| r.id.as_str())
        .collect();
    candidates.sort_unstable();
    candidates.dedup();

    match candidates.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.to_string())),
        many => Err(MicrolabError::Api(format!(
            "Id prefix '{}' is ambiguous ({} reports match)",
            reference,
            many.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{report_fixture, StoreFixture};

    fn fixture() -> StoreFixture {
        StoreFixture::new()
            .with_report(report_fixture("3f2a91c0", "A"))
            .with_report(report_fixture("3f7bd001", "B"))
            .with_report(report_fixture("3f", "C"))
    }

    #[test]
    fn exact_id_wins_over_prefix() {
        let f = fixture();
        assert_eq!(resolve_id(&f.store, "3f").unwrap().as_deref(), Some("3f"));
    }

    #[test]
    fn unique_prefix_resolves() {
        let f = fixture();
        assert_eq!(
            resolve_id(&f.store, "3f7").unwrap().as_deref(),
            Some("3f7bd001")
        );
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let f = StoreFixture::new()
            .with_report(report_fixture("abc1", "A"))
            .with_report(report_fixture("abc2", "B"));
        assert!(resolve_id(&f.store, "abc").is_err());
    }

    #[test]
    fn unknown_reference_is_none() {
        let f = fixture();
        assert_eq!(resolve_id(&f.store, "zz").unwrap(), None);
    }
}
