//! # Storage Layer
//!
//! Reports live in a single named slot of a key-value medium. The
//! [`SlotStorage`] trait is that medium; [`ReportStore`] owns the in-memory
//! collection and mirrors it into the slot.
//!
//! ## Implementations
//!
//! - [`fs::FileSlots`]: Production storage
//!   - One JSON file per slot: `<root>/<slot>.json`
//!   - Writes go to a temp file that is renamed over the slot
//!
//! - [`memory::MemorySlots`]: In-memory storage for testing
//!   - Clones share state, so a second store can re-hydrate from the first
//!   - Can simulate write failures
//!
//! ## Persistence Contract
//!
//! The slot always holds the *entire* collection as one JSON array. Every
//! mutation rewrites it in full after the in-memory change, so at rest the
//! slot and the collection agree. There is no incremental write.
//!
//! ```text
//! <data dir>/
//! ├── microbiologyReports.json   # JSON array of reports, insertion order
//! └── config.json                # Lab configuration
//! ```

use crate::error::{MicrolabError, Result};
use crate::model::Report;
use tracing::{debug, info, warn};

pub mod fs;
pub mod memory;

/// Name of the slot holding the report collection.
pub const REPORTS_SLOT: &str = "microbiologyReports";

/// Abstract interface for the key-value medium.
///
/// Methods take `&self`; the store is single-threaded and backends use
/// interior mutability where they need it.
pub trait SlotStorage {
    /// Read a slot. `Ok(None)` means the slot was never written.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace the whole slot with `value`.
    fn write_slot(&self, key: &str, value: &str) -> Result<()>;
}

/// How the store's initial collection was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// The slot did not exist.
    Empty,
    /// The slot held this many reports.
    Loaded(usize),
    /// The slot could not be read or parsed; the store started empty.
    Recovered(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Found,
    NotFound,
}

/// The authoritative report collection.
///
/// Built once by the application entry point and handed to whoever needs it;
/// there is no global instance. Insertion order is listing order.
pub struct ReportStore<S: SlotStorage> {
    storage: S,
    slot: String,
    reports: Vec<Report>,
    hydration: Hydration,
    /// Set when the slot could not be read or copied aside; writes are refused.
    write_block: Option<String>,
}

impl<S: SlotStorage> ReportStore<S> {
    /// Hydrate from the default reports slot.
    pub fn open(storage: S) -> Self {
        Self::open_slot(storage, REPORTS_SLOT)
    }

    /// Hydrate from a named slot. Never fails: unreadable state starts empty.
    ///
    /// Contents that cannot be loaded are kept in `<slot>.unreadable`. If even
    /// that is impossible, the store stays read-only so the original survives.
    pub fn open_slot(storage: S, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let mut write_block = None;

        let (reports, hydration) = match storage.read_slot(&slot) {
            Ok(None) => {
                debug!(slot = %slot, "slot absent, starting empty");
                (Vec::new(), Hydration::Empty)
            }
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Report>>(&raw) {
                Ok(reports) => {
                    debug!(slot = %slot, count = reports.len(), "hydrated reports");
                    let count = reports.len();
                    (reports, Hydration::Loaded(count))
                }
                Err(e) => {
                    warn!(slot = %slot, error = %e, "slot is not a report list, starting empty");
                    if let Err(keep_err) = preserve_unreadable(&storage, &slot, &raw) {
                        write_block = Some(format!("could not keep unparsable slot: {}", keep_err));
                    }
                    (Vec::new(), Hydration::Recovered(format!("unparsable slot: {}", e)))
                }
            },
            Err(e @ MicrolabError::UndecodableSlot { .. }) => {
                warn!(slot = %slot, error = %e, "slot undecodable, starting empty");
                (Vec::new(), Hydration::Recovered(e.to_string()))
            }
            Err(e) => {
                warn!(slot = %slot, error = %e, "slot unreadable, starting empty and read-only");
                write_block = Some(format!("slot was unreadable at startup: {}", e));
                (Vec::new(), Hydration::Recovered(format!("unreadable slot: {}", e)))
            }
        };

        Self {
            storage,
            slot,
            reports,
            hydration,
            write_block,
        }
    }

    /// All reports, in insertion order.
    pub fn list(&self) -> &[Report] {
        &self.reports
    }

    /// First report whose id equals `id`.
    pub fn get_by_id(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Append a report and rewrite the slot.
    ///
    /// The id is not checked for uniqueness; producers generate fresh ids.
    /// If the write fails the report stays in memory and the error is returned.
    pub fn add(&mut self, report: Report) -> Result<()> {
        debug!(id = %report.id, "adding report");
        self.reports.push(report);
        self.persist()
    }

    /// Remove every report with this id and rewrite the slot.
    ///
    /// Returns the removed reports; an unknown id removes nothing.
    pub fn delete_by_id(&mut self, id: &str) -> Result<Vec<Report>> {
        let (removed, kept): (Vec<Report>, Vec<Report>) =
            std::mem::take(&mut self.reports)
                .into_iter()
                .partition(|r| r.id == id);
        self.reports = kept;
        debug!(id = %id, removed = removed.len(), "deleting report");
        self.persist()?;
        Ok(removed)
    }

    /// Replace the report with this id, keeping its position, id and creation date.
    pub fn update_by_id(&mut self, id: &str, mut report: Report) -> Result<UpdateOutcome> {
        let Some(existing) = self.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        report.id = existing.id.clone();
        report.date = existing.date;
        *existing = report;
        debug!(id = %id, "updated report");
        self.persist()?;
        Ok(UpdateOutcome::Found)
    }

    /// Rewrite the slot from the current collection.
    pub fn flush(&mut self) -> Result<()> {
        self.persist()
    }

    pub fn hydration(&self) -> &Hydration {
        &self.hydration
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if let Some(reason) = &self.write_block {
            warn!(slot = %self.slot, reason = %reason, "refusing to overwrite slot");
            return Err(MicrolabError::Persist {
                slot: self.slot.clone(),
                reason: reason.clone(),
            });
        }
        let snapshot = serde_json::to_string_pretty(&self.reports)?;
        self.storage
            .write_slot(&self.slot, &snapshot)
            .map_err(|e| {
                warn!(slot = %self.slot, error = %e, "snapshot write failed");
                MicrolabError::Persist {
                    slot: self.slot.clone(),
                    reason: e.to_string(),
                }
            })?;
        debug!(slot = %self.slot, count = self.reports.len(), "snapshot written");
        Ok(())
    }
}

/// Copy an unparsable slot aside before the next mutation overwrites it.
fn preserve_unreadable<S: SlotStorage>(storage: &S, slot: &str, raw: &str) -> Result<()> {
    let backup = format!("{}.unreadable", slot);
    match storage.write_slot(&backup, raw) {
        Ok(()) => {
            info!(backup = %backup, "kept unparsable slot contents");
            Ok(())
        }
        Err(e) => {
            warn!(backup = %backup, error = %e, "could not keep unparsable slot contents");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReportStatus;
    use crate::store::fs::FileSlots;
    use crate::store::memory::fixtures::report_fixture;
    use crate::store::memory::MemorySlots;

    #[test]
    fn add_get_delete_scenario() {
        let mut store = ReportStore::open(MemorySlots::new());
        store.add(report_fixture("a", "T1")).unwrap();
        store.add(report_fixture("b", "T2")).unwrap();

        let titles: Vec<_> = store.list().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["T1", "T2"]);
        assert_eq!(store.get_by_id("b").unwrap().title, "T2");

        store.delete_by_id("a").unwrap();
        let titles: Vec<_> = store.list().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["T2"]);
        assert!(store.get_by_id("a").is_none());
    }

    #[test]
    fn keeps_one_record_per_id_in_call_order() {
        let mut store = ReportStore::open(MemorySlots::new());
        let ids = ["r1", "r2", "r3", "r4"];
        for id in ids {
            store.add(report_fixture(id, id)).unwrap();
        }
        let listed: Vec<_> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn rehydrates_equal_collection() {
        let slots = MemorySlots::new();
        let mut store = ReportStore::open(slots.clone());
        let mut second = report_fixture("b", "Second");
        second.additional_tests = Some(vec![]);
        second.notes = Some("handled with gloves".to_string());
        store.add(report_fixture("a", "First")).unwrap();
        store.add(second).unwrap();

        let reopened = ReportStore::open(slots);
        assert_eq!(reopened.list(), store.list());
        assert_eq!(reopened.hydration(), &Hydration::Loaded(2));
    }

    #[test]
    fn delete_twice_is_same_as_once() {
        let mut store = ReportStore::open(MemorySlots::new());
        store.add(report_fixture("a", "A")).unwrap();
        store.add(report_fixture("b", "B")).unwrap();

        let first = store.delete_by_id("a").unwrap();
        let after_first = store.list().to_vec();
        let second = store.delete_by_id("a").unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(store.list(), after_first.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_every_duplicate() {
        let mut store = ReportStore::open(MemorySlots::new());
        store.add(report_fixture("dup", "One")).unwrap();
        store.add(report_fixture("dup", "Two")).unwrap();

        assert_eq!(store.get_by_id("dup").unwrap().title, "One");
        assert_eq!(store.delete_by_id("dup").unwrap().len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn delete_persists_snapshot() {
        let slots = MemorySlots::new();
        let mut store = ReportStore::open(slots.clone());
        store.add(report_fixture("a", "A")).unwrap();
        store.delete_by_id("a").unwrap();

        assert_eq!(slots.raw(REPORTS_SLOT).as_deref(), Some("[]"));
    }

    #[test]
    fn absent_slot_starts_empty() {
        let store = ReportStore::open(MemorySlots::new());
        assert!(store.is_empty());
        assert_eq!(store.hydration(), &Hydration::Empty);
    }

    #[test]
    fn malformed_slot_starts_empty_and_is_kept_aside() {
        let slots = MemorySlots::new();
        slots.put(REPORTS_SLOT, "{not json");

        let store = ReportStore::open(slots.clone());
        assert!(store.is_empty());
        assert!(matches!(store.hydration(), Hydration::Recovered(_)));
        assert_eq!(
            slots.raw("microbiologyReports.unreadable").as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn undecodable_file_slot_is_kept_before_the_next_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf());
        let raw = b"[{\"id\":\"keep-me\",\"title\":\"caf\xE9\"}]".to_vec();
        std::fs::write(slots.slot_path(REPORTS_SLOT), &raw).unwrap();

        let mut store = ReportStore::open(slots);
        assert!(store.is_empty());
        assert!(matches!(store.hydration(), Hydration::Recovered(_)));

        store.add(report_fixture("a", "A")).unwrap();
        let backup = dir.path().join("microbiologyReports.unreadable.json");
        assert_eq!(std::fs::read(backup).unwrap(), raw);
        assert_eq!(
            ReportStore::open(FileSlots::new(dir.path().to_path_buf())).len(),
            1
        );
    }

    #[test]
    fn unreadable_slot_is_never_overwritten() {
        let slots = MemorySlots::new();
        slots.put(REPORTS_SLOT, "[]");
        slots.set_simulate_read_error(true);

        let mut store = ReportStore::open(slots.clone());
        assert!(matches!(store.hydration(), Hydration::Recovered(_)));

        let err = store.add(report_fixture("a", "A")).unwrap_err();
        assert!(matches!(err, MicrolabError::Persist { .. }));
        assert!(store.flush().is_err());
        assert_eq!(slots.raw(REPORTS_SLOT).as_deref(), Some("[]"));
    }

    #[test]
    fn failed_backup_makes_store_read_only() {
        let slots = MemorySlots::new();
        slots.put(REPORTS_SLOT, "{not json");
        slots.set_simulate_write_error(true);

        let mut store = ReportStore::open(slots.clone());
        slots.set_simulate_write_error(false);

        assert!(store.add(report_fixture("a", "A")).is_err());
        assert_eq!(slots.raw(REPORTS_SLOT).as_deref(), Some("{not json"));
    }

    #[test]
    fn write_failure_is_reported_but_memory_keeps_report() {
        let slots = MemorySlots::new();
        let mut store = ReportStore::open(slots.clone());
        slots.set_simulate_write_error(true);

        let err = store.add(report_fixture("a", "A")).unwrap_err();
        assert!(matches!(err, MicrolabError::Persist { .. }));
        assert!(store.get_by_id("a").is_some());
        assert_eq!(slots.raw(REPORTS_SLOT), None);

        slots.set_simulate_write_error(false);
        store.flush().unwrap();
        assert_eq!(ReportStore::open(slots).len(), 1);
    }

    #[test]
    fn update_replaces_in_place_keeping_id_and_date() {
        let mut store = ReportStore::open(MemorySlots::new());
        store.add(report_fixture("a", "A")).unwrap();
        store.add(report_fixture("b", "B")).unwrap();
        let original_date = store.get_by_id("a").unwrap().date;

        let mut replacement = report_fixture("zzz", "A revised");
        replacement.date = original_date.succ_opt().unwrap();
        replacement.status = ReportStatus::Completed;

        let outcome = store.update_by_id("a", replacement).unwrap();
        assert_eq!(outcome, UpdateOutcome::Found);

        let updated = &store.list()[0];
        assert_eq!(updated.id, "a");
        assert_eq!(updated.title, "A revised");
        assert_eq!(updated.date, original_date);
        assert_eq!(updated.status, ReportStatus::Completed);
        assert!(store.get_by_id("zzz").is_none());
    }

    #[test]
    fn update_unknown_id_does_not_write() {
        let slots = MemorySlots::new();
        let mut store = ReportStore::open(slots.clone());
        let outcome = store.update_by_id("nope", report_fixture("x", "X")).unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(slots.raw(REPORTS_SLOT), None);
    }
}
