use super::SlotStorage;
use crate::error::{MicrolabError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory slots for testing and development.
/// Does NOT persist data beyond the process.
///
/// Clones share the same slots, so a test can hand one clone to a store and
/// keep another to inspect what was written or to open a second store.
#[derive(Clone, Default)]
pub struct MemorySlots {
    slots: Rc<RefCell<HashMap<String, String>>>,
    simulate_write_error: Rc<Cell<bool>>,
    simulate_read_error: Rc<Cell<bool>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Enable read error simulation, as for a slot the medium cannot return.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Seed a slot directly, bypassing the failure switch.
    pub fn put(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Current raw contents of a slot.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl SlotStorage for MemorySlots {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(MicrolabError::Store("Simulated read error".to_string()));
        }
        Ok(self.raw(key))
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(MicrolabError::Store("Simulated write error".to_string()));
        }
        self.put(key, value);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{
        Client, CountUnit, MicroorganismCount, Report, ReportStatus, SampleType,
    };
    use crate::store::ReportStore;
    use chrono::NaiveDate;

    /// A complete draft report with the given id and title.
    pub fn report_fixture(id: &str, title: &str) -> Report {
        let day = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        Report {
            id: id.to_string(),
            title: title.to_string(),
            date: day,
            client: Client {
                name: "Harbor Foods".to_string(),
                email: "qa@harborfoods.test".to_string(),
                ..Client::default()
            },
            sample_id: format!("S-{}", id),
            sample_type: SampleType::Water,
            sample_description: None,
            collection_date: day,
            analysis_date: day,
            microorganisms: vec![MicroorganismCount::new(
                "Total coliforms",
                3,
                CountUnit::CfuPer100Ml,
            )],
            additional_tests: None,
            conclusion: "Within limits".to_string(),
            recommendations: None,
            analyst: "M. Ortiz".to_string(),
            supervisor: None,
            notes: None,
            status: ReportStatus::Draft,
        }
    }

    pub struct StoreFixture {
        pub store: ReportStore<MemorySlots>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: ReportStore::open(MemorySlots::new()),
            }
        }

        pub fn with_report(mut self, report: Report) -> Self {
            self.store.add(report).unwrap();
            self
        }

        pub fn with_reports(mut self, count: usize) -> Self {
            for i in 0..count {
                let id = format!("report-{}", i + 1);
                let title = format!("Test Report {}", i + 1);
                self.store.add(report_fixture(&id, &title)).unwrap();
            }
            self
        }

        pub fn with_status(mut self, id: &str, status: ReportStatus) -> Self {
            let mut report = report_fixture(id, &format!("{} report", status.label()));
            report.status = status;
            self.store.add(report).unwrap();
            self
        }
    }
}
