//! Report composition.
//!
//! A [`ReportDraft`] is raw form input: every field as typed, placeholder rows
//! included. [`ReportDraft::into_report`] turns it into a storable record;
//! [`run`] stamps id and date, applies the readiness gate and hands the
//! record to the store.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MicrolabError, Result};
use crate::model::{Client, MicroorganismCount, Report, ReportStatus, SampleType, TestResult};
use crate::store::{ReportStore, SlotStorage};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use super::helpers::recovery_warning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub title: String,
    pub sample_id: String,
    pub sample_type: SampleType,
    pub sample_description: String,
    pub collection_date: NaiveDate,
    pub analysis_date: NaiveDate,
    pub client: Client,
    pub microorganisms: Vec<MicroorganismCount>,
    /// `None` only for records that were stored without the list.
    pub additional_tests: Option<Vec<TestResult>>,
    pub conclusion: String,
    pub recommendations: String,
    pub analyst: String,
    pub supervisor: String,
    pub notes: String,
}

impl ReportDraft {
    /// An empty form dated `today` for both sample dates.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            sample_id: String::new(),
            sample_type: SampleType::default(),
            sample_description: String::new(),
            collection_date: today,
            analysis_date: today,
            client: Client::default(),
            microorganisms: Vec::new(),
            additional_tests: Some(Vec::new()),
            conclusion: String::new(),
            recommendations: String::new(),
            analyst: String::new(),
            supervisor: String::new(),
            notes: String::new(),
        }
    }

    /// Pre-fill the form from a stored report, for editing.
    pub fn from_report(report: &Report) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: report.title.clone(),
            sample_id: report.sample_id.clone(),
            sample_type: report.sample_type,
            sample_description: text(&report.sample_description),
            collection_date: report.collection_date,
            analysis_date: report.analysis_date,
            client: report.client.clone(),
            microorganisms: report.microorganisms.clone(),
            additional_tests: report.additional_tests.clone(),
            conclusion: report.conclusion.clone(),
            recommendations: text(&report.recommendations),
            analyst: report.analyst.clone(),
            supervisor: text(&report.supervisor),
            notes: text(&report.notes),
        }
    }

    /// Required items still missing. Empty means the report may be completed or sent.
    pub fn readiness(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.title) {
            missing.push("title");
        }
        if is_blank(&self.sample_id) {
            missing.push("sample id");
        }
        if is_blank(&self.client.name) {
            missing.push("client name");
        }
        if is_blank(&self.client.email) {
            missing.push("client email");
        }
        if !self.microorganisms.iter().any(|m| !is_blank(&m.name)) {
            missing.push("microorganism");
        }
        if is_blank(&self.conclusion) {
            missing.push("conclusion");
        }
        if is_blank(&self.analyst) {
            missing.push("analyst");
        }
        missing
    }

    /// Build the record. Rows with a blank name are dropped; blank optional
    /// text becomes absent.
    pub fn into_report(self, id: String, date: NaiveDate, status: ReportStatus) -> Report {
        let client = Client {
            name: self.client.name.trim().to_string(),
            email: self.client.email.trim().to_string(),
            institution: optional(self.client.institution.unwrap_or_default()),
            address: optional(self.client.address.unwrap_or_default()),
            phone: optional(self.client.phone.unwrap_or_default()),
        };

        let microorganisms = self
            .microorganisms
            .into_iter()
            .filter(|m| !is_blank(&m.name))
            .map(|m| MicroorganismCount {
                name: m.name.trim().to_string(),
                ..m
            })
            .collect();

        let additional_tests = self.additional_tests.map(|tests| {
            tests
                .into_iter()
                .filter(|t| !is_blank(&t.test_name))
                .map(|t| TestResult {
                    test_name: t.test_name.trim().to_string(),
                    result: t.result.trim().to_string(),
                    normal_range: t.normal_range.and_then(optional),
                    interpretation: t.interpretation.and_then(optional),
                })
                .collect()
        });

        Report {
            id,
            title: self.title.trim().to_string(),
            date,
            client,
            sample_id: self.sample_id.trim().to_string(),
            sample_type: self.sample_type,
            sample_description: optional(self.sample_description),
            collection_date: self.collection_date,
            analysis_date: self.analysis_date,
            microorganisms,
            additional_tests,
            conclusion: self.conclusion.trim().to_string(),
            recommendations: optional(self.recommendations),
            analyst: self.analyst.trim().to_string(),
            supervisor: optional(self.supervisor),
            notes: optional(self.notes),
            status,
        }
    }
}

pub fn run<S: SlotStorage>(
    store: &mut ReportStore<S>,
    draft: ReportDraft,
    status: ReportStatus,
) -> Result<CmdResult> {
    check_ready(&draft, status)?;

    let id = Uuid::new_v4().to_string();
    let today = Local::now().date_naive();
    let report = draft.into_report(id, today, status);

    let mut result = CmdResult::default();
    if let Some(warning) = recovery_warning(store) {
        result.add_message(warning);
    }
    result.add_message(CmdMessage::success(format!(
        "Report saved as {} ({}): {}",
        status,
        report.short_id(),
        report.title
    )));
    store.add(report.clone())?;
    Ok(result.with_affected_reports(vec![report]))
}

/// Drafts are always accepted; completed and sent reports must be ready.
pub(crate) fn check_ready(draft: &ReportDraft, status: ReportStatus) -> Result<()> {
    if status == ReportStatus::Draft {
        return Ok(());
    }
    let missing = draft.readiness();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MicrolabError::Incomplete(
            missing.into_iter().map(String::from).collect(),
        ))
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn optional(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
