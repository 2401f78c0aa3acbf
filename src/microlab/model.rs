//! Report record schema.
//!
//! These types are the persisted shape of a report. Field names and enum
//! strings are part of the on-disk format, so every rename here is a format
//! change: `sampleId`, `"Water"`, `"draft"`, `"CFU/mL"` and so on must stay as
//! they are.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Unit a microorganism count is expressed in.
///
/// The four laboratory units are recognised; anything else is carried
/// verbatim so records written with a custom unit survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CountUnit {
    CfuPerMl,
    CfuPerG,
    CfuPer100Ml,
    MpnPer100Ml,
    Other(String),
}

impl CountUnit {
    pub fn as_str(&self) -> &str {
        match self {
            CountUnit::CfuPerMl => "CFU/mL",
            CountUnit::CfuPerG => "CFU/g",
            CountUnit::CfuPer100Ml => "CFU/100mL",
            CountUnit::MpnPer100Ml => "MPN/100mL",
            CountUnit::Other(s) => s.as_str(),
        }
    }
}

impl Default for CountUnit {
    fn default() -> Self {
        CountUnit::CfuPerMl
    }
}

impl From<String> for CountUnit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CFU/mL" => CountUnit::CfuPerMl,
            "CFU/g" => CountUnit::CfuPerG,
            "CFU/100mL" => CountUnit::CfuPer100Ml,
            "MPN/100mL" => CountUnit::MpnPer100Ml,
            _ => CountUnit::Other(s),
        }
    }
}

impl From<CountUnit> for String {
    fn from(unit: CountUnit) -> Self {
        match unit {
            CountUnit::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroorganismCount {
    pub name: String,
    pub count: u64,
    pub unit: CountUnit,
}

impl MicroorganismCount {
    pub fn new(name: impl Into<String>, count: u64, unit: CountUnit) -> Self {
        Self {
            name: name.into(),
            count,
            unit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_name: String,
    /// Free text; qualitative results ("Negative") are as valid as numbers.
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleType {
    Water,
    Food,
    Soil,
    Clinical,
    Air,
    Surface,
    Other,
}

impl SampleType {
    pub fn all() -> &'static [SampleType] {
        &[
            SampleType::Water,
            SampleType::Food,
            SampleType::Soil,
            SampleType::Clinical,
            SampleType::Air,
            SampleType::Surface,
            SampleType::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleType::Water => "Water",
            SampleType::Food => "Food",
            SampleType::Soil => "Soil",
            SampleType::Clinical => "Clinical",
            SampleType::Air => "Air",
            SampleType::Surface => "Surface",
            SampleType::Other => "Other",
        }
    }
}

impl Default for SampleType {
    fn default() -> Self {
        SampleType::Water
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SampleType::all()
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown sample type: {}", s))
    }
}

/// Lifecycle tag. Any value may follow any other; nothing enforces transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Completed,
    Sent,
}

impl ReportStatus {
    pub fn all() -> &'static [ReportStatus] {
        &[
            ReportStatus::Draft,
            ReportStatus::Completed,
            ReportStatus::Sent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Completed => "completed",
            ReportStatus::Sent => "sent",
        }
    }

    /// "Draft", "Completed", "Sent" for headings and badges.
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "Draft",
            ReportStatus::Completed => "Completed",
            ReportStatus::Sent => "Sent",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::all()
            .iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Opaque lookup key, fixed at creation.
    pub id: String,
    pub title: String,
    /// Creation date, stamped by the composer.
    pub date: NaiveDate,
    pub client: Client,
    pub sample_id: String,
    pub sample_type: SampleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_description: Option<String>,
    pub collection_date: NaiveDate,
    pub analysis_date: NaiveDate,
    /// Entry order is display order.
    pub microorganisms: Vec<MicroorganismCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_tests: Option<Vec<TestResult>>,
    pub conclusion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    pub analyst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ReportStatus,
}

impl Report {
    /// First eight characters of the id, enough to tell reports apart in a listing.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn tests(&self) -> &[TestResult] {
        self.additional_tests.as_deref().unwrap_or(&[])
    }
}
