use crate::config::MicrolabConfig;
use crate::error::{MicrolabError, Result};
use crate::model::Report;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod list;
pub mod stats;
pub mod update;
pub mod view;

/// Directory holding the report slot and the config file.
#[derive(Debug, Clone)]
pub struct MicrolabPaths {
    pub data_dir: PathBuf,
}

impl MicrolabPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(MicrolabError::Store("Data directory is not set".to_string()));
        }
        Ok(self.data_dir.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Report counts per status, as shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub draft: usize,
    pub completed: usize,
    pub sent: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.draft + self.completed + self.sent
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_reports: Vec<Report>,
    pub listed_reports: Vec<Report>,
    pub export_paths: Vec<PathBuf>,
    pub stats: Option<StatusCounts>,
    pub config: Option<MicrolabConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_reports(mut self, reports: Vec<Report>) -> Self {
        self.affected_reports = reports;
        self
    }

    pub fn with_listed_reports(mut self, reports: Vec<Report>) -> Self {
        self.listed_reports = reports;
        self
    }

    pub fn with_export_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.export_paths = paths;
        self
    }

    pub fn with_stats(mut self, stats: StatusCounts) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_config(mut self, config: MicrolabConfig) -> Self {
        self.config = Some(config);
        self
    }
}
