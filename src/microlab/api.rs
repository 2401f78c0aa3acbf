//! # API Facade
//!
//! A thin layer over the commands. Every client goes through [`MicrolabApi`];
//! it dispatches to the command functions and hands back `CmdResult`s. It
//! holds no business logic and does no printing.
//!
//! `MicrolabApi<S: SlotStorage>` is generic over the slot backend:
//! `FileSlots` in production, `MemorySlots` in tests.
//!
//! Tests here only check dispatch and argument passing. Behavior is covered
//! in the command and store modules.

use crate::commands;
use crate::config::MicrolabConfig;
use crate::error::Result;
use crate::model::ReportStatus;
use crate::store::{ReportStore, SlotStorage};
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::create::ReportDraft;
pub use crate::commands::list::ReportFilter;
pub use crate::commands::{
    CmdMessage, CmdResult, MessageLevel, MicrolabPaths, StatusCounts,
};

/// Entry point for report operations.
pub struct MicrolabApi<S: SlotStorage> {
    store: ReportStore<S>,
    paths: MicrolabPaths,
    config: MicrolabConfig,
}

impl<S: SlotStorage> MicrolabApi<S> {
    pub fn new(store: ReportStore<S>, paths: MicrolabPaths, config: MicrolabConfig) -> Self {
        Self {
            store,
            paths,
            config,
        }
    }

    pub fn create_report(&mut self, draft: ReportDraft, status: ReportStatus) -> Result<CmdResult> {
        commands::create::run(&mut self.store, draft, status)
    }

    pub fn list_reports(&self, filter: &ReportFilter) -> Result<CmdResult> {
        commands::list::run(&self.store, filter)
    }

    pub fn view_reports<R: AsRef<str>>(&self, references: &[R]) -> Result<CmdResult> {
        commands::view::run(&self.store, references)
    }

    pub fn update_report<F>(
        &mut self,
        reference: &str,
        status: Option<ReportStatus>,
        edit: F,
    ) -> Result<CmdResult>
    where
        F: FnOnce(&mut ReportDraft) -> Result<()>,
    {
        commands::update::run(&mut self.store, reference, status, edit)
    }

    pub fn delete_reports<R: AsRef<str>>(&mut self, references: &[R]) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, references)
    }

    pub fn stats(&self) -> Result<CmdResult> {
        commands::stats::run(&self.store)
    }

    pub fn export_reports<R: AsRef<str>>(
        &self,
        references: &[R],
        out_dir: &Path,
    ) -> Result<CmdResult> {
        commands::export::run(&self.store, references, out_dir, &self.config.lab_name)
    }

    /// Read or change the lab configuration. A successful `Set` also refreshes
    /// the copy this facade renders documents with.
    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.paths, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }

    pub fn settings(&self) -> &MicrolabConfig {
        &self.config
    }

    pub fn store(&self) -> &ReportStore<S> {
        &self.store
    }
}
