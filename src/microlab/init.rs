use crate::api::{MicrolabApi, MicrolabPaths};
use crate::config::MicrolabConfig;
use crate::error::{MicrolabError, Result};
use crate::store::fs::FileSlots;
use crate::store::ReportStore;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct MicrolabContext {
    pub api: MicrolabApi<FileSlots>,
}

/// Pick the data directory: an explicit override wins, otherwise the
/// platform data dir for the application.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    ProjectDirs::from("com", "microlab", "microlab")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MicrolabError::Store("Could not determine data directory".into()))
}

/// Build the application context for `data_dir`.
///
/// A broken config file is not fatal: defaults are used and a warning is
/// traced. The report store never fails to open.
pub fn initialize(data_dir: PathBuf) -> Result<MicrolabContext> {
    debug!(data_dir = %data_dir.display(), "initializing");

    let config = MicrolabConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        MicrolabConfig::default()
    });

    let store = ReportStore::open(FileSlots::new(data_dir.clone()));
    let paths = MicrolabPaths::new(data_dir);
    let api = MicrolabApi::new(store, paths, config);

    Ok(MicrolabContext { api })
}
