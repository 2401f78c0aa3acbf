use thiserror::Error;

#[derive(Error, Debug)]
pub enum MicrolabError {
    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    /// The in-memory collection changed but the slot could not be written.
    #[error("Could not persist slot '{slot}': {reason}")]
    Persist { slot: String, reason: String },

    /// The slot could not be decoded; its raw bytes were copied to `backup`.
    #[error("Slot '{slot}' is not valid text; original bytes kept in '{backup}'")]
    UndecodableSlot { slot: String, backup: String },

    #[error("Report is incomplete, missing: {}", .0.join(", "))]
    Incomplete(Vec<String>),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, MicrolabError>;
