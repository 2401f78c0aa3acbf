use super::SlotStorage;
use crate::error::{MicrolabError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

/// File-backed slots: each slot is `<root>/<key>.json`.
pub struct FileSlots {
    root: PathBuf,
}

impl FileSlots {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(MicrolabError::Io)?;
        }
        Ok(())
    }
}

impl SlotStorage for FileSlots {
    /// Undecodable bytes are copied to `<key>.unreadable.json` before the
    /// error is returned, since the caller only ever sees text.
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let bytes = match fs::read(self.slot_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MicrolabError::Io(e)),
        };

        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(content)),
            Err(e) => {
                let backup = format!("{}.unreadable", key);
                let backup_path = self.slot_path(&backup);
                warn!(slot = %key, error = %e, "slot is not valid UTF-8");
                fs::write(&backup_path, e.as_bytes()).map_err(MicrolabError::Io)?;
                Err(MicrolabError::UndecodableSlot {
                    slot: key.to_string(),
                    backup,
                })
            }
        }
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;

        // Write beside the target and rename so readers never see half a slot
        let tmp_file = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_file, value).map_err(MicrolabError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, self.slot_path(key)) {
            let _ = fs::remove_file(&tmp_file);
            return Err(MicrolabError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_slot_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf());
        assert_eq!(slots.read_slot("microbiologyReports").unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().join("nested"));
        slots.write_slot("reports", "[1,2]").unwrap();

        assert_eq!(slots.read_slot("reports").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested").join("reports.json").exists());
    }

    #[test]
    fn undecodable_slot_is_copied_aside() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf());
        let raw = b"[{\"id\":\"keep-me\",\"title\":\"caf\xE9\"}]".to_vec();
        fs::write(slots.slot_path("reports"), &raw).unwrap();

        let err = slots.read_slot("reports").unwrap_err();
        assert!(matches!(err, MicrolabError::UndecodableSlot { .. }));
        assert_eq!(fs::read(slots.slot_path("reports.unreadable")).unwrap(), raw);
        assert_eq!(fs::read(slots.slot_path("reports")).unwrap(), raw);
    }

    #[test]
    fn overwrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf());
        slots.write_slot("reports", "[]").unwrap();
        slots.write_slot("reports", "[{}]").unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
        assert_eq!(slots.read_slot("reports").unwrap().as_deref(), Some("[{}]"));
    }
}
