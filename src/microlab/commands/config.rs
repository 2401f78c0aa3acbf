use crate::commands::{CmdMessage, CmdResult, MicrolabPaths};
use crate::config::MicrolabConfig;
use crate::error::{MicrolabError, Result};
use tracing::warn;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Show or change settings. A config file that cannot be read is replaced
/// by defaults, so `Set` also repairs it.
pub fn run(paths: &MicrolabPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = paths.data_dir()?;
    let mut result = CmdResult::default();
    let mut config = MicrolabConfig::load(&dir).unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        result.add_message(CmdMessage::warning(format!(
            "Config could not be read ({}); using defaults",
            e
        )));
        MicrolabConfig::default()
    });

    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Some(value) => result.add_message(CmdMessage::info(format!("{} = {}", key, value))),
            None => {
                return Err(MicrolabError::Config(format!("Unknown config key: {}", key)));
            }
        },
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(&dir)?;
            let shown = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
        }
    }

    Ok(result.with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SampleType;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> MicrolabPaths {
        MicrolabPaths::new(dir.path().to_path_buf())
    }

    #[test]
    fn set_persists_value() {
        let dir = TempDir::new().unwrap();
        run(
            &paths(&dir),
            ConfigAction::Set("default-sample-type".into(), "soil".into()),
        )
        .unwrap();

        let result = run(&paths(&dir), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config.unwrap().default_sample_type, SampleType::Soil);
    }

    #[test]
    fn show_key_reports_value() {
        let dir = TempDir::new().unwrap();
        let result = run(&paths(&dir), ConfigAction::ShowKey("lab-name".into())).unwrap();
        assert_eq!(result.messages[0].content, "lab-name = MicroLab");
    }

    #[test]
    fn broken_file_falls_back_and_set_repairs_it() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "not json").unwrap();

        let result = run(
            &paths(&dir),
            ConfigAction::Set("lab-name".into(), "Coastal Lab".into()),
        )
        .unwrap();
        assert_eq!(result.messages.len(), 2);
        assert!(result.messages[0].content.contains("using defaults"));

        let reloaded = MicrolabConfig::load(dir.path()).unwrap();
        assert_eq!(reloaded.lab_name, "Coastal Lab");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(run(&paths(&dir), ConfigAction::ShowKey("theme".into())).is_err());
    }
}
