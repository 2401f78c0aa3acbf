use crate::error::{MicrolabError, Result};
use crate::model::{CountUnit, SampleType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LAB_NAME: &str = "MicroLab";

/// Lab configuration, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct MicrolabConfig {
    /// Name printed in document headers and footers
    #[serde(default = "default_lab_name")]
    pub lab_name: String,

    /// Unit used when a count is entered without one
    #[serde(default)]
    pub default_unit: CountUnit,

    /// Sample type used when none is given on create
    #[serde(default)]
    pub default_sample_type: SampleType,
}

fn default_lab_name() -> String {
    DEFAULT_LAB_NAME.to_string()
}

impl Default for MicrolabConfig {
    fn default() -> Self {
        Self {
            lab_name: default_lab_name(),
            default_unit: CountUnit::default(),
            default_sample_type: SampleType::default(),
        }
    }
}

impl MicrolabConfig {
    pub const KEYS: &'static [&'static str] = &["lab-name", "default-unit", "default-sample-type"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MicrolabError::Io)?;
        let config: MicrolabConfig =
            serde_json::from_str(&content).map_err(MicrolabError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MicrolabError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MicrolabError::Serialization)?;
        fs::write(config_path, content).map_err(MicrolabError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "lab-name" => Some(self.lab_name.clone()),
            "default-unit" => Some(self.default_unit.to_string()),
            "default-sample-type" => Some(self.default_sample_type.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "lab-name" => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(MicrolabError::Config("lab-name cannot be empty".into()));
                }
                self.lab_name = name.to_string();
            }
            "default-unit" => {
                let unit = value.trim();
                if unit.is_empty() {
                    return Err(MicrolabError::Config("default-unit cannot be empty".into()));
                }
                self.default_unit = CountUnit::from(unit.to_string());
            }
            "default-sample-type" => {
                self.default_sample_type = value.parse().map_err(MicrolabError::Config)?;
            }
            other => {
                return Err(MicrolabError::Config(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(String, String)> {
        Self::KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}
