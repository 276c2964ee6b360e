use crate::error::{PapersError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_CSV_FILE: &str = "papers.csv";
const DEFAULT_EXPORT_FILE: &str = "papers-export.json";

/// Configuration for the catalog, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PapersConfig {
    /// Where `csv --save` writes the report
    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    /// Where `export --save` writes the snapshot
    #[serde(default = "default_export_file")]
    pub export_file: String,

    /// Take a backup before `import` replaces the database
    #[serde(default)]
    pub backup_before_import: bool,
}

fn default_csv_file() -> String {
    DEFAULT_CSV_FILE.to_string()
}

fn default_export_file() -> String {
    DEFAULT_EXPORT_FILE.to_string()
}

impl Default for PapersConfig {
    fn default() -> Self {
        Self {
            csv_file: default_csv_file(),
            export_file: default_export_file(),
            backup_before_import: false,
        }
    }
}

impl PapersConfig {
    pub const KEYS: [&'static str; 3] = ["csv-file", "export-file", "backup-before-import"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PapersError::Io)?;
        let config: PapersConfig =
            serde_json::from_str(&content).map_err(PapersError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PapersError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PapersError::Serialization)?;
        fs::write(config_path, content).map_err(PapersError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "csv-file" => Some(self.csv_file.clone()),
            "export-file" => Some(self.export_file.clone()),
            "backup-before-import" => Some(self.backup_before_import.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "csv-file" | "export-file" if value.trim().is_empty() => {
                Err(PapersError::Api(format!("{} cannot be empty", key)))
            }
            "csv-file" => {
                self.csv_file = value.trim().to_string();
                Ok(())
            }
            "export-file" => {
                self.export_file = value.trim().to_string();
                Ok(())
            }
            "backup-before-import" => {
                self.backup_before_import = parse_bool(value).ok_or_else(|| {
                    PapersError::Api(format!(
                        "Invalid value for {}: {} (expected true or false)",
                        key, value
                    ))
                })?;
                Ok(())
            }
            _ => Err(PapersError::Api(format!("Unknown config key: {}", key))),
        }
    }

    pub fn list_all(&self) -> Vec<(String, String)> {
        Self::KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
