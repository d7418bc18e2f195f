//! Dashboard configuration

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "WINGDISC_CONFIG";
/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "WINGDISC_DATA_DIR";
/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "wingdisc.json";

/// Where the tables live and how the window starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the three tables
    pub data_dir: PathBuf,

    /// Per-disc scalar measurements
    pub morphometrics_file: String,

    /// Long-form gradient samples
    pub profiles_file: String,

    /// Adult wing landmarks
    pub landmarks_file: String,

    /// Initial window size in points
    pub window_size: [f32; 2],

    pub dark_mode: bool,

    /// Per-view settings keyed by view type
    pub view_settings: HashMap<String, serde_json::Value>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            morphometrics_file: "mergedNormalizedGrad.csv".to_string(),
            profiles_file: "mergedRawGrad.csv".to_string(),
            landmarks_file: "mergedWingCoords.csv".to_string(),
            window_size: [1400.0, 900.0],
            dark_mode: false,
            view_settings: HashMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Find the config from the process environment and working directory
    pub fn discover() -> Result<Self, DataError> {
        Self::discover_with(|key| std::env::var(key).ok(), Path::new("."))
    }

    /// Lookup order: `WINGDISC_CONFIG`, `<cwd>/wingdisc.json`, defaults.
    /// `WINGDISC_DATA_DIR` then overrides the data directory.
    pub fn discover_with<F>(env: F, cwd: &Path) -> Result<Self, DataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let local = cwd.join(DEFAULT_CONFIG_FILE);

        let mut config = if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            tracing::info!("Loading config from {} ({})", path, CONFIG_ENV);
            Self::load(Path::new(&path))?
        } else if local.is_file() {
            tracing::info!("Loading config from {}", local.display());
            Self::load(&local)?
        } else {
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        if let Some(dir) = env(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn morphometrics_path(&self) -> PathBuf {
        self.data_dir.join(&self.morphometrics_file)
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.data_dir.join(&self.profiles_file)
    }

    pub fn landmarks_path(&self) -> PathBuf {
        self.data_dir.join(&self.landmarks_file)
    }

    /// Stored settings of one view type
    pub fn view_setting(&self, view_type: &str) -> Option<&serde_json::Value> {
        self.view_settings.get(view_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.morphometrics_path(), PathBuf::from("data/mergedNormalizedGrad.csv"));
        assert_eq!(config.profiles_path(), PathBuf::from("data/mergedRawGrad.csv"));
        assert_eq!(config.landmarks_path(), PathBuf::from("data/mergedWingCoords.csv"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: DashboardConfig = serde_json::from_str(r#"{"data_dir": "/srv/wing"}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/wing"));
        assert_eq!(config.profiles_file, "mergedRawGrad.csv");
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_discover_without_anything() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::discover_with(no_env, dir.path()).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_discover_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::default();
        config.landmarks_file = "coords.csv".to_string();
        config
            .view_settings
            .insert("landmark_map".to_string(), serde_json::json!({"show_letters": false}));
        config.save(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();

        let found = DashboardConfig::discover_with(no_env, dir.path()).unwrap();
        assert_eq!(found.landmarks_file, "coords.csv");
        assert_eq!(
            found.view_setting("landmark_map"),
            Some(&serde_json::json!({"show_letters": false}))
        );
    }

    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("custom.json");
        std::fs::write(&explicit, r#"{"morphometrics_file": "scalars.csv"}"#).unwrap();
        let explicit_str = explicit.to_string_lossy().to_string();

        let env = |key: &str| match key {
            CONFIG_ENV => Some(explicit_str.clone()),
            DATA_DIR_ENV => Some("/mnt/data".to_string()),
            _ => None,
        };

        let config = DashboardConfig::discover_with(env, dir.path()).unwrap();
        assert_eq!(config.morphometrics_path(), PathBuf::from("/mnt/data/scalars.csv"));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{not json").unwrap();
        let err = DashboardConfig::discover_with(no_env, dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Config(_)));
    }
}
