use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default = "default_vsync")]
    pub vsync: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            show_grid: false,
            vsync: default_vsync(),
        }
    }
}

impl GameSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self
    }
}

fn default_version() -> u32 {
    1
}

fn default_vsync() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("GRIDFALL_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("gridfall");
        path.push("settings.json");
        Self { path }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Unreadable or unparsable settings fall back to defaults; a broken
    /// config file must never stop the game from starting.
    pub fn load(&self) -> GameSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return GameSettings::default();
        };
        serde_json::from_slice::<GameSettings>(&bytes)
            .map(GameSettings::sanitized)
            .unwrap_or_default()
    }

    pub fn save(&self, settings: &GameSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gridfall_settings_{name}_{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = SettingsStore::at(temp_settings_path("missing"));
        assert_eq!(store.load(), GameSettings::default());
    }

    #[test]
    fn garbage_file_loads_defaults() {
        let path = temp_settings_path("garbage");
        fs::write(&path, b"{not json").expect("write temp file");
        let store = SettingsStore::at(path.clone());
        assert_eq!(store.load(), GameSettings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let path = temp_settings_path("roundtrip");
        let store = SettingsStore::at(path.clone());
        let settings = GameSettings {
            show_grid: true,
            vsync: false,
            ..GameSettings::default()
        };
        store.save(&settings).expect("save settings");
        assert_eq!(store.load(), settings);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: GameSettings =
            serde_json::from_str(r#"{"version":1}"#).expect("settings JSON should parse");
        assert!(!parsed.show_grid);
        assert!(parsed.vsync);
    }
}
