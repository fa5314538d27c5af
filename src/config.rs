// Engine configuration
// One TOML file holding the shared style contract, the highlight palette
// and the minimap settings. Loading is forgiving: a missing file yields the
// defaults silently, a malformed one yields the defaults with a warning.

use crate::error::ConfigError;
use crate::minimap::MinimapSettings;
use crate::overlay::StyleContract;
use crate::theme::Palette;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const QUALIFIER: &str = "io.github";
const ORGANIZATION: &str = "Inknote";
const APPLICATION: &str = "inknote";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub style: StyleContract,
    pub palette: Palette,
    pub minimap: MinimapSettings,
}

/// Default location of the config file, if the platform has one.
pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load a config file, falling back to defaults when it is missing or
/// malformed. A parse failure is logged, never propagated.
pub fn load_config(path: &Path) -> Config {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!("failed to parse config file {}: {err}", path.display());
            Config::default()
        }
    }
}

/// Write the config as pretty TOML, creating parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(config)?;
    fs::write(path, toml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/inknote/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = std::env::temp_dir().join("inknote-config-test");
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.style.font_size = 16.0;
        config.style.line_height = 24.0;
        config.palette.headings = "#ff0000".to_string();
        config.minimap.width = 96.0;

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path);
        assert_eq!(loaded, config);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("inknote-config-bad-test");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "style = \"not a table\"").unwrap();

        assert_eq!(load_config(&path), Config::default());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let toml = "[style]\nfont_size = 13.0\n";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.style.font_size, 13.0);
        assert_eq!(config.style.tab_size, StyleContract::default().tab_size);
        assert_eq!(config.palette, Palette::default());
    }
}
