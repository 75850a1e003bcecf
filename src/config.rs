//! Game configuration
//!
//! Window, timing, and presentation settings, loadable from RON files.
//! Every field has a default, so a config file only needs to name the
//! fields it overrides.

use std::fmt;
use std::path::Path;

use macroquad::prelude::{Color, Conf};
use serde::{Deserialize, Serialize};

/// Configuration load/save errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Window and loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub fullscreen: bool,
    pub high_dpi: bool,
    pub resizable: bool,
    /// Background clear color as RGBA bytes.
    pub clear_color: [u8; 4],
    /// Maximum frames per second; 0 leaves the framerate uncapped.
    pub fps_cap: u32,
    /// Fixed-update rate in Hz; 0 disables the fixed-update phase.
    pub tick_rate: f32,
    /// Ceiling on accumulated fixed-update time after a stall, in seconds.
    pub max_accumulated_time: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "kiln game".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            high_dpi: true,
            resizable: true,
            clear_color: [30, 30, 35, 255],
            fps_cap: 0,
            tick_rate: 20.0,
            max_accumulated_time: 0.25,
        }
    }
}

impl GameConfig {
    /// Load a config from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save this config as pretty-printed RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// The macroquad window configuration for these settings.
    pub fn window_conf(&self) -> Conf {
        Conf {
            window_title: self.title.clone(),
            window_width: self.width,
            window_height: self.height,
            fullscreen: self.fullscreen,
            high_dpi: self.high_dpi,
            window_resizable: self.resizable,
            ..Default::default()
        }
    }

    /// The clear color as a macroquad color.
    pub fn clear_color(&self) -> Color {
        let [r, g, b, a] = self.clear_color;
        Color::from_rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.fps_cap, 0);
        assert_eq!(config.tick_rate, 20.0);
        assert!(!config.fullscreen);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");

        let mut config = GameConfig::default();
        config.title = "test window".to_string();
        config.tick_rate = 120.0;
        config.fps_cap = 60;
        config.save(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.title, "test window");
        assert_eq!(loaded.tick_rate, 120.0);
        assert_eq!(loaded.fps_cap, 60);
        assert_eq!(loaded.width, 800);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ron");
        std::fs::write(&path, "(title: \"partial\", width: 1024)").unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.title, "partial");
        assert_eq!(loaded.width, 1024);
        assert_eq!(loaded.height, 600);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load(Path::new("/nonexistent/game.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        std::fs::write(&path, "not ron at all {{{").unwrap();

        let err = GameConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_window_conf_mirrors_settings() {
        let mut config = GameConfig::default();
        config.title = "conf".to_string();
        config.width = 1280;
        config.height = 720;
        config.fullscreen = true;

        let conf = config.window_conf();
        assert_eq!(conf.window_title, "conf");
        assert_eq!(conf.window_width, 1280);
        assert_eq!(conf.window_height, 720);
        assert!(conf.fullscreen);
    }
}
