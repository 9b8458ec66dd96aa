//! Game configuration (window, world generation). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// World generation seed.
    #[serde(default)]
    pub seed: u64,
    /// Half extent of the scenery strip along X.
    #[serde(default = "default_world_half_extent")]
    pub world_half_extent: f32,
    /// Number of trees to scatter.
    #[serde(default = "default_tree_count")]
    pub tree_count: usize,
    /// Number of buildings to scatter.
    #[serde(default = "default_building_count")]
    pub building_count: usize,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_world_half_extent() -> f32 {
    80.0
}
fn default_tree_count() -> usize {
    30
}
fn default_building_count() -> usize {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            seed: 0,
            world_half_extent: default_world_half_extent(),
            tree_count: default_tree_count(),
            building_count: default_building_count(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. A missing file is written out with the
    /// defaults so the settings are editable; an invalid file is left alone
    /// and the defaults are used for this run.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => {
                let config = Self::default();
                config.save();
                return config;
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}
