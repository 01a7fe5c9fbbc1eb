use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Editor settings that persist to disk.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Directory effect documents are loaded from and created in
    pub effects_dir: PathBuf,
    /// Effect opened at startup
    #[serde(default = "default_effect_name")]
    pub default_effect: String,
    /// Curve editor canvas size in points
    #[serde(default = "default_canvas_size")]
    pub curve_canvas_size: [f32; 2],
    /// Starting directory of the texture picker
    #[serde(default = "default_texture_dir")]
    pub texture_dir: PathBuf,
}

fn default_effect_name() -> String {
    "default".to_string()
}

fn default_canvas_size() -> [f32; 2] {
    [400.0, 200.0]
}

fn default_texture_dir() -> PathBuf {
    PathBuf::from("assets/textures")
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            effects_dir: PathBuf::from("assets/effects"),
            default_effect: default_effect_name(),
            curve_canvas_size: default_canvas_size(),
            texture_dir: default_texture_dir(),
        }
    }
}

impl EditorSettings {
    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_particle_editor");
            p.push("settings.ron");
            p
        })
    }

    /// Load settings from disk. A missing file is created with the defaults.
    pub fn load() -> Self {
        match Self::file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let settings = Self::default();
                if let Err(e) = settings.save_to(path) {
                    warn!("Failed to write default editor settings: {}", e);
                }
                settings
            }
            Err(e) => {
                warn!("Failed to read editor settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Self {
        ron::from_str(content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable editor settings: {}", e);
            Self::default()
        })
    }

    /// Save settings to `path`, creating its directory
    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| EditorError::io(parent, e))?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content).map_err(|e| EditorError::io(path, e))?;
        info!("Settings saved to: {:?}", path);
        Ok(())
    }

    pub fn canvas_size(&self) -> bevy_egui::egui::Vec2 {
        let [w, h] = self.curve_canvas_size;
        bevy_egui::egui::vec2(w.max(100.0), h.max(50.0))
    }

    pub fn default_effect_path(&self) -> PathBuf {
        crate::persistence::effect_path(&self.effects_dir, &self.default_effect)
    }
}
