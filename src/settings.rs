//! Game settings and preferences
//!
//! Persisted separately from high scores under their own storage key.

use serde::{Deserialize, Serialize};

use crate::consts::PALETTE_LEN;
use crate::platform::storage::{StorageError, Store};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw the background clouds
    pub clouds: bool,
    /// Show FPS in the HUD
    pub show_fps: bool,
    /// Darker background for contrast
    pub high_contrast: bool,
    /// Bird color picked last session
    pub bird_color: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clouds: true,
            show_fps: false,
            high_contrast: false,
            bird_color: 0,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "gravity_flap_settings";

    /// Remembered color, wrapped into the palette
    pub fn bird_color_index(&self) -> usize {
        self.bird_color % PALETTE_LEN
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &Store) -> Self {
        match store.load::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &Store) -> Result<(), StorageError> {
        store.save(Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.clouds);
        assert!(!s.high_contrast);
        assert_eq!(s.bird_color_index(), 0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let s: Settings = serde_json::from_str(r#"{"high_contrast": true}"#).unwrap();
        assert!(s.high_contrast);
        assert!(s.clouds);
    }

    #[test]
    fn test_bird_color_wraps() {
        let s = Settings {
            bird_color: PALETTE_LEN + 2,
            ..Default::default()
        };
        assert_eq!(s.bird_color_index(), 2);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_save() {
        let dir = std::env::temp_dir().join(format!("gravity-flap-settings-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = Store::in_dir(&dir);

        assert_eq!(Settings::load(&store), Settings::default());

        let s = Settings {
            clouds: false,
            bird_color: 3,
            ..Default::default()
        };
        s.save(&store).unwrap();
        assert_eq!(Settings::load(&store), s);

        // Corrupt data falls back to defaults
        std::fs::write(dir.join(format!("{}.json", Settings::STORAGE_KEY)), "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
