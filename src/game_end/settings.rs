/*
Cat Royale - Game End Watcher
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "game_end.ron";

/// Tunables for the Game End Watcher + Overlay
/// Defaults Match the Shipped Game, File Overrides are Optional
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameEndSettings {
    pub check_interval_ms: u64,
    /// Final Frame Stays Visible This Long Before Dimming
    pub fade_hold_ms: u64,
    pub fade_ms: u64,
    pub overlay_tint_alpha: f32,
    pub announcer_icon: String,
    pub bubble_font: String,
    pub message: String,
}

impl Default for GameEndSettings {
    fn default() -> Self {
        Self {
            check_interval_ms: 250,
            fade_hold_ms: 1000,
            fade_ms: 600,
            overlay_tint_alpha: 0.65,
            announcer_icon: "pieces/shouter/shouter_board.png".into(),
            bubble_font: "fonts/DejaVuSans-Bold.ttf".into(),
            message: "Game Ends".into(),
        }
    }
}

impl GameEndSettings {
    fn config_path() -> Option<PathBuf> {
        #[cfg(debug_assertions)]
        {
            // Debug Builds: Read From Project Directory
            let mut p = std::env::current_dir().ok()?;
            p.push(SETTINGS_FILE);
            Some(p)
        }
        #[cfg(not(debug_assertions))]
        {
            dirs::config_dir().map(|mut p| {
                p.push("CatRoyale");
                p.push(SETTINGS_FILE);
                p
            })
        }
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<Self>(contents).map(Self::sanitized)
    }

    /// Tint is an Alpha: Clamp Into 0..=1, Non-Finite Falls Back to Default
    fn sanitized(mut self) -> Self {
        self.overlay_tint_alpha = if self.overlay_tint_alpha.is_finite() {
            self.overlay_tint_alpha.clamp(0.0, 1.0)
        } else {
            Self::default().overlay_tint_alpha
        };
        self
    }

    /// Missing File -> Defaults, Broken File -> Defaults + Warning
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };

        match Self::from_ron_str(&contents) {
            Ok(settings) => {
                info!("Game end settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn fade_hold(&self) -> Duration {
        Duration::from_millis(self.fade_hold_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = GameEndSettings::default();
        assert_eq!(s.check_interval(), Duration::from_millis(250));
        assert_eq!(s.fade_hold(), Duration::from_millis(1000));
        assert_eq!(s.fade_duration(), Duration::from_millis(600));
        assert_eq!(s.overlay_tint_alpha, 0.65);
        assert_eq!(s.message, "Game Ends");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let s = GameEndSettings::from_ron_str("(message: \"Match Over\", fade_ms: 300)").unwrap();
        assert_eq!(s.message, "Match Over");
        assert_eq!(s.fade_ms, 300);
        assert_eq!(s.fade_hold_ms, 1000);
        assert_eq!(s.announcer_icon, "pieces/shouter/shouter_board.png");
    }

    #[test]
    fn test_broken_file_is_an_error() {
        assert!(GameEndSettings::from_ron_str("(fade_ms: \"slow\")").is_err());
    }

    #[test]
    fn test_tint_alpha_clamped_on_load() {
        let high = GameEndSettings::from_ron_str("(overlay_tint_alpha: 3.5)").unwrap();
        assert_eq!(high.overlay_tint_alpha, 1.0);

        let low = GameEndSettings::from_ron_str("(overlay_tint_alpha: -0.2)").unwrap();
        assert_eq!(low.overlay_tint_alpha, 0.0);

        let ok = GameEndSettings::from_ron_str("(overlay_tint_alpha: 0.4)").unwrap();
        assert_eq!(ok.overlay_tint_alpha, 0.4);
    }

    #[test]
    fn test_default_font_is_bold_face() {
        assert_eq!(GameEndSettings::default().bubble_font, "fonts/DejaVuSans-Bold.ttf");
    }
}
