//! Zentrale Konfiguration der Layer-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Gesten ──────────────────────────────────────────────────────────

/// Haltedauer (ms), ab der ein Touch-Druck als Long-Press gilt.
pub const LONG_PRESS_MS: u64 = 500;
/// Bewegung (Screen-Pixel), ab der ein Druck als Drag gilt.
pub const DRAG_THRESHOLD_PX: f64 = 8.0;

// ── Ansicht ─────────────────────────────────────────────────────────

/// Dauer der View-Animation bei Store-getriebenen Änderungen (ms).
pub const VIEW_ANIMATION_MS: u32 = 200;
/// Dauer der Fit-Animation (ms).
pub const FIT_ANIMATION_MS: u32 = 300;
/// Standard-Innenabstand beim Einpassen (Screen-Pixel, alle Seiten).
pub const FIT_PADDING_PX: f64 = 10.0;

// ── Store ───────────────────────────────────────────────────────────

/// Maximale Anzahl geloggter Store-Commands.
pub const COMMAND_LOG_CAPACITY: usize = 1000;

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `map_layer_engine.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    // ── Gesten ──────────────────────────────────────────────────
    /// Long-Press-Schwelle in Millisekunden
    pub long_press_ms: u64,
    /// Drag-Schwelle in Screen-Pixeln
    pub drag_threshold_px: f64,

    // ── Ansicht ─────────────────────────────────────────────────
    /// Dauer der View-Synchronisations-Animation
    pub view_animation_ms: u32,
    /// Dauer der Fit-Animation
    #[serde(default = "default_fit_animation_ms")]
    pub fit_animation_ms: u32,
    /// Standard-Innenabstand beim Einpassen
    pub fit_padding_px: f64,

    // ── Store ───────────────────────────────────────────────────
    /// Kapazität des Command-Logs
    #[serde(default = "default_command_log_capacity")]
    pub command_log_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            view_animation_ms: VIEW_ANIMATION_MS,
            fit_animation_ms: FIT_ANIMATION_MS,
            fit_padding_px: FIT_PADDING_PX,
            command_log_capacity: COMMAND_LOG_CAPACITY,
        }
    }
}

/// Serde-Default für `fit_animation_ms` (Abwärtskompatibilität).
fn default_fit_animation_ms() -> u32 {
    FIT_ANIMATION_MS
}

/// Serde-Default für `command_log_capacity`.
fn default_command_log_capacity() -> usize {
    COMMAND_LOG_CAPACITY
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("map_layer_engine"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("map_layer_engine.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let toml_src = r#"
            long_press_ms = 650
            drag_threshold_px = 4.0
            view_animation_ms = 150
            fit_padding_px = 20.0
        "#;

        let opts: EngineOptions = toml::from_str(toml_src).expect("TOML sollte parsebar sein");

        assert_eq!(opts.long_press_ms, 650);
        assert_eq!(opts.fit_animation_ms, FIT_ANIMATION_MS);
        assert_eq!(opts.command_log_capacity, COMMAND_LOG_CAPACITY);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let opts = EngineOptions::load_from_file(std::path::Path::new(
            "/nonexistent/map_layer_engine.toml",
        ));
        assert_eq!(opts, EngineOptions::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir().join(format!(
            "map_layer_engine_options_{}.toml",
            std::process::id()
        ));
        let opts = EngineOptions {
            long_press_ms: 750,
            ..EngineOptions::default()
        };

        opts.save_to_file(&path).expect("Speichern sollte gelingen");
        let loaded = EngineOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.long_press_ms, 750);
    }
}
