//! Kartenansicht: Zoom, Zentrum und Rotation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Nachkommastellen für den Zoom-Vergleich.
pub const ZOOM_DECIMALS: i32 = 3;
/// Nachkommastellen für den Rotations-Vergleich.
pub const ROTATION_DECIMALS: i32 = 5;
/// Nachkommastellen je Zentrums-Komponente.
pub const CENTER_DECIMALS: i32 = 7;

/// Zoom, Zentrum und Rotation einer Kartenansicht.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Zoom-Stufe
    pub zoom: f64,
    /// Zentrum in Kartenkoordinaten
    pub center: DVec2,
    /// Rotation in Radiant
    #[serde(default)]
    pub rotation: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 0.0,
            center: DVec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl ViewState {
    /// Erstellt eine Ansicht ohne Rotation.
    pub fn new(zoom: f64, center: DVec2) -> Self {
        Self {
            zoom,
            center,
            rotation: 0.0,
        }
    }

    /// Setzt die Rotation (Builder).
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Kanonisch gerundete Kopie für stabile Vergleiche.
    ///
    /// Kontinuierliche Deltas der Engine (Easing, Interaktion) fallen damit
    /// auf denselben Wert zusammen.
    pub fn rounded(&self) -> ViewState {
        ViewState {
            zoom: round_to(self.zoom, ZOOM_DECIMALS),
            center: DVec2::new(
                round_to(self.center.x, CENTER_DECIMALS),
                round_to(self.center.y, CENTER_DECIMALS),
            ),
            rotation: round_to(self.rotation, ROTATION_DECIMALS),
        }
    }

    /// Vergleicht zwei Ansichten nach kanonischer Rundung.
    pub fn equals_rounded(&self, other: &ViewState) -> bool {
        self.rounded() == other.rounded()
    }
}

/// Rundet kaufmännisch auf `decimals` Nachkommastellen.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
