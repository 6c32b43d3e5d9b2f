//! Layer-Deskriptoren: deklarative Beschreibung eines gewünschten Layers.

use serde::{Deserialize, Serialize};

/// Einschränkungen, die das Verhalten eines Layers im Store beeinflussen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConstraints {
    /// Layer wird in Layer-Listen der Oberfläche nicht angezeigt
    #[serde(default)]
    pub hidden: bool,
    /// Layer bleibt immer oberhalb aller anderen Layer
    #[serde(default)]
    pub always_top: bool,
}

/// Deklarativer Eintrag für genau einen gewünschten Layer.
///
/// Ohne `geo_resource_id` benennt die `id` einen Handler (Pseudo-Layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Eindeutige, über die Lebensdauer stabile ID
    pub id: String,
    /// Referenzierte GeoResource (None = Handler)
    #[serde(default)]
    pub geo_resource_id: Option<String>,
    /// Render-Reihenfolge (Gleichstand: Listenreihenfolge)
    #[serde(default)]
    pub z_index: i32,
    /// Sichtbarkeit
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Deckkraft im Bereich [0, 1]
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Store-Einschränkungen
    #[serde(default)]
    pub constraints: LayerConstraints,
    /// Anzeigename (wird aus aufgelösten Ressourcen gespiegelt)
    #[serde(default)]
    pub label: Option<String>,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

impl LayerDescriptor {
    /// Erstellt einen Deskriptor für eine GeoResource.
    pub fn new(id: impl Into<String>, geo_resource_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            geo_resource_id: Some(geo_resource_id.into()),
            z_index: 0,
            visible: true,
            opacity: 1.0,
            constraints: LayerConstraints::default(),
            label: None,
        }
    }

    /// Erstellt einen Deskriptor, der einen Handler aktiviert.
    pub fn handler(id: impl Into<String>) -> Self {
        Self {
            geo_resource_id: None,
            ..Self::new(id, String::new())
        }
    }

    /// Setzt den z-Index (Builder).
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Setzt die Sichtbarkeit (Builder).
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Setzt die Deckkraft, begrenzt auf [0, 1] (Builder).
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = clamp_opacity(opacity);
        self
    }

    /// Setzt die Einschränkungen (Builder).
    pub fn with_constraints(mut self, constraints: LayerConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Ist dieser Deskriptor ein Handler-Pseudo-Layer?
    pub fn is_handler(&self) -> bool {
        self.geo_resource_id.is_none()
    }
}

/// Begrenzt eine Deckkraft auf [0, 1]; NaN wird zu 1.0.
pub fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Liefert die Deskriptoren sortiert nach `z_index`.
///
/// Stabile Sortierung: bei gleichem `z_index` entscheidet die Listenreihenfolge.
pub fn sorted_by_z_index(desired: &[LayerDescriptor]) -> Vec<&LayerDescriptor> {
    let mut sorted: Vec<&LayerDescriptor> = desired.iter().collect();
    sorted.sort_by_key(|d| d.z_index);
    sorted
}
