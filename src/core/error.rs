//! Fehlerarten pro Layer. Werden lokal behandelt, nie an Aufrufer propagiert.

use thiserror::Error;

/// Nicht behebbarer Fehler eines einzelnen Layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    /// Der Resolver kennt die GeoResource nicht
    #[error("GeoResource '{geo_resource_id}' für Layer '{layer_id}' nicht gefunden")]
    ResolutionFailure {
        layer_id: String,
        geo_resource_id: String,
    },
    /// Das Laden der GeoResource ist fehlgeschlagen
    #[error("GeoResource '{geo_resource_id}' für Layer '{layer_id}' konnte nicht geladen werden: {reason}")]
    Rejected {
        layer_id: String,
        geo_resource_id: String,
        reason: String,
    },
    /// Weder GeoResource noch Handler passen zum Deskriptor
    #[error("Layer '{layer_id}' ist weder GeoResource noch Handler")]
    UnknownLayerKind { layer_id: String },
}

impl LayerError {
    /// ID des betroffenen Layers.
    pub fn layer_id(&self) -> &str {
        match self {
            LayerError::ResolutionFailure { layer_id, .. }
            | LayerError::Rejected { layer_id, .. }
            | LayerError::UnknownLayerKind { layer_id } => layer_id,
        }
    }
}
