//! Vertrag zur Render-Oberfläche (Karten-Engine) und ihre Layer-Handles.
//!
//! Die eigentliche Zeichen-Engine ist extern. Diese Schnittstelle beschreibt
//! nur die Primitive, die Reconciler, View-Sync und Fit-Controller nutzen.

use super::geo_resource::{GeoResource, GeoResourceKind};
use super::geometry::{union_all, Extent, Insets};
use super::view::ViewState;
use glam::DVec2;

/// Veränderliche Darstellungs-Eigenschaften eines Layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerProperties {
    pub visible: bool,
    pub opacity: f32,
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
        }
    }
}

/// Inhalt eines Render-Layers.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    /// Vorläufiger Layer, solange die GeoResource lädt
    Placeholder,
    /// Vektor-Layer mit gepufferten Features
    Vector { extent: Option<Extent> },
    /// Kachel-Layer
    Tiles { url: String },
    /// Interaktions-Layer eines Handlers
    Interaction { handler_id: String },
    /// Layer-Gruppe
    Group(Vec<RenderLayer>),
}

/// Opakes Layer-Handle innerhalb der Render-Oberfläche.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub id: String,
    pub content: LayerContent,
    pub properties: LayerProperties,
}

impl RenderLayer {
    /// Vorläufiger Layer für eine noch ladende Ressource.
    pub fn placeholder(id: impl Into<String>, properties: LayerProperties) -> Self {
        Self {
            id: id.into(),
            content: LayerContent::Placeholder,
            properties,
        }
    }

    /// Interaktions-Layer eines Handlers.
    pub fn interaction(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            content: LayerContent::Interaction {
                handler_id: id.clone(),
            },
            id,
            properties: LayerProperties::default(),
        }
    }

    /// Baut den endgültigen Layer zu einer aufgelösten GeoResource.
    pub fn from_geo_resource(
        id: impl Into<String>,
        resource: &GeoResource,
        properties: LayerProperties,
    ) -> Self {
        let id = id.into();
        let content = match &resource.kind {
            GeoResourceKind::Vector { extent } => LayerContent::Vector { extent: *extent },
            GeoResourceKind::Tiles { url } => LayerContent::Tiles { url: url.clone() },
            GeoResourceKind::Aggregate(children) => LayerContent::Group(
                children
                    .iter()
                    .map(|child| {
                        RenderLayer::from_geo_resource(
                            format!("{id}/{}", child.id),
                            child,
                            LayerProperties::default(),
                        )
                    })
                    .collect(),
            ),
        };
        Self {
            id,
            content,
            properties,
        }
    }

    /// Ist dies ein Platzhalter?
    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, LayerContent::Placeholder)
    }

    /// Alle Blatt-Layer (Gruppen rekursiv aufgelöst).
    pub fn leaves(&self) -> Vec<&RenderLayer> {
        match &self.content {
            LayerContent::Group(children) => children.iter().flat_map(|c| c.leaves()).collect(),
            _ => vec![self],
        }
    }

    /// Inhaltliche Ausdehnung; Platzhalter und Kacheln haben keine.
    pub fn content_extent(&self) -> Option<Extent> {
        match &self.content {
            LayerContent::Vector { extent } => extent.filter(Extent::is_valid),
            LayerContent::Group(children) => {
                let extents: Vec<Extent> =
                    children.iter().filter_map(|c| c.content_extent()).collect();
                union_all(&extents)
            }
            _ => None,
        }
    }
}

/// Animierte Ansichtsänderung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAnimation {
    pub target: ViewState,
    pub duration_ms: u32,
}

/// Parameter für das Einpassen einer Ausdehnung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub padding: Insets,
    pub max_zoom: Option<f64>,
    pub duration_ms: u32,
}

/// Primitive der zustandsbehafteten Karten-Engine.
///
/// Mutierende Aufrufe dürfen nur vom UI-Thread erfolgen.
pub trait RenderSurface {
    /// IDs aller Layer in Render-Reihenfolge (unten → oben).
    fn layer_ids(&self) -> Vec<String>;

    /// Layer-Handle zu einer ID.
    fn layer(&self, id: &str) -> Option<&RenderLayer>;

    /// Fügt einen Layer an `index` ein (wird auf die Länge begrenzt).
    fn insert_layer_at(&mut self, layer: RenderLayer, index: usize);

    /// Entfernt einen Layer und gibt das Handle zurück.
    fn remove_layer(&mut self, id: &str) -> Option<RenderLayer>;

    /// Leert die gepufferten Features eines (Blatt-)Layers.
    fn clear_source(&mut self, layer: &RenderLayer);

    /// Setzt Sichtbarkeit und Deckkraft eines Layers.
    fn set_layer_properties(&mut self, id: &str, properties: LayerProperties);

    /// Aktuelle Live-Ansicht.
    fn view(&self) -> ViewState;

    /// Animiert die Ansicht zum Ziel.
    fn animate_view(&mut self, animation: ViewAnimation);

    /// Passt die Ansicht auf eine Ausdehnung ein und liefert die Ziel-Ansicht.
    ///
    /// Mit `duration_ms > 0` darf die Live-Ansicht das Ziel erst später erreichen.
    fn fit_extent(&mut self, extent: Extent, params: FitParams) -> ViewState;

    /// Läuft noch eine Ansichts-Animation (`animate_view` oder `fit_extent`)?
    fn is_animating(&self) -> bool;

    /// Von UI-Elementen verdeckte Ränder des Viewports.
    fn visible_viewport_insets(&self) -> Insets;

    /// Kartenkoordinate zu einer Screen-Position.
    fn coordinate_from_pixel(&self, screen: DVec2) -> Option<DVec2>;

    /// Position eines Layers in der Render-Reihenfolge.
    fn index_of(&self, id: &str) -> Option<usize> {
        self.layer_ids().iter().position(|l| l == id)
    }

    /// Inhaltliche Ausdehnung eines Layers.
    fn layer_extent(&self, id: &str) -> Option<Extent> {
        self.layer(id).and_then(RenderLayer::content_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_resource_becomes_group_with_leaves() {
        let resource = GeoResource::aggregate(
            "agg",
            "Gruppe",
            vec![
                GeoResource::vector(
                    "v1",
                    "V1",
                    Some(Extent::new(DVec2::ZERO, DVec2::new(1.0, 1.0))),
                ),
                GeoResource::aggregate(
                    "inner",
                    "Innen",
                    vec![GeoResource::vector(
                        "v2",
                        "V2",
                        Some(Extent::new(DVec2::new(5.0, 5.0), DVec2::new(6.0, 7.0))),
                    )],
                ),
                GeoResource::tiles("t1", "T1", "https://tiles"),
            ],
        );

        let layer = RenderLayer::from_geo_resource("a", &resource, LayerProperties::default());

        let leaf_ids: Vec<&str> = layer.leaves().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(leaf_ids, vec!["a/v1", "a/inner/v2", "a/t1"]);

        let extent = layer.content_extent().expect("Extent erwartet");
        assert_eq!(extent.min, DVec2::ZERO);
        assert_eq!(extent.max, DVec2::new(6.0, 7.0));
    }

    #[test]
    fn placeholder_has_no_extent() {
        let layer = RenderLayer::placeholder("a", LayerProperties::default());
        assert!(layer.is_placeholder());
        assert!(layer.content_extent().is_none());
        assert_eq!(layer.leaves().len(), 1);
    }
}
