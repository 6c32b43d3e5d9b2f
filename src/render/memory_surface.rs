//! In-Memory-Implementierung von [`RenderSurface`] mit Aufruf-Protokoll.

use crate::core::{
    Extent, FitParams, Insets, LayerProperties, RenderLayer, RenderSurface, ViewAnimation,
    ViewState,
};
use glam::DVec2;

/// Meter pro Pixel bei Zoom 0 (Web-Mercator).
const BASE_RESOLUTION: f64 = 156_543.033_928_040_97;
/// Höchster Zoom, falls weder Extent noch `max_zoom` begrenzen.
const MAX_ZOOM: f64 = 28.0;

/// Protokollierter, mutierender Oberflächen-Aufruf.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    InsertLayerAt {
        id: String,
        index: usize,
        placeholder: bool,
    },
    RemoveLayer {
        id: String,
    },
    ClearSource {
        id: String,
    },
    SetLayerProperties {
        id: String,
        properties: LayerProperties,
    },
    AnimateView(ViewAnimation),
    FitExtent {
        extent: Extent,
        params: FitParams,
    },
}

/// Render-Oberfläche ohne Grafik: hält Layer-Stapel und Ansicht im Speicher.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    layers: Vec<RenderLayer>,
    view: ViewState,
    viewport_size: DVec2,
    insets: Insets,
    calls: Vec<SurfaceCall>,
    layer_count_history: Vec<usize>,
    /// Übergänge laufen bis [`MemorySurface::finish_animation`]
    animated: bool,
    animation_target: Option<ViewState>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Erstellt eine leere Oberfläche mit 1280×720 Pixel Viewport.
    pub fn new() -> Self {
        Self::with_viewport(DVec2::new(1280.0, 720.0))
    }

    /// Erstellt eine leere Oberfläche mit eigener Viewport-Größe.
    pub fn with_viewport(viewport_size: DVec2) -> Self {
        Self {
            layers: Vec::new(),
            view: ViewState::default(),
            viewport_size,
            insets: Insets::default(),
            calls: Vec::new(),
            layer_count_history: Vec::new(),
            animated: false,
            animation_target: None,
        }
    }

    /// Ansichts-Übergänge enden nicht sofort, sondern erst mit
    /// [`finish_animation`](Self::finish_animation) (wie eine Engine mit Easing).
    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    /// Schließt eine laufende Animation ab: die Live-Ansicht springt ans Ziel.
    pub fn finish_animation(&mut self) {
        if let Some(target) = self.animation_target.take() {
            self.view = target;
        }
    }

    /// Setzt die von UI-Elementen verdeckten Ränder.
    pub fn set_visible_viewport_insets(&mut self, insets: Insets) {
        self.insets = insets;
    }

    /// Setzt die Live-Ansicht direkt (z.B. Benutzer-Interaktion), ohne Protokoll.
    ///
    /// Bricht eine laufende Animation ab.
    pub fn set_view(&mut self, view: ViewState) {
        self.animation_target = None;
        self.view = view;
    }

    /// Alle Layer in Render-Reihenfolge.
    pub fn layers(&self) -> &[RenderLayer] {
        &self.layers
    }

    /// Protokoll aller mutierenden Aufrufe.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Anzahl mutierender Aufrufe.
    pub fn mutation_count(&self) -> usize {
        self.calls.len()
    }

    /// Verwirft das Aufruf-Protokoll und die Layer-Anzahl-Historie.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.layer_count_history.clear();
    }

    /// Layer-Anzahl nach jedem mutierenden Aufruf.
    pub fn layer_count_history(&self) -> &[usize] {
        &self.layer_count_history
    }

    fn record(&mut self, call: SurfaceCall) {
        self.calls.push(call);
        self.layer_count_history.push(self.layers.len());
    }

    fn transition_to(&mut self, target: ViewState) {
        if self.animated {
            self.animation_target = Some(target);
        } else {
            // Headless: Übergang endet sofort am Ziel
            self.view = target;
        }
    }

    fn resolution(&self, zoom: f64) -> f64 {
        BASE_RESOLUTION / 2f64.powf(zoom)
    }
}

impl RenderSurface for MemorySurface {
    fn layer_ids(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.id.clone()).collect()
    }

    fn layer(&self, id: &str) -> Option<&RenderLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn insert_layer_at(&mut self, layer: RenderLayer, index: usize) {
        if let Some(existing) = self.layers.iter().position(|l| l.id == layer.id) {
            log::warn!("Layer '{}' doppelt eingefügt, ersetze vorhandenen", layer.id);
            self.layers.remove(existing);
        }
        let index = index.min(self.layers.len());
        let call = SurfaceCall::InsertLayerAt {
            id: layer.id.clone(),
            index,
            placeholder: layer.is_placeholder(),
        };
        self.layers.insert(index, layer);
        self.record(call);
    }

    fn remove_layer(&mut self, id: &str) -> Option<RenderLayer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        let layer = self.layers.remove(index);
        self.record(SurfaceCall::RemoveLayer { id: id.to_string() });
        Some(layer)
    }

    fn clear_source(&mut self, layer: &RenderLayer) {
        self.record(SurfaceCall::ClearSource {
            id: layer.id.clone(),
        });
    }

    fn set_layer_properties(&mut self, id: &str, properties: LayerProperties) {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return;
        };
        layer.properties = properties;
        self.record(SurfaceCall::SetLayerProperties {
            id: id.to_string(),
            properties,
        });
    }

    fn view(&self) -> ViewState {
        self.view
    }

    fn animate_view(&mut self, animation: ViewAnimation) {
        self.transition_to(animation.target);
        self.record(SurfaceCall::AnimateView(animation));
    }

    fn fit_extent(&mut self, extent: Extent, params: FitParams) -> ViewState {
        let padding = params.padding;
        let available = DVec2::new(
            (self.viewport_size.x - padding.left - padding.right).max(1.0),
            (self.viewport_size.y - padding.top - padding.bottom).max(1.0),
        );
        let size = extent.size();
        let needed = (size.x / available.x).max(size.y / available.y);
        let zoom_limit = params.max_zoom.unwrap_or(MAX_ZOOM);
        let zoom = if needed > 0.0 {
            (BASE_RESOLUTION / needed).log2().min(zoom_limit)
        } else {
            zoom_limit
        };

        // Extent-Mitte in die Mitte des freien Bereichs legen (y nach oben)
        let resolution = self.resolution(zoom);
        let shift = DVec2::new(
            (padding.left - padding.right) * 0.5 * resolution,
            (padding.bottom - padding.top) * 0.5 * resolution,
        );
        let target = ViewState {
            zoom,
            center: extent.center() - shift,
            rotation: self.view.rotation,
        };

        self.transition_to(target);
        self.record(SurfaceCall::FitExtent { extent, params });
        target
    }

    fn is_animating(&self) -> bool {
        self.animation_target.is_some()
    }

    fn visible_viewport_insets(&self) -> Insets {
        self.insets
    }

    fn coordinate_from_pixel(&self, screen: DVec2) -> Option<DVec2> {
        if self.viewport_size.x <= 0.0 || self.viewport_size.y <= 0.0 {
            return None;
        }
        let resolution = self.resolution(self.view.zoom);
        let offset = DVec2::new(
            screen.x - self.viewport_size.x * 0.5,
            self.viewport_size.y * 0.5 - screen.y,
        ) * resolution;
        let rotated = DVec2::from_angle(self.view.rotation).rotate(offset);
        Some(self.view.center + rotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn insert_clamps_index_and_keeps_ids_unique() {
        let mut surface = MemorySurface::new();
        surface.insert_layer_at(RenderLayer::interaction("a"), 10);
        surface.insert_layer_at(RenderLayer::interaction("b"), 0);
        surface.insert_layer_at(RenderLayer::interaction("a"), 0);

        assert_eq!(surface.layer_ids(), vec!["a", "b"]);
        assert_eq!(surface.mutation_count(), 3);
        assert_eq!(surface.layer_count_history(), &[1, 2, 2]);
    }

    #[test]
    fn remove_unknown_layer_is_not_recorded() {
        let mut surface = MemorySurface::new();
        assert!(surface.remove_layer("x").is_none());
        assert_eq!(surface.mutation_count(), 0);
    }

    #[test]
    fn fit_extent_centers_and_respects_max_zoom() {
        let mut surface = MemorySurface::new();
        let extent = Extent::new(DVec2::new(-10.0, -10.0), DVec2::new(10.0, 10.0));

        let view = surface.fit_extent(
            extent,
            FitParams {
                padding: Insets::uniform(10.0),
                max_zoom: Some(12.0),
                duration_ms: 0,
            },
        );

        assert_relative_eq!(view.zoom, 12.0);
        assert_relative_eq!(view.center.x, 0.0);
        assert_relative_eq!(view.center.y, 0.0);
        assert_eq!(surface.view(), view);
    }

    #[test]
    fn animated_fit_reaches_target_only_when_finished() {
        let mut surface = MemorySurface::new();
        surface.set_view(ViewState::new(3.0, DVec2::new(50.0, 50.0)));
        surface.set_animated(true);
        let extent = Extent::new(DVec2::new(-10.0, -10.0), DVec2::new(10.0, 10.0));

        let target = surface.fit_extent(
            extent,
            FitParams {
                padding: Insets::uniform(10.0),
                max_zoom: Some(12.0),
                duration_ms: 300,
            },
        );

        assert!(surface.is_animating());
        assert_relative_eq!(surface.view().zoom, 3.0);

        surface.finish_animation();
        assert!(!surface.is_animating());
        assert_eq!(surface.view(), target);
    }

    #[test]
    fn coordinate_from_pixel_maps_viewport_center_to_view_center() {
        let mut surface = MemorySurface::with_viewport(DVec2::new(800.0, 600.0));
        surface.set_view(ViewState::new(10.0, DVec2::new(1000.0, 2000.0)));

        let center = surface
            .coordinate_from_pixel(DVec2::new(400.0, 300.0))
            .expect("Koordinate erwartet");
        let right = surface
            .coordinate_from_pixel(DVec2::new(500.0, 300.0))
            .expect("Koordinate erwartet");

        assert_relative_eq!(center.x, 1000.0);
        assert_relative_eq!(center.y, 2000.0);
        assert!(right.x > center.x);
    }
}
