//! Fit-Controller: passt die Ansicht auf einen Layer oder eine Ausdehnung ein.
//!
//! Wartet der Ziel-Layer noch auf seine GeoResource, wird der Fit bis zur
//! Auflösung zurückgestellt, damit nie auf einen Platzhalter eingepasst wird.

use super::reconciler::{LayerReconciler, SettledLayer};
use super::StoreCommand;
use crate::core::{Extent, FitParams, Insets, RenderSurface, ViewState};
use crate::shared::EngineOptions;

/// Optionen eines Fit-Requests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitOptions {
    /// Höchster erlaubter Zoom
    pub max_zoom: Option<f64>,
    /// Verdeckte UI-Ränder zusätzlich zum Standard-Abstand berücksichtigen
    pub use_visible_viewport: bool,
}

/// Anforderung, die Ansicht einzupassen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitRequest {
    /// Ziel-Layer, dessen Inhalt eingepasst wird
    pub target_id: Option<String>,
    /// Ausdehnung (Fallback, wenn der Layer keine liefert)
    pub extent: Option<Extent>,
    pub options: FitOptions,
}

impl FitRequest {
    /// Fit auf den Inhalt eines Layers.
    pub fn layer(target_id: impl Into<String>) -> Self {
        Self {
            target_id: Some(target_id.into()),
            ..Self::default()
        }
    }

    /// Fit auf eine feste Ausdehnung.
    pub fn extent(extent: Extent) -> Self {
        Self {
            extent: Some(extent),
            ..Self::default()
        }
    }

    /// Setzt die Optionen (Builder).
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }
}

/// Führt Fit-Requests aus, ggf. zurückgestellt bis zur Layer-Auflösung.
///
/// Die resultierende Ansicht geht erst nach Ende der Fit-Animation als
/// `SetView` an den Store, siehe [`FitController::poll_completion`].
#[derive(Debug, Clone)]
pub struct FitController {
    padding_px: f64,
    duration_ms: u32,
    deferred: Option<FitRequest>,
    /// Ziel-Ansicht des laufenden Fits
    in_flight: Option<ViewState>,
}

impl FitController {
    /// Erstellt einen Controller mit konfiguriertem Abstand und Animationsdauer.
    pub fn new(options: &EngineOptions) -> Self {
        Self {
            padding_px: options.fit_padding_px,
            duration_ms: options.fit_animation_ms,
            deferred: None,
            in_flight: None,
        }
    }

    /// Zurückgestellter Request (falls vorhanden).
    pub fn deferred(&self) -> Option<&FitRequest> {
        self.deferred.as_ref()
    }

    /// Wurde ein Fit gestartet, dessen Ergebnis noch nicht im Store steht?
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Führt einen Fit aus oder stellt ihn zurück.
    ///
    /// Ein neuer Request ersetzt einen zurückgestellten. Gibt `true` zurück,
    /// wenn die Oberfläche mit dem Einpassen begonnen hat.
    pub fn fit(
        &mut self,
        request: FitRequest,
        surface: &mut dyn RenderSurface,
        reconciler: &LayerReconciler,
    ) -> bool {
        self.deferred = None;

        if let Some(target) = request.target_id.as_deref() {
            if reconciler.is_pending(target) {
                log::debug!("Fit auf '{}' zurückgestellt bis zur Auflösung", target);
                self.deferred = Some(request);
                return false;
            }
        }

        self.execute(&request, surface)
    }

    /// Führt einen zurückgestellten Fit aus, sobald sein Ziel aufgelöst ist.
    ///
    /// Bei fehlgeschlagenem Laden gilt die Fallback-Ausdehnung des Requests.
    pub fn on_layer_settled(
        &mut self,
        settled: &SettledLayer,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        let matches_target = self
            .deferred
            .as_ref()
            .and_then(|r| r.target_id.as_deref())
            .is_some_and(|t| t == settled.layer_id);
        if !matches_target {
            return false;
        }

        match self.deferred.take() {
            Some(request) => self.execute(&request, surface),
            None => false,
        }
    }

    /// Verwirft einen zurückgestellten Fit, dessen Ziel entfernt wurde.
    pub fn on_layer_removed(&mut self, layer_id: &str) {
        let is_target = self
            .deferred
            .as_ref()
            .and_then(|r| r.target_id.as_deref())
            .is_some_and(|t| t == layer_id);
        if is_target {
            log::debug!("Fit-Ziel '{}' entfernt, verwerfe Fit", layer_id);
            self.deferred = None;
        }
    }

    /// Liefert genau einen `SetView`-Command, sobald die Fit-Animation beendet ist.
    ///
    /// Zurückgeschrieben wird die Live-Ansicht nach Abschluss, nicht das Ziel.
    pub fn poll_completion(&mut self, surface: &dyn RenderSurface) -> Option<StoreCommand> {
        if self.in_flight.is_none() || surface.is_animating() {
            return None;
        }
        let target = self.in_flight.take()?;
        let view = surface.view().rounded();
        if !view.equals_rounded(&target) {
            log::debug!(
                "Fit endete abweichend vom Ziel (zoom {:.3} statt {:.3})",
                view.zoom,
                target.zoom
            );
        }
        Some(StoreCommand::SetView { view })
    }

    /// Verwirft den laufenden Fit (z.B. Benutzer übernimmt die Ansicht).
    pub fn cancel(&mut self) {
        if self.in_flight.take().is_some() {
            log::debug!("Laufender Fit abgebrochen");
        }
    }

    fn execute(&mut self, request: &FitRequest, surface: &mut dyn RenderSurface) -> bool {
        let extent = request
            .target_id
            .as_deref()
            .and_then(|id| surface.layer_extent(id))
            .or(request.extent.filter(Extent::is_valid));

        let Some(extent) = extent else {
            log::warn!(
                "Fit ohne verwendbare Ausdehnung (Ziel: {:?}), ignoriere",
                request.target_id
            );
            return false;
        };

        let mut padding = Insets::uniform(self.padding_px);
        if request.options.use_visible_viewport {
            padding = padding + surface.visible_viewport_insets();
        }

        let target = surface.fit_extent(
            extent,
            FitParams {
                padding,
                max_zoom: request.options.max_zoom,
                duration_ms: self.duration_ms,
            },
        );
        self.in_flight = Some(target);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::reconciler::{ReconcileContext, SettleOutcome};
    use crate::app::tools::HandlerRegistry;
    use crate::core::{GeoResource, LayerDescriptor, StaticResolver};
    use crate::render::{MemorySurface, SurfaceCall};
    use glam::DVec2;

    fn unit_extent() -> Extent {
        Extent::new(DVec2::new(0.0, 0.0), DVec2::new(100.0, 50.0))
    }

    fn fit_calls(surface: &MemorySurface) -> Vec<&SurfaceCall> {
        surface
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::FitExtent { .. }))
            .collect()
    }

    #[test]
    fn fit_to_extent_uses_default_padding() {
        let mut surface = MemorySurface::new();
        let mut fit = FitController::new(&EngineOptions::default());

        let started = fit.fit(
            FitRequest::extent(unit_extent()),
            &mut surface,
            &LayerReconciler::new(),
        );

        assert!(started);
        assert!(matches!(
            fit.poll_completion(&surface),
            Some(StoreCommand::SetView { .. })
        ));
        assert!(fit.poll_completion(&surface).is_none());
        match fit_calls(&surface).as_slice() {
            [SurfaceCall::FitExtent { extent, params }] => {
                assert_eq!(*extent, unit_extent());
                assert_eq!(params.padding, Insets::uniform(10.0));
            }
            other => panic!("Unerwartete Aufrufe: {other:?}"),
        }
    }

    #[test]
    fn write_back_waits_for_fit_animation() {
        let mut surface = MemorySurface::new();
        surface.set_view(ViewState::new(2.0, DVec2::new(500.0, 500.0)));
        surface.set_animated(true);
        let mut fit = FitController::new(&EngineOptions::default());

        assert!(fit.fit(
            FitRequest::extent(unit_extent()),
            &mut surface,
            &LayerReconciler::new(),
        ));

        assert!(fit.is_in_flight());
        assert!(fit.poll_completion(&surface).is_none());

        surface.finish_animation();
        let command = fit.poll_completion(&surface);

        assert_eq!(
            command,
            Some(StoreCommand::SetView {
                view: surface.view().rounded(),
            })
        );
        assert!(!fit.is_in_flight());
    }

    #[test]
    fn cancelled_fit_writes_nothing_back() {
        let mut surface = MemorySurface::new();
        surface.set_animated(true);
        let mut fit = FitController::new(&EngineOptions::default());
        fit.fit(
            FitRequest::extent(unit_extent()),
            &mut surface,
            &LayerReconciler::new(),
        );

        fit.cancel();
        surface.finish_animation();

        assert!(fit.poll_completion(&surface).is_none());
    }

    #[test]
    fn visible_viewport_insets_are_added() {
        let mut surface = MemorySurface::new();
        surface.set_visible_viewport_insets(Insets {
            top: 0.0,
            right: 0.0,
            bottom: 40.0,
            left: 300.0,
        });
        let mut fit = FitController::new(&EngineOptions::default());

        fit.fit(
            FitRequest::extent(unit_extent()).with_options(FitOptions {
                max_zoom: Some(14.0),
                use_visible_viewport: true,
            }),
            &mut surface,
            &LayerReconciler::new(),
        );

        let [SurfaceCall::FitExtent { params, .. }] = fit_calls(&surface).as_slice() else {
            panic!("Genau ein Fit erwartet");
        };
        assert_eq!(params.padding.left, 310.0);
        assert_eq!(params.padding.bottom, 50.0);
        assert_eq!(params.max_zoom, Some(14.0));
    }

    #[test]
    fn fit_without_any_extent_is_ignored() {
        let mut surface = MemorySurface::new();
        let mut fit = FitController::new(&EngineOptions::default());

        let started = fit.fit(FitRequest::layer("fehlt"), &mut surface, &LayerReconciler::new());

        assert!(!started);
        assert!(fit.poll_completion(&surface).is_none());
        assert_eq!(surface.mutation_count(), 0);
    }

    #[test]
    fn fit_on_pending_layer_is_deferred_until_settlement() {
        let mut surface = MemorySurface::new();
        let mut resolver = StaticResolver::new();
        let future = resolver.insert_pending("g1");
        let mut handlers = HandlerRegistry::new();
        let mut reconciler = LayerReconciler::new();
        let mut fit = FitController::new(&EngineOptions::default());

        let desired = vec![LayerDescriptor::new("a", "g1")];
        reconciler.reconcile(
            &desired,
            &mut ReconcileContext {
                surface: &mut surface,
                resolver: &resolver,
                handlers: &mut handlers,
            },
        );

        assert!(!fit.fit(FitRequest::layer("a"), &mut surface, &reconciler));
        assert!(fit.deferred().is_some());
        assert!(!fit.is_in_flight());
        assert!(fit_calls(&surface).is_empty());

        let extent = Extent::new(DVec2::new(5.0, 5.0), DVec2::new(6.0, 6.0));
        future.resolve(GeoResource::vector("g1", "Punkte", Some(extent)));
        let report = reconciler.settle_pending(&mut ReconcileContext {
            surface: &mut surface,
            resolver: &resolver,
            handlers: &mut handlers,
        });

        assert!(fit.on_layer_settled(&report.settled[0], &mut surface));
        assert!(fit.deferred().is_none());
        assert!(fit.poll_completion(&surface).is_some());
        match fit_calls(&surface).as_slice() {
            [SurfaceCall::FitExtent { extent: fitted, .. }] => assert_eq!(*fitted, extent),
            other => panic!("Unerwartete Aufrufe: {other:?}"),
        }
    }

    #[test]
    fn removed_target_drops_deferred_fit() {
        let mut fit = FitController::new(&EngineOptions::default());
        fit.deferred = Some(FitRequest::layer("a"));

        fit.on_layer_removed("b");
        assert!(fit.deferred().is_some());

        fit.on_layer_removed("a");
        assert!(fit.deferred().is_none());
    }

    #[test]
    fn rejected_target_falls_back_to_request_extent() {
        let mut surface = MemorySurface::new();
        let mut fit = FitController::new(&EngineOptions::default());
        fit.deferred = Some(FitRequest {
            target_id: Some("a".into()),
            extent: Some(unit_extent()),
            options: FitOptions::default(),
        });

        let started = fit.on_layer_settled(
            &SettledLayer {
                layer_id: "a".into(),
                outcome: SettleOutcome::Rejected,
            },
            &mut surface,
        );

        assert!(started);
        assert_eq!(fit_calls(&surface).len(), 1);
    }
}
