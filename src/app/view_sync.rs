//! View-Synchronisation zwischen gewünschter Ansicht (Store) und Live-Ansicht.
//!
//! Die Engine liefert während Interaktion und Easing laufend Zwischenwerte.
//! Verglichen wird deshalb nur nach kanonischer Rundung, und Benutzer-Änderungen
//! fließen erst am Interaktionsende (einmalig) zurück in den Store.

use super::StoreCommand;
use crate::core::{RenderSurface, ViewAnimation, ViewState};
use crate::shared::EngineOptions;

/// Berechnet die nötige Animation, falls sich die Ansichten nach Rundung unterscheiden.
pub fn plan_view_sync(
    desired: &ViewState,
    live: &ViewState,
    duration_ms: u32,
) -> Option<ViewAnimation> {
    if desired.equals_rounded(live) {
        return None;
    }
    Some(ViewAnimation {
        target: *desired,
        duration_ms,
    })
}

/// Hält die Live-Ansicht mit der gewünschten Ansicht synchron.
#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    duration_ms: u32,
    interacting: bool,
}

impl ViewSynchronizer {
    /// Erstellt einen Synchronizer mit der konfigurierten Animationsdauer.
    pub fn new(options: &EngineOptions) -> Self {
        Self {
            duration_ms: options.view_animation_ms,
            interacting: false,
        }
    }

    /// Läuft gerade eine Benutzer-Interaktion?
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Überträgt die gewünschte Ansicht auf die Oberfläche.
    ///
    /// Gibt `true` zurück, wenn eine Animation ausgelöst wurde.
    pub fn sync(&mut self, desired: &ViewState, surface: &mut dyn RenderSurface) -> bool {
        if self.interacting {
            log::debug!("Benutzer-Interaktion aktiv, überspringe View-Sync");
            return false;
        }
        match plan_view_sync(desired, &surface.view(), self.duration_ms) {
            Some(animation) => {
                surface.animate_view(animation);
                true
            }
            None => false,
        }
    }

    /// Markiert den Beginn einer Benutzer-Interaktion (Pan, Zoom, Rotation).
    pub fn begin_interaction(&mut self) {
        self.interacting = true;
    }

    /// Beendet die Interaktion und liefert genau einen Store-Command mit der Live-Ansicht.
    ///
    /// Ohne vorherige Interaktion: `None`.
    pub fn end_interaction(&mut self, surface: &dyn RenderSurface) -> Option<StoreCommand> {
        if !std::mem::replace(&mut self.interacting, false) {
            return None;
        }
        Some(StoreCommand::SetView {
            view: surface.view().rounded(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MemorySurface, SurfaceCall};
    use glam::DVec2;

    fn live_surface(zoom: f64) -> MemorySurface {
        let mut surface = MemorySurface::new();
        surface.set_view(ViewState::new(zoom, DVec2::new(11.5, 48.1)));
        surface
    }

    #[test]
    fn equal_after_rounding_does_not_animate() {
        let mut surface = live_surface(5.0004);
        let mut sync = ViewSynchronizer::new(&EngineOptions::default());

        let animated = sync.sync(&ViewState::new(5.0001, DVec2::new(11.5, 48.1)), &mut surface);

        assert!(!animated);
        assert_eq!(surface.mutation_count(), 0);
    }

    #[test]
    fn different_after_rounding_animates_once() {
        let mut surface = live_surface(5.0004);
        let mut sync = ViewSynchronizer::new(&EngineOptions::default());
        let desired = ViewState::new(5.01, DVec2::new(11.5, 48.1));

        assert!(sync.sync(&desired, &mut surface));
        assert!(!sync.sync(&desired, &mut surface));

        assert_eq!(
            surface.calls(),
            &[SurfaceCall::AnimateView(ViewAnimation {
                target: desired,
                duration_ms: EngineOptions::default().view_animation_ms,
            })]
        );
    }

    #[test]
    fn rotation_difference_animates() {
        let live = ViewState::new(5.0, DVec2::ZERO);
        let desired = live.with_rotation(0.00002);

        assert!(plan_view_sync(&desired, &live, 200).is_some());
        assert!(plan_view_sync(&live.with_rotation(0.000004), &live, 200).is_none());
    }

    #[test]
    fn interaction_writes_back_once_and_suppresses_sync() {
        let mut surface = live_surface(5.0);
        let mut sync = ViewSynchronizer::new(&EngineOptions::default());

        sync.begin_interaction();
        // Zwischenwerte während der Interaktion
        surface.set_view(ViewState::new(6.2, DVec2::new(12.0, 48.0)));
        assert!(!sync.sync(&ViewState::new(5.0, DVec2::new(11.5, 48.1)), &mut surface));
        surface.set_view(ViewState::new(7.12345, DVec2::new(12.5, 48.0)));

        let command = sync.end_interaction(&surface);

        assert_eq!(
            command,
            Some(StoreCommand::SetView {
                view: ViewState::new(7.123, DVec2::new(12.5, 48.0)),
            })
        );
        assert!(sync.end_interaction(&surface).is_none());
        assert_eq!(surface.mutation_count(), 0);
    }
}
