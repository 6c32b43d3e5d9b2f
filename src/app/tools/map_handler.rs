//! MapHandler-Trait: Schnittstelle für alle interaktiven Karten-Werkzeuge.

use crate::core::{RenderLayer, RenderSurface};

/// Veto-Optionen eines Handlers für die Standard-Klickbehandlung.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerOptions {
    /// Aktiver Handler konsumiert Klicks selbst
    pub prevent_default_click_handling: bool,
    /// Aktiver Handler konsumiert Kontext-Klicks selbst
    pub prevent_default_context_click_handling: bool,
}

/// Interaktives Werkzeug, das wie ein Layer adressiert wird.
///
/// Aktiv genau dann, wenn ein Deskriptor mit gleicher ID gewünscht ist.
/// Nur der Reconciler ruft `activate`/`deactivate` auf.
pub trait MapHandler {
    /// ID im Deskriptor-ID-Raum
    fn id(&self) -> &str;

    /// Ist der Handler aktiv?
    fn is_active(&self) -> bool;

    /// Aktuelle Veto-Optionen (werden bei jedem Event neu gelesen).
    fn options(&self) -> HandlerOptions;

    /// Aktiviert den Handler und liefert seinen Interaktions-Layer.
    /// Wiederholter Aufruf bei aktivem Handler ist ein No-op.
    fn activate(&mut self, surface: &mut dyn RenderSurface) -> RenderLayer;

    /// Deaktiviert den Handler. Wiederholter Aufruf ist ein No-op.
    fn deactivate(&mut self, surface: &mut dyn RenderSurface);
}
