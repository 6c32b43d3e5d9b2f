//! Standard-Werkzeuge als Varianten eines gemeinsamen Handlers.

use super::map_handler::{HandlerOptions, MapHandler};
use crate::core::{RenderLayer, RenderSurface};

/// Art eines Standard-Werkzeugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Eigene Position anzeigen
    Geolocation,
    /// Strecken und Flächen messen
    Measurement,
    /// Geometrien zeichnen
    Draw,
    /// Markierungen hervorheben
    Highlight,
    /// Druckbereich festlegen
    Print,
    /// Routen planen
    Routing,
}

impl HandlerKind {
    /// Alle Standard-Werkzeuge in Registrierungsreihenfolge.
    pub const ALL: [HandlerKind; 6] = [
        HandlerKind::Geolocation,
        HandlerKind::Measurement,
        HandlerKind::Draw,
        HandlerKind::Highlight,
        HandlerKind::Print,
        HandlerKind::Routing,
    ];

    /// Standard-ID des Werkzeugs.
    pub fn default_id(&self) -> &'static str {
        match self {
            HandlerKind::Geolocation => "geolocation",
            HandlerKind::Measurement => "measurement",
            HandlerKind::Draw => "draw",
            HandlerKind::Highlight => "highlight",
            HandlerKind::Print => "print",
            HandlerKind::Routing => "routing",
        }
    }

    /// Standard-Vetos: Zeichnende Werkzeuge konsumieren Klicks selbst.
    pub fn default_options(&self) -> HandlerOptions {
        match self {
            HandlerKind::Measurement | HandlerKind::Draw => HandlerOptions {
                prevent_default_click_handling: true,
                prevent_default_context_click_handling: true,
            },
            HandlerKind::Routing => HandlerOptions {
                prevent_default_click_handling: true,
                prevent_default_context_click_handling: false,
            },
            HandlerKind::Geolocation | HandlerKind::Highlight | HandlerKind::Print => {
                HandlerOptions::default()
            }
        }
    }
}

/// Werkzeug-Handler mit Aktivierungs-Zustand.
#[derive(Debug, Clone)]
pub struct ToolHandler {
    id: String,
    kind: HandlerKind,
    active: bool,
    options: HandlerOptions,
    activation_count: u32,
}

impl ToolHandler {
    /// Erstellt ein Werkzeug mit Standard-ID und Standard-Optionen.
    pub fn new(kind: HandlerKind) -> Self {
        Self::with_id(kind.default_id(), kind)
    }

    /// Erstellt ein Werkzeug mit eigener ID.
    pub fn with_id(id: impl Into<String>, kind: HandlerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            active: false,
            options: kind.default_options(),
            activation_count: 0,
        }
    }

    /// Veto-Optionen zur Laufzeit ändern.
    pub fn set_options(&mut self, options: HandlerOptions) {
        self.options = options;
    }

    /// Anzahl tatsächlicher Aktivierungen (ohne redundante Aufrufe).
    pub fn activation_count(&self) -> u32 {
        self.activation_count
    }
}

impl MapHandler for ToolHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn options(&self) -> HandlerOptions {
        self.options
    }

    fn activate(&mut self, _surface: &mut dyn RenderSurface) -> RenderLayer {
        if !self.active {
            self.active = true;
            self.activation_count += 1;
            log::info!("Handler '{}' ({:?}) aktiviert", self.id, self.kind);
        }
        RenderLayer::interaction(self.id.clone())
    }

    fn deactivate(&mut self, _surface: &mut dyn RenderSurface) {
        if !self.active {
            return;
        }
        self.active = false;
        log::info!("Handler '{}' ({:?}) deaktiviert", self.id, self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;

    #[test]
    fn repeated_activation_counts_once() {
        let mut handler = ToolHandler::new(HandlerKind::Measurement);
        let mut surface = MemorySurface::new();

        handler.activate(&mut surface);
        handler.activate(&mut surface);
        assert_eq!(handler.activation_count(), 1);

        handler.deactivate(&mut surface);
        handler.deactivate(&mut surface);
        handler.activate(&mut surface);
        assert_eq!(handler.activation_count(), 2);
        assert!(handler.is_active());
    }

    #[test]
    fn custom_id_keeps_kind_defaults() {
        let handler = ToolHandler::with_id("messen-2", HandlerKind::Routing);

        assert_eq!(handler.id(), "messen-2");
        assert!(handler.options().prevent_default_click_handling);
        assert!(!handler.options().prevent_default_context_click_handling);
    }
}
