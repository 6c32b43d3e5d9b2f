//! Handler-Registry: interaktive Werkzeuge, die wie Layer adressiert werden.
//!
//! Jeder Handler implementiert den `MapHandler`-Trait und wird einmalig beim
//! Start in der `HandlerRegistry` registriert. Aktivierung erfolgt
//! ausschließlich über die Deskriptor-Liste (durch den Reconciler).

/// MapHandler-Trait: Schnittstelle für alle Werkzeuge.
mod map_handler;
/// Standard-Werkzeuge (Geolocation, Messen, Zeichnen, …).
pub mod tool_handler;

pub use map_handler::{HandlerOptions, MapHandler};
pub use tool_handler::{HandlerKind, ToolHandler};

use crate::app::PointerEventClass;
use crate::core::{RenderLayer, RenderSurface};
use indexmap::IndexMap;

/// Verwaltet registrierte Handler in Registrierungsreihenfolge.
pub struct HandlerRegistry {
    handlers: IndexMap<String, Box<dyn MapHandler>>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    /// Erstellt eine leere Registry.
    pub fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Erstellt eine Registry mit vorregistrierten Standard-Werkzeugen.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for kind in HandlerKind::ALL {
            registry.register(Box::new(ToolHandler::new(kind)));
        }
        registry
    }

    /// Registriert einen Handler. Eine bereits vergebene ID wird ersetzt.
    pub fn register(&mut self, handler: Box<dyn MapHandler>) {
        let id = handler.id().to_string();
        if self.handlers.insert(id.clone(), handler).is_some() {
            log::warn!("Handler '{}' doppelt registriert, ersetze", id);
        }
    }

    /// Gibt die Anzahl registrierter Handler zurück.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Gibt `true` zurück, wenn keine Handler registriert sind.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Gibt `true` zurück, wenn ein Handler mit dieser ID existiert.
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// IDs aller aktiven Handler in Registrierungsreihenfolge.
    pub fn active_ids(&self) -> Vec<&str> {
        self.handlers
            .values()
            .filter(|h| h.is_active())
            .map(|h| h.id())
            .collect()
    }

    /// Aktiviert einen Handler und liefert seinen Layer; `None` bei unbekannter ID.
    pub fn activate(&mut self, id: &str, surface: &mut dyn RenderSurface) -> Option<RenderLayer> {
        let handler = self.handlers.get_mut(id)?;
        Some(handler.activate(surface))
    }

    /// Deaktiviert einen aktiven Handler. Gibt `true` zurück, wenn er aktiv war.
    pub fn deactivate(&mut self, id: &str, surface: &mut dyn RenderSurface) -> bool {
        match self.handlers.get_mut(id) {
            Some(handler) if handler.is_active() => {
                handler.deactivate(surface);
                true
            }
            _ => false,
        }
    }

    /// Verhindert ein aktiver Handler die Standard-Behandlung dieser Event-Klasse?
    ///
    /// Die Optionen werden bei jedem Aufruf neu gelesen.
    pub fn vetoes(&self, class: PointerEventClass) -> bool {
        self.handlers.values().filter(|h| h.is_active()).any(|h| {
            let options = h.options();
            match class {
                PointerEventClass::Click => options.prevent_default_click_handling,
                PointerEventClass::ContextClick => options.prevent_default_context_click_handling,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;

    #[test]
    fn new_registers_standard_tools_in_order() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.len(), HandlerKind::ALL.len());
        assert!(registry.contains("measurement"));
        assert!(registry.active_ids().is_empty());
    }

    #[test]
    fn activate_and_deactivate_are_idempotent() {
        let mut registry = HandlerRegistry::new();
        let mut surface = MemorySurface::new();

        let first = registry.activate("draw", &mut surface).expect("Layer erwartet");
        let second = registry.activate("draw", &mut surface).expect("Layer erwartet");
        assert_eq!(first, second);
        assert_eq!(registry.active_ids(), vec!["draw"]);

        assert!(registry.deactivate("draw", &mut surface));
        assert!(!registry.deactivate("draw", &mut surface));
        assert!(registry.active_ids().is_empty());
        assert!(registry.activate("unbekannt", &mut surface).is_none());
    }

    #[test]
    fn veto_only_considers_active_handlers() {
        let mut registry = HandlerRegistry::new();
        let mut surface = MemorySurface::new();
        assert!(!registry.vetoes(PointerEventClass::Click));

        registry.activate("routing", &mut surface);
        assert!(registry.vetoes(PointerEventClass::Click));
        assert!(!registry.vetoes(PointerEventClass::ContextClick));

        registry.deactivate("routing", &mut surface);
        assert!(!registry.vetoes(PointerEventClass::Click));
    }

    #[test]
    fn veto_reads_options_on_every_query() {
        let mut registry = HandlerRegistry::empty();
        registry.register(Box::new(ToolHandler::new(HandlerKind::Highlight)));
        let mut surface = MemorySurface::new();
        registry.activate("highlight", &mut surface);
        assert!(!registry.vetoes(PointerEventClass::ContextClick));

        // Ersetzter Handler mit anderen Optionen: nächste Abfrage sieht den neuen Wert
        registry.register(Box::new({
            let mut handler = ToolHandler::new(HandlerKind::Highlight);
            handler.set_options(HandlerOptions {
                prevent_default_click_handling: false,
                prevent_default_context_click_handling: true,
            });
            handler.activate(&mut surface);
            handler
        }));

        assert!(registry.vetoes(PointerEventClass::ContextClick));
    }
}
