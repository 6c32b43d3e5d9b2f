//! GeoResources, einmalig auflösbare Futures und der Resolver-Vertrag.

use super::geometry::Extent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Art der Render-Daten einer GeoResource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoResourceKind {
    /// Vektor-Features mit optional bekannter Ausdehnung
    Vector { extent: Option<Extent> },
    /// Kachel-Daten (Raster/XYZ/WMS)
    Tiles { url: String },
    /// Zusammengesetzte Ressource (wird als Layer-Gruppe gerendert)
    Aggregate(Vec<GeoResource>),
}

/// Adressierbare Referenz auf renderbare Daten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResource {
    pub id: String,
    /// Anzeigename
    pub label: String,
    pub kind: GeoResourceKind,
}

impl GeoResource {
    /// Vektor-Ressource mit optionaler Ausdehnung.
    pub fn vector(id: impl Into<String>, label: impl Into<String>, extent: Option<Extent>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: GeoResourceKind::Vector { extent },
        }
    }

    /// Kachel-Ressource.
    pub fn tiles(id: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: GeoResourceKind::Tiles { url: url.into() },
        }
    }

    /// Zusammengesetzte Ressource aus Kind-Ressourcen.
    pub fn aggregate(
        id: impl Into<String>,
        label: impl Into<String>,
        children: Vec<GeoResource>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: GeoResourceKind::Aggregate(children),
        }
    }
}

/// Zustand eines [`GeoResourceFuture`].
#[derive(Debug, Clone, PartialEq)]
pub enum FutureState {
    Pending,
    Resolved(GeoResource),
    Rejected(String),
}

/// Einmalig auflösbarer, memoisierter Platzhalter für eine ladende GeoResource.
///
/// Klone teilen sich denselben Zustand. Nur die erste Auflösung zählt.
#[derive(Debug, Clone)]
pub struct GeoResourceFuture {
    id: String,
    state: Rc<RefCell<FutureState>>,
}

impl GeoResourceFuture {
    /// Erstellt ein noch offenes Future für die GeoResource `id`.
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Rc::new(RefCell::new(FutureState::Pending)),
        }
    }

    /// ID der erwarteten GeoResource.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Aktueller Zustand (Kopie).
    pub fn state(&self) -> FutureState {
        self.state.borrow().clone()
    }

    /// Ist das Future bereits aufgelöst oder abgelehnt?
    pub fn is_settled(&self) -> bool {
        !matches!(*self.state.borrow(), FutureState::Pending)
    }

    /// Ergebnis nach der Auflösung; `None`, solange das Future offen ist.
    pub fn outcome(&self) -> Option<Result<GeoResource, String>> {
        match &*self.state.borrow() {
            FutureState::Pending => None,
            FutureState::Resolved(resource) => Some(Ok(resource.clone())),
            FutureState::Rejected(reason) => Some(Err(reason.clone())),
        }
    }

    /// Löst das Future mit einer Ressource auf. Gibt `false` zurück, falls bereits aufgelöst.
    pub fn resolve(&self, resource: GeoResource) -> bool {
        self.settle(FutureState::Resolved(resource))
    }

    /// Lehnt das Future ab. Gibt `false` zurück, falls bereits aufgelöst.
    pub fn reject(&self, reason: impl Into<String>) -> bool {
        self.settle(FutureState::Rejected(reason.into()))
    }

    fn settle(&self, next: FutureState) -> bool {
        let mut state = self.state.borrow_mut();
        if !matches!(*state, FutureState::Pending) {
            log::debug!("Future '{}' bereits aufgelöst, ignoriere erneute Auflösung", self.id);
            return false;
        }
        *state = next;
        true
    }
}

/// Ergebnis eines Resolver-Lookups.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(GeoResource),
    Pending(GeoResourceFuture),
    Missing,
}

/// Schnittstelle zum Nachschlagen von GeoResources.
pub trait GeoResourceResolver {
    /// Liefert die Ressource, ein offenes Future oder nichts.
    fn by_id(&self, id: &str) -> Resolution;
}

/// Einfacher Resolver auf Basis einer Tabelle (Demo, Tests).
#[derive(Debug, Default)]
pub struct StaticResolver {
    entries: IndexMap<String, Resolution>,
}

impl StaticResolver {
    /// Erstellt einen leeren Resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert eine bereits geladene Ressource.
    pub fn insert(&mut self, resource: GeoResource) {
        self.entries
            .insert(resource.id.clone(), Resolution::Resolved(resource));
    }

    /// Registriert ein offenes Future und gibt einen Klon davon zurück.
    pub fn insert_pending(&mut self, id: impl Into<String>) -> GeoResourceFuture {
        let future = GeoResourceFuture::pending(id);
        self.entries
            .insert(future.id().to_string(), Resolution::Pending(future.clone()));
        future
    }
}

impl GeoResourceResolver for StaticResolver {
    fn by_id(&self, id: &str) -> Resolution {
        match self.entries.get(id) {
            // Aufgelöste Futures werden wie geladene Ressourcen behandelt
            Some(Resolution::Pending(future)) => match future.state() {
                FutureState::Resolved(resource) => Resolution::Resolved(resource),
                _ => Resolution::Pending(future.clone()),
            },
            Some(other) => other.clone(),
            None => Resolution::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_settles_only_once() {
        let future = GeoResourceFuture::pending("g1");
        let clone = future.clone();

        assert!(clone.resolve(GeoResource::tiles("g1", "Basis", "https://tiles")));
        assert!(!future.reject("zu spät"));
        assert!(future.is_settled());
        assert!(matches!(future.state(), FutureState::Resolved(r) if r.label == "Basis"));
        assert!(matches!(future.outcome(), Some(Ok(r)) if r.id == "g1"));
    }

    #[test]
    fn static_resolver_returns_memoized_future() {
        let mut resolver = StaticResolver::new();
        let future = resolver.insert_pending("g1");

        let Resolution::Pending(first) = resolver.by_id("g1") else {
            panic!("Pending erwartet");
        };
        first.resolve(GeoResource::vector("g1", "Punkte", None));

        assert!(future.is_settled());
        assert!(matches!(resolver.by_id("g1"), Resolution::Resolved(_)));
        assert!(matches!(resolver.by_id("unbekannt"), Resolution::Missing));
    }
}
