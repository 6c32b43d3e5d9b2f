use glam::DVec2;

/// Klasse eines semantischen Pointer-Events (für Handler-Vetos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventClass {
    Click,
    ContextClick,
}

/// Semantisches, eingabegeräte-unabhängiges Karten-Event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// Primärer Klick bzw. Tap
    Click {
        coordinate: DVec2,
        screen_coordinate: DVec2,
    },
    /// Kontext-Klick bzw. Long-Press
    ContextClick {
        coordinate: DVec2,
        screen_coordinate: DVec2,
    },
}

impl MapEvent {
    /// Klasse des Events.
    pub fn class(&self) -> PointerEventClass {
        match self {
            MapEvent::Click { .. } => PointerEventClass::Click,
            MapEvent::ContextClick { .. } => PointerEventClass::ContextClick,
        }
    }

    /// Kartenkoordinate des Events.
    pub fn coordinate(&self) -> DVec2 {
        match self {
            MapEvent::Click { coordinate, .. } | MapEvent::ContextClick { coordinate, .. } => {
                *coordinate
            }
        }
    }
}
