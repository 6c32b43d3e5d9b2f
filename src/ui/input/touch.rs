//! Zustandsautomat eines einzelnen Touch-Pointers.

use glam::DVec2;

/// Phase eines aktiven Touch-Streams (ohne Stream = Idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TouchPhase {
    /// Finger liegt auf, weder Long-Press noch Drag erkannt
    Pressing,
    /// Long-Press bereits gemeldet, Loslassen erzeugt nichts mehr
    LongPress,
    /// Bewegung über der Drag-Schwelle (Pan), erzeugt nichts
    Dragging,
    /// Durch Multi-Touch abgebrochen
    Cancelled,
}

/// Ergebnis eines Zustandsübergangs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TouchOutcome {
    None,
    Tap(DVec2),
    LongPress(DVec2),
}

/// Ein Touch-Stream von Druck bis Loslassen.
#[derive(Debug, Clone)]
pub(crate) struct TouchStream {
    pub(crate) phase: TouchPhase,
    origin: DVec2,
    pressed_at_ms: u64,
}

impl TouchStream {
    pub(crate) fn new(origin: DVec2, pressed_at_ms: u64) -> Self {
        Self {
            phase: TouchPhase::Pressing,
            origin,
            pressed_at_ms,
        }
    }

    /// Prüft die Long-Press-Schwelle zum Zeitpunkt `now_ms`.
    pub(crate) fn elapse(&mut self, now_ms: u64, long_press_ms: u64) -> TouchOutcome {
        if self.phase == TouchPhase::Pressing
            && now_ms.saturating_sub(self.pressed_at_ms) >= long_press_ms
        {
            self.phase = TouchPhase::LongPress;
            return TouchOutcome::LongPress(self.origin);
        }
        TouchOutcome::None
    }

    /// Bewegung: wechselt bei Überschreiten der Schwelle nach `Dragging`.
    pub(crate) fn moved(&mut self, screen: DVec2, drag_threshold_px: f64) {
        if self.phase == TouchPhase::Pressing
            && screen.distance(self.origin) > drag_threshold_px
        {
            self.phase = TouchPhase::Dragging;
        }
    }

    /// Loslassen: nur aus `Pressing` entsteht ein Tap.
    pub(crate) fn released(self) -> TouchOutcome {
        match self.phase {
            TouchPhase::Pressing => TouchOutcome::Tap(self.origin),
            TouchPhase::LongPress | TouchPhase::Dragging | TouchPhase::Cancelled => {
                TouchOutcome::None
            }
        }
    }
}
