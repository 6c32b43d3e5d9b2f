//! Gesten-Klassifikation: rohe Pointer-/Touch-Eingaben → `MapEvent`.
//!
//! Aufgeteilt in:
//! - `touch`: Zustandsautomat je Touch-Pointer (Pressing, LongPress, Dragging)
//! - `PointerGestureClassifier`: Stream-Verwaltung, Veto-Prüfung, Koordinaten
//!
//! Die Uhr wird injiziert: Jede zeitbehaftete Eingabe trägt `time_ms`,
//! zusätzlich meldet [`PointerGestureClassifier::tick`] abgelaufene Long-Presses.

mod touch;

use crate::app::tools::HandlerRegistry;
use crate::app::{MapEvent, PointerEventClass};
use crate::core::RenderSurface;
use crate::shared::EngineOptions;
use glam::DVec2;
use indexmap::IndexMap;
use touch::{TouchOutcome, TouchPhase, TouchStream};

/// Eingabemodell der Plattform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModel {
    /// Touch-Geräte: Tap / Long-Press werden aus Touch-Streams abgeleitet
    Touch,
    /// Maus: native Klick- und Kontextmenü-Events
    Pointer,
}

/// Rohe Eingabe der Plattform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    TouchStart {
        pointer_id: u64,
        screen: DVec2,
        time_ms: u64,
    },
    TouchMove {
        pointer_id: u64,
        screen: DVec2,
        time_ms: u64,
    },
    TouchEnd {
        pointer_id: u64,
        screen: DVec2,
        time_ms: u64,
    },
    TouchCancel {
        pointer_id: u64,
        time_ms: u64,
    },
    /// Nativer Primär-Klick
    Click { screen: DVec2 },
    /// Natives Kontextmenü (Rechtsklick)
    ContextMenu { screen: DVec2 },
}

impl PointerInput {
    fn time_ms(&self) -> Option<u64> {
        match self {
            PointerInput::TouchStart { time_ms, .. }
            | PointerInput::TouchMove { time_ms, .. }
            | PointerInput::TouchEnd { time_ms, .. }
            | PointerInput::TouchCancel { time_ms, .. } => Some(*time_ms),
            PointerInput::Click { .. } | PointerInput::ContextMenu { .. } => None,
        }
    }

    fn is_touch(&self) -> bool {
        self.time_ms().is_some()
    }
}

/// Klassifiziert rohe Eingaben in `Click` und `ContextClick`.
#[derive(Debug, Clone)]
pub struct PointerGestureClassifier {
    model: InputModel,
    long_press_ms: u64,
    drag_threshold_px: f64,
    streams: IndexMap<u64, TouchStream>,
}

impl PointerGestureClassifier {
    /// Erstellt einen Klassifikator mit den Schwellen aus den Optionen.
    pub fn new(model: InputModel, options: &EngineOptions) -> Self {
        Self {
            model,
            long_press_ms: options.long_press_ms,
            drag_threshold_px: options.drag_threshold_px,
            streams: IndexMap::new(),
        }
    }

    /// Aktives Eingabemodell.
    pub fn model(&self) -> InputModel {
        self.model
    }

    /// Anzahl laufender Touch-Streams.
    pub fn active_streams(&self) -> usize {
        self.streams.len()
    }

    /// Meldet abgelaufene Long-Presses zum Zeitpunkt `now_ms`.
    pub fn tick(
        &mut self,
        now_ms: u64,
        handlers: &HandlerRegistry,
        surface: &dyn RenderSurface,
    ) -> Vec<MapEvent> {
        let long_press_ms = self.long_press_ms;
        let expired: Vec<DVec2> = self
            .streams
            .values_mut()
            .filter_map(|stream| match stream.elapse(now_ms, long_press_ms) {
                TouchOutcome::LongPress(screen) => Some(screen),
                TouchOutcome::None | TouchOutcome::Tap(_) => None,
            })
            .collect();

        expired
            .into_iter()
            .filter_map(|screen| emit(PointerEventClass::ContextClick, screen, handlers, surface))
            .collect()
    }

    /// Verarbeitet eine Eingabe und liefert die daraus entstandenen Events.
    pub fn handle(
        &mut self,
        input: PointerInput,
        handlers: &HandlerRegistry,
        surface: &dyn RenderSurface,
    ) -> Vec<MapEvent> {
        let accepted = match self.model {
            InputModel::Touch => input.is_touch(),
            InputModel::Pointer => !input.is_touch(),
        };
        if !accepted {
            return Vec::new();
        }

        // Long-Press-Schwelle kann seit dem letzten Tick abgelaufen sein
        let mut events = match input.time_ms() {
            Some(now_ms) => self.tick(now_ms, handlers, surface),
            None => Vec::new(),
        };

        let gesture = match input {
            PointerInput::Click { screen } => Some((PointerEventClass::Click, screen)),
            PointerInput::ContextMenu { screen } => {
                Some((PointerEventClass::ContextClick, screen))
            }
            PointerInput::TouchStart {
                pointer_id,
                screen,
                time_ms,
            } => {
                self.touch_start(pointer_id, screen, time_ms);
                None
            }
            PointerInput::TouchMove {
                pointer_id, screen, ..
            } => {
                if let Some(stream) = self.streams.get_mut(&pointer_id) {
                    stream.moved(screen, self.drag_threshold_px);
                }
                None
            }
            PointerInput::TouchEnd {
                pointer_id, screen, ..
            } => self.streams.shift_remove(&pointer_id).and_then(|mut stream| {
                stream.moved(screen, self.drag_threshold_px);
                match stream.released() {
                    TouchOutcome::Tap(origin) => Some((PointerEventClass::Click, origin)),
                    TouchOutcome::None | TouchOutcome::LongPress(_) => None,
                }
            }),
            PointerInput::TouchCancel { pointer_id, .. } => {
                self.streams.shift_remove(&pointer_id);
                None
            }
        };

        if let Some((class, screen)) = gesture {
            events.extend(emit(class, screen, handlers, surface));
        }
        events
    }

    fn touch_start(&mut self, pointer_id: u64, screen: DVec2, time_ms: u64) {
        let mut stream = TouchStream::new(screen, time_ms);
        if !self.streams.is_empty() {
            log::debug!("Multi-Touch erkannt, breche alle Touch-Gesten ab");
            for other in self.streams.values_mut() {
                other.phase = TouchPhase::Cancelled;
            }
            stream.phase = TouchPhase::Cancelled;
        }
        self.streams.insert(pointer_id, stream);
    }
}

/// Erzeugt ein Event, sofern kein aktiver Handler widerspricht.
fn emit(
    class: PointerEventClass,
    screen: DVec2,
    handlers: &HandlerRegistry,
    surface: &dyn RenderSurface,
) -> Option<MapEvent> {
    if handlers.vetoes(class) {
        log::debug!("{:?} durch aktiven Handler unterdrückt", class);
        return None;
    }
    let Some(coordinate) = surface.coordinate_from_pixel(screen) else {
        log::debug!("Keine Kartenkoordinate für {:?}", screen);
        return None;
    };
    Some(match class {
        PointerEventClass::Click => MapEvent::Click {
            coordinate,
            screen_coordinate: screen,
        },
        PointerEventClass::ContextClick => MapEvent::ContextClick {
            coordinate,
            screen_coordinate: screen,
        },
    })
}
