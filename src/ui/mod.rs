//! Eingabe-Verarbeitung: Gesten-Klassifikation für Karten-Events.

pub mod input;

pub use input::{InputModel, PointerGestureClassifier, PointerInput};
