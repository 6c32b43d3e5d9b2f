//! Geteilte Konfiguration für `app` und `ui`.

pub mod options;

pub use options::EngineOptions;
pub use options::{DRAG_THRESHOLD_PX, FIT_PADDING_PX, LONG_PRESS_MS, VIEW_ANIMATION_MS};
