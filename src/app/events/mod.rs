//! Store-Commands, Store-Änderungen und semantische Karten-Events.

mod change;
mod command;
mod map_event;

pub use change::StoreChange;
pub use command::{NotificationLevel, StoreCommand};
pub use map_event::{MapEvent, PointerEventClass};
