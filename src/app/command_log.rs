//! Begrenztes Log der im Store ausgeführten Commands.

use super::StoreCommand;
use crate::shared::options::COMMAND_LOG_CAPACITY;

/// Speichert ausgeführte Commands in Reihenfolge.
pub struct CommandLog {
    entries: Vec<StoreCommand>,
    capacity: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLog {
    /// Erstellt ein leeres Command-Log mit Standard-Kapazität.
    pub fn new() -> Self {
        Self::with_capacity(COMMAND_LOG_CAPACITY)
    }

    /// Erstellt ein leeres Command-Log mit eigener Kapazität (mindestens 2).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(2),
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Bei voller Kapazität wird die ältere Hälfte verworfen.
    pub fn record(&mut self, command: &StoreCommand) {
        if self.entries.len() >= self.capacity {
            self.entries.drain(..self.capacity / 2);
        }
        self.entries.push(command.clone());
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[StoreCommand] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_drops_older_half_when_full() {
        let mut log = CommandLog::with_capacity(4);
        for i in 0..5 {
            log.record(&StoreCommand::RemoveLayer {
                id: format!("l{i}"),
            });
        }

        assert_eq!(log.len(), 3);
        assert_eq!(
            log.entries().first(),
            Some(&StoreCommand::RemoveLayer { id: "l2".into() })
        );
    }
}
