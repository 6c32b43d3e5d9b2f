//! Reine Mengen-Differenz zwischen Oberflächen-Zustand und gewünschter Liste.

use crate::core::{sorted_by_z_index, LayerDescriptor};
use std::collections::HashSet;

/// Ergebnis der Differenzbildung. Die drei Mengen sind disjunkt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Auf der Oberfläche, aber nicht mehr gewünscht (Oberflächen-Reihenfolge)
    pub to_remove: Vec<String>,
    /// Gewünscht, aber nicht auf der Oberfläche (z-Reihenfolge)
    pub to_add: Vec<String>,
    /// Gewünscht und vorhanden (z-Reihenfolge)
    pub to_update: Vec<String>,
    /// Alle gewünschten IDs in Ziel-Reihenfolge (unten → oben)
    pub target_order: Vec<String>,
}

impl ReconcilePlan {
    /// Berechnet den Plan aus aktuellen Oberflächen-IDs und gewünschter Liste.
    ///
    /// Doppelte IDs in `desired` zählen nur beim ersten Vorkommen.
    pub fn compute(current: &[String], desired: &[LayerDescriptor]) -> Self {
        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();

        let unique_desired = unique(desired);
        let target_order: Vec<String> = sorted_by_z_index(&unique_desired)
            .iter()
            .map(|d| d.id.clone())
            .collect();
        let desired_set: HashSet<&str> = target_order.iter().map(String::as_str).collect();

        let to_remove = current
            .iter()
            .filter(|id| !desired_set.contains(id.as_str()))
            .cloned()
            .collect();
        let (to_update, to_add): (Vec<String>, Vec<String>) = target_order
            .iter()
            .cloned()
            .partition(|id| current_set.contains(id.as_str()));

        Self {
            to_remove,
            to_add,
            to_update,
            target_order,
        }
    }

    /// Gibt `true` zurück, wenn weder hinzugefügt noch entfernt werden muss.
    pub fn is_stable(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Entfernt spätere Duplikate (erste ID gewinnt).
pub(crate) fn unique(desired: &[LayerDescriptor]) -> Vec<LayerDescriptor> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::with_capacity(desired.len());
    for descriptor in desired {
        if seen.insert(descriptor.id.as_str()) {
            result.push(descriptor.clone());
        } else {
            log::warn!("Doppelte Layer-ID '{}' ignoriert", descriptor.id);
        }
    }
    result
}
