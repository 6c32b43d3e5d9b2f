/// Änderungs-Benachrichtigung des Stores an seine Abonnenten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// Liste der Layer-Deskriptoren hat sich geändert
    Layers,
    /// Gewünschte Ansicht hat sich geändert
    View,
    /// Ein Fit-Request liegt vor
    FitRequested,
}
