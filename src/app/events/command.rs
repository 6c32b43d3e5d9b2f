use crate::app::fit::FitRequest;
use crate::core::{LayerDescriptor, ViewState};

/// Schweregrad einer Benutzer-Benachrichtigung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Commands sind mutierende Schritte, die zentral im Store ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Layer-Deskriptor hinzufügen (Position gemäß `z_index`)
    AddLayer { descriptor: LayerDescriptor },
    /// Layer-Deskriptor entfernen
    RemoveLayer { id: String },
    /// Sichtbarkeit, Deckkraft oder Position eines Layers ändern
    ModifyLayer {
        id: String,
        visible: Option<bool>,
        opacity: Option<f32>,
        z_index: Option<i32>,
    },
    /// Anzeigename aus aufgelöster Ressource übernehmen
    UpdateLayerLabel { id: String, label: String },
    /// Gewünschte Ansicht setzen
    SetView { view: ViewState },
    /// Einpassen auf Layer oder Ausdehnung anfordern
    RequestFit { request: FitRequest },
    /// Benachrichtigung für den Benutzer
    Notify {
        level: NotificationLevel,
        message: String,
    },
}
