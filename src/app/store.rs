//! In-Process-Store für Layer-Deskriptoren, gewünschte Ansicht und Fit-Requests.
//!
//! Abonnenten erhalten `StoreChange`-Benachrichtigungen über einen Kanal und
//! lesen den Zustand anschließend per [`MapStore::state`].

use super::fit::FitRequest;
use super::{CommandLog, NotificationLevel, StoreChange, StoreCommand};
use crate::core::{clamp_opacity, LayerDescriptor, ViewState};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Benutzer-Benachrichtigung (z.B. für fehlgeschlagene Layer).
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Zustand des Stores.
#[derive(Debug, Clone, Default)]
pub struct MapStoreState {
    /// Layer-Deskriptoren in Render-Reihenfolge
    pub layers: Vec<LayerDescriptor>,
    /// Gewünschte Ansicht; `None` bis zum ersten `SetView`
    pub view: Option<ViewState>,
    /// Offener Fit-Request
    pub fit_request: Option<FitRequest>,
    /// Angefallene Benachrichtigungen
    pub notifications: Vec<Notification>,
}

/// Store mit Change-Benachrichtigung.
#[derive(Default)]
pub struct MapStore {
    state: MapStoreState,
    subscribers: Vec<Sender<StoreChange>>,
    /// Log aller ausgeführten Commands
    pub command_log: CommandLog,
}

impl MapStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt einen Store mit eigener Command-Log-Kapazität.
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            command_log: CommandLog::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Aktueller Zustand (read-only).
    pub fn state(&self) -> &MapStoreState {
        &self.state
    }

    /// Registriert einen Abonnenten für Änderungen.
    pub fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Entnimmt den offenen Fit-Request.
    pub fn take_fit_request(&mut self) -> Option<FitRequest> {
        self.state.fit_request.take()
    }

    /// Führt einen Command aus und benachrichtigt bei Änderung.
    pub fn dispatch(&mut self, command: StoreCommand) {
        self.command_log.record(&command);

        let change = match command {
            StoreCommand::AddLayer { descriptor } => self.add_layer(descriptor),
            StoreCommand::RemoveLayer { id } => self.remove_layer(&id),
            StoreCommand::ModifyLayer {
                id,
                visible,
                opacity,
                z_index,
            } => self.modify_layer(&id, visible, opacity, z_index),
            StoreCommand::UpdateLayerLabel { id, label } => self.update_label(&id, label),
            StoreCommand::SetView { view } => {
                if self.state.view == Some(view) {
                    None
                } else {
                    self.state.view = Some(view);
                    Some(StoreChange::View)
                }
            }
            StoreCommand::RequestFit { request } => {
                self.state.fit_request = Some(request);
                Some(StoreChange::FitRequested)
            }
            StoreCommand::Notify { level, message } => {
                self.state.notifications.push(Notification { level, message });
                None
            }
        };

        if let Some(change) = change {
            self.notify(change);
        }
    }

    fn notify(&mut self, change: StoreChange) {
        // Abonnenten mit geschlossenem Empfänger werden verworfen
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    fn add_layer(&mut self, mut descriptor: LayerDescriptor) -> Option<StoreChange> {
        if self.state.layers.iter().any(|l| l.id == descriptor.id) {
            log::warn!("Layer '{}' existiert bereits, ignoriere", descriptor.id);
            return None;
        }
        descriptor.opacity = clamp_opacity(descriptor.opacity);
        let index = usize::try_from(descriptor.z_index)
            .unwrap_or(0)
            .min(self.state.layers.len());
        self.state.layers.insert(index, descriptor);
        self.normalize_layers();
        Some(StoreChange::Layers)
    }

    fn remove_layer(&mut self, id: &str) -> Option<StoreChange> {
        let before = self.state.layers.len();
        self.state.layers.retain(|l| l.id != id);
        if self.state.layers.len() == before {
            return None;
        }
        self.normalize_layers();
        Some(StoreChange::Layers)
    }

    fn modify_layer(
        &mut self,
        id: &str,
        visible: Option<bool>,
        opacity: Option<f32>,
        z_index: Option<i32>,
    ) -> Option<StoreChange> {
        let index = self.state.layers.iter().position(|l| l.id == id)?;
        let mut descriptor = self.state.layers.remove(index);
        if let Some(visible) = visible {
            descriptor.visible = visible;
        }
        if let Some(opacity) = opacity {
            descriptor.opacity = clamp_opacity(opacity);
        }
        let target = match z_index {
            Some(z) => usize::try_from(z).unwrap_or(0),
            None => index,
        }
        .min(self.state.layers.len());
        self.state.layers.insert(target, descriptor);
        self.normalize_layers();
        Some(StoreChange::Layers)
    }

    fn update_label(&mut self, id: &str, label: String) -> Option<StoreChange> {
        let descriptor = self.state.layers.iter_mut().find(|l| l.id == id)?;
        if descriptor.label.as_deref() == Some(label.as_str()) {
            return None;
        }
        descriptor.label = Some(label);
        Some(StoreChange::Layers)
    }

    /// `always_top`-Layer nach oben, danach `z_index` = Listenposition.
    fn normalize_layers(&mut self) {
        let (top, mut regular): (Vec<_>, Vec<_>) = std::mem::take(&mut self.state.layers)
            .into_iter()
            .partition(|l| l.constraints.always_top);
        regular.extend(top);
        for (index, layer) in regular.iter_mut().enumerate() {
            layer.z_index = index as i32;
        }
        self.state.layers = regular;
    }
}
