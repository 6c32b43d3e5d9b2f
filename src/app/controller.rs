//! Map-Controller: verbindet Store, Reconciler, View-Sync, Fit und Gesten.
//!
//! Ein Aufruf von [`MapController::pump`] entspricht einem Durchlauf der
//! Event-Loop: Store-Änderungen abarbeiten, aufgelöste Futures einarbeiten,
//! gesammelte Commands an den Store zurückgeben.

use super::fit::FitController;
use super::reconciler::{LayerReconciler, ReconcileContext, ReconcileReport};
use super::store::MapStore;
use super::tools::HandlerRegistry;
use super::view_sync::ViewSynchronizer;
use super::{MapEvent, StoreChange, StoreCommand};
use crate::core::{GeoResourceResolver, RenderSurface};
use crate::shared::EngineOptions;
use crate::ui::{InputModel, PointerGestureClassifier, PointerInput};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Obergrenze für [`MapController::run_until_idle`].
const MAX_PUMP_ROUNDS: usize = 64;

/// Orchestriert alle Kernkomponenten gegen Store und Render-Oberfläche.
pub struct MapController {
    handlers: HandlerRegistry,
    reconciler: LayerReconciler,
    view_sync: ViewSynchronizer,
    fit: FitController,
    gestures: PointerGestureClassifier,
    store_changes: Receiver<StoreChange>,
    event_subscribers: Vec<Sender<MapEvent>>,
    /// Erster Durchlauf gleicht den bestehenden Store-Zustand ab
    initial_sync: bool,
    /// Store-Ansicht hat sich während einer Fit-Animation geändert
    view_sync_deferred: bool,
}

impl MapController {
    /// Erstellt einen Controller und abonniert den Store.
    pub fn new(
        options: &EngineOptions,
        handlers: HandlerRegistry,
        store: &mut MapStore,
        input_model: InputModel,
    ) -> Self {
        log::info!(
            "MapController gestartet ({} Handler, Eingabemodell {:?})",
            handlers.len(),
            input_model
        );
        Self {
            handlers,
            reconciler: LayerReconciler::new(),
            view_sync: ViewSynchronizer::new(options),
            fit: FitController::new(options),
            gestures: PointerGestureClassifier::new(input_model, options),
            store_changes: store.subscribe(),
            event_subscribers: Vec::new(),
            initial_sync: true,
            view_sync_deferred: false,
        }
    }

    /// Registrierte Handler.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Registrierte Handler (mutierbar, z.B. für Veto-Optionen).
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    /// Wartet der Layer noch auf seine GeoResource?
    pub fn is_pending(&self, layer_id: &str) -> bool {
        self.reconciler.is_pending(layer_id)
    }

    /// Läuft eine Benutzer-Interaktion mit der Ansicht?
    pub fn is_interacting(&self) -> bool {
        self.view_sync.is_interacting()
    }

    /// Abonniert semantische Karten-Events.
    pub fn subscribe_events(&mut self) -> Receiver<MapEvent> {
        let (tx, rx) = channel();
        self.event_subscribers.push(tx);
        rx
    }

    /// Ein Durchlauf der Event-Loop.
    ///
    /// Gibt die Anzahl verarbeiteter Änderungen, Auflösungen und Commands zurück
    /// (0 = nichts zu tun). Eine noch laufende Fit-Animation zählt nicht als
    /// Arbeit; ihr Ergebnis wird in einem späteren Durchlauf zurückgeschrieben.
    pub fn pump(
        &mut self,
        store: &mut MapStore,
        surface: &mut dyn RenderSurface,
        resolver: &dyn GeoResourceResolver,
    ) -> usize {
        let mut changes = Vec::new();
        if std::mem::take(&mut self.initial_sync) {
            changes.extend([StoreChange::Layers, StoreChange::View]);
        }
        changes.extend(self.store_changes.try_iter());

        let mut commands = Vec::new();
        let mut work = changes.len();

        for change in changes {
            match change {
                StoreChange::Layers => {
                    let report = self.reconciler.reconcile(
                        &store.state().layers,
                        &mut ReconcileContext {
                            surface: &mut *surface,
                            resolver,
                            handlers: &mut self.handlers,
                        },
                    );
                    self.absorb(report, &mut *surface, &mut commands);
                }
                StoreChange::View if self.fit.is_in_flight() => {
                    log::debug!("Fit-Animation läuft, View-Sync zurückgestellt");
                    self.view_sync_deferred = true;
                }
                StoreChange::View => self.sync_view(store, &mut *surface),
                StoreChange::FitRequested => {
                    if let Some(request) = store.take_fit_request() {
                        // Neuer Fit ersetzt eine zurückgestellte Store-Ansicht
                        self.view_sync_deferred = false;
                        self.fit.fit(request, &mut *surface, &self.reconciler);
                    }
                }
            }
        }

        let settled = self.reconciler.settle_pending(&mut ReconcileContext {
            surface: &mut *surface,
            resolver,
            handlers: &mut self.handlers,
        });
        work += settled.settled.len();
        self.absorb(settled, &mut *surface, &mut commands);

        if let Some(command) = self.fit.poll_completion(&*surface) {
            if std::mem::take(&mut self.view_sync_deferred) {
                log::debug!("Neuere Store-Ansicht ersetzt das Fit-Ergebnis");
                self.sync_view(store, &mut *surface);
                work += 1;
            } else {
                commands.push(command);
            }
        }

        work += commands.len();
        for command in commands {
            store.dispatch(command);
        }
        work
    }

    /// Wiederholt [`pump`](Self::pump), bis keine Arbeit mehr anfällt.
    pub fn run_until_idle(
        &mut self,
        store: &mut MapStore,
        surface: &mut dyn RenderSurface,
        resolver: &dyn GeoResourceResolver,
    ) -> usize {
        let mut rounds = 0;
        while rounds < MAX_PUMP_ROUNDS {
            rounds += 1;
            if self.pump(store, surface, resolver) == 0 {
                return rounds;
            }
        }
        log::warn!("Kein Ruhezustand nach {} Durchläufen", MAX_PUMP_ROUNDS);
        rounds
    }

    /// Klassifiziert eine Eingabe und verteilt entstandene Events.
    pub fn handle_pointer(
        &mut self,
        input: PointerInput,
        surface: &dyn RenderSurface,
    ) -> Vec<MapEvent> {
        let events = self.gestures.handle(input, &self.handlers, surface);
        self.publish(&events);
        events
    }

    /// Meldet abgelaufene Long-Presses zum Zeitpunkt `now_ms`.
    pub fn tick(&mut self, now_ms: u64, surface: &dyn RenderSurface) -> Vec<MapEvent> {
        let events = self.gestures.tick(now_ms, &self.handlers, surface);
        self.publish(&events);
        events
    }

    /// Beginn einer Benutzer-Interaktion (Pan, Zoom, Rotation).
    ///
    /// Ein laufender Fit wird verworfen; die Ansicht gehört jetzt dem Benutzer.
    pub fn begin_interaction(&mut self) {
        self.fit.cancel();
        self.view_sync_deferred = false;
        self.view_sync.begin_interaction();
    }

    /// Ende der Interaktion: Live-Ansicht einmalig in den Store schreiben.
    pub fn end_interaction(&mut self, store: &mut MapStore, surface: &dyn RenderSurface) {
        if let Some(command) = self.view_sync.end_interaction(surface) {
            store.dispatch(command);
        }
    }

    fn sync_view(&mut self, store: &MapStore, surface: &mut dyn RenderSurface) {
        match store.state().view {
            Some(view) => {
                self.view_sync.sync(&view, surface);
            }
            None => log::debug!("Keine gewünschte Ansicht im Store, Live-Ansicht bleibt"),
        }
    }

    fn absorb(
        &mut self,
        report: ReconcileReport,
        surface: &mut dyn RenderSurface,
        commands: &mut Vec<StoreCommand>,
    ) {
        for settled in &report.settled {
            self.fit.on_layer_settled(settled, surface);
        }
        for id in &report.removed {
            self.fit.on_layer_removed(id);
        }
        commands.extend(report.commands);
    }

    fn publish(&mut self, events: &[MapEvent]) {
        if events.is_empty() {
            return;
        }
        self.event_subscribers
            .retain(|tx| events.iter().all(|event| tx.send(*event).is_ok()));
    }
}
