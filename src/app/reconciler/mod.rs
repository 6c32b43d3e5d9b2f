//! Layer-Reconciler: bringt die Render-Oberfläche mit minimalen Mutationen
//! in Deckung mit der gewünschten Deskriptor-Liste.
//!
//! Ablauf je Aufruf: entfernen → hinzufügen → aktualisieren (inkl.
//! Positionskorrektur). Ladende GeoResources erhalten sofort einen
//! Platzhalter; die Auflösung wird in einem späteren Durchlauf über
//! [`LayerReconciler::settle_pending`] eingearbeitet.

mod plan;

pub use plan::ReconcilePlan;

use super::tools::HandlerRegistry;
use super::{NotificationLevel, StoreCommand};
use crate::core::{
    GeoResource, GeoResourceFuture, GeoResourceResolver, LayerDescriptor, LayerError,
    LayerProperties, RenderLayer, RenderSurface, Resolution,
};
use indexmap::IndexMap;

/// Gemeinsame Kollaborateure eines Reconcile-Durchlaufs.
pub struct ReconcileContext<'a> {
    pub surface: &'a mut dyn RenderSurface,
    pub resolver: &'a dyn GeoResourceResolver,
    pub handlers: &'a mut HandlerRegistry,
}

/// Ausgang einer Future-Auflösung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Endgültiger Layer eingefügt
    Resolved,
    /// Laden fehlgeschlagen, Layer entfernt
    Rejected,
}

/// Ein aufgelöster Platzhalter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledLayer {
    pub layer_id: String,
    pub outcome: SettleOutcome,
}

/// Seiteneffekte eines Durchlaufs, die außerhalb der Oberfläche wirken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// Commands an den Store (Entfernen fehlerhafter Layer, Labels, Meldungen)
    pub commands: Vec<StoreCommand>,
    /// Von der Oberfläche entfernte Layer-IDs
    pub removed: Vec<String>,
    /// Aufgelöste Platzhalter
    pub settled: Vec<SettledLayer>,
}

impl ReconcileReport {
    fn fail(&mut self, error: LayerError) {
        log::warn!("{error}");
        self.commands.push(StoreCommand::Notify {
            level: NotificationLevel::Warning,
            message: error.to_string(),
        });
        self.commands.push(StoreCommand::RemoveLayer {
            id: error.layer_id().to_string(),
        });
    }
}

/// Platzhalter, der auf die Auflösung einer GeoResource wartet.
#[derive(Debug, Clone)]
struct PendingLayer {
    geo_resource_id: String,
    future: GeoResourceFuture,
}

/// Gleicht die Render-Oberfläche mit der gewünschten Deskriptor-Liste ab.
#[derive(Debug, Default)]
pub struct LayerReconciler {
    /// Letzter abgeglichener Schnappschuss (ohne Duplikate)
    desired: Vec<LayerDescriptor>,
    /// Offene Platzhalter je Layer-ID
    pending: IndexMap<String, PendingLayer>,
}

impl LayerReconciler {
    /// Erstellt einen Reconciler ohne Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wartet der Layer noch auf seine GeoResource?
    pub fn is_pending(&self, layer_id: &str) -> bool {
        self.pending.contains_key(layer_id)
    }

    fn descriptor(&self, layer_id: &str) -> Option<&LayerDescriptor> {
        self.desired.iter().find(|d| d.id == layer_id)
    }

    /// Gleicht die Oberfläche mit `desired` ab.
    ///
    /// Zweimaliger Aufruf mit unveränderter Liste mutiert die Oberfläche
    /// beim zweiten Mal nicht.
    pub fn reconcile(
        &mut self,
        desired: &[LayerDescriptor],
        ctx: &mut ReconcileContext,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        self.desired = plan::unique(desired);
        let plan = ReconcilePlan::compute(&ctx.surface.layer_ids(), &self.desired);

        if !plan.is_stable() {
            log::debug!(
                "Reconcile: {} entfernen, {} hinzufügen, {} aktualisieren",
                plan.to_remove.len(),
                plan.to_add.len(),
                plan.to_update.len()
            );
        }

        for id in &plan.to_remove {
            self.remove(id, ctx);
            report.removed.push(id.clone());
        }

        for id in &plan.to_add {
            self.add(id, &plan.target_order, ctx, &mut report);
        }

        for id in &plan.to_update {
            self.update_properties(id, ctx);
        }

        enforce_order(&plan.target_order, ctx.surface);

        report
    }

    /// Arbeitet aufgelöste Futures ein (ein Durchlauf der Event-Loop).
    ///
    /// Offene Einträge gehören immer zu gewünschten Layern: [`reconcile`](Self::reconcile)
    /// verwirft sie beim Entfernen, eine spätere Auflösung erreicht die Oberfläche nie.
    pub fn settle_pending(&mut self, ctx: &mut ReconcileContext) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let settled: Vec<(String, Result<GeoResource, String>)> = self
            .pending
            .iter()
            .filter_map(|(id, p)| p.future.outcome().map(|result| (id.clone(), result)))
            .collect();

        for (layer_id, result) in settled {
            let Some(pending) = self.pending.shift_remove(&layer_id) else {
                continue;
            };
            if let Some(outcome) = self.settle(&layer_id, &pending, result, ctx, &mut report) {
                report.settled.push(SettledLayer { layer_id, outcome });
            }
        }

        report
    }

    fn settle(
        &self,
        layer_id: &str,
        pending: &PendingLayer,
        result: Result<GeoResource, String>,
        ctx: &mut ReconcileContext,
        report: &mut ReconcileReport,
    ) -> Option<SettleOutcome> {
        let descriptor = self.descriptor(layer_id)?;

        match result {
            Ok(resource) => {
                ctx.surface.remove_layer(layer_id);
                let layer =
                    RenderLayer::from_geo_resource(layer_id, &resource, properties_of(descriptor));
                let index = self.current_rank(layer_id, &*ctx.surface);
                ctx.surface.insert_layer_at(layer, index);
                log::debug!("Platzhalter '{}' durch endgültigen Layer ersetzt", layer_id);

                if descriptor.label.as_deref() != Some(resource.label.as_str()) {
                    report.commands.push(StoreCommand::UpdateLayerLabel {
                        id: layer_id.to_string(),
                        label: resource.label.clone(),
                    });
                }
                Some(SettleOutcome::Resolved)
            }
            Err(reason) => {
                ctx.surface.remove_layer(layer_id);
                report.removed.push(layer_id.to_string());
                report.fail(LayerError::Rejected {
                    layer_id: layer_id.to_string(),
                    geo_resource_id: pending.geo_resource_id.clone(),
                    reason,
                });
                Some(SettleOutcome::Rejected)
            }
        }
    }

    /// Ziel-Position eines Layers gemessen an den aktuell vorhandenen Layern.
    fn current_rank(&self, layer_id: &str, surface: &dyn RenderSurface) -> usize {
        let present = surface.layer_ids();
        crate::core::sorted_by_z_index(&self.desired)
            .into_iter()
            .take_while(|d| d.id != layer_id)
            .filter(|d| present.contains(&d.id))
            .count()
    }

    fn remove(&mut self, id: &str, ctx: &mut ReconcileContext) {
        ctx.handlers.deactivate(id, ctx.surface);
        if self.pending.shift_remove(id).is_some() {
            log::debug!("Offene Auflösung für '{}' verworfen", id);
        }
        if let Some(layer) = ctx.surface.remove_layer(id) {
            for leaf in layer.leaves() {
                if !leaf.is_placeholder() {
                    ctx.surface.clear_source(leaf);
                }
            }
        }
    }

    fn add(
        &mut self,
        id: &str,
        target_order: &[String],
        ctx: &mut ReconcileContext,
        report: &mut ReconcileReport,
    ) {
        let Some(descriptor) = self.descriptor(id).cloned() else {
            return;
        };
        let index = target_order.iter().position(|t| t == id).unwrap_or(0);
        let properties = properties_of(&descriptor);

        let Some(geo_resource_id) = descriptor.geo_resource_id.clone() else {
            match ctx.handlers.activate(id, ctx.surface) {
                Some(layer) => insert_with_properties(layer, properties, index, ctx.surface),
                None => report.fail(LayerError::UnknownLayerKind {
                    layer_id: id.to_string(),
                }),
            }
            return;
        };

        match ctx.resolver.by_id(&geo_resource_id) {
            Resolution::Resolved(resource) => {
                let layer = RenderLayer::from_geo_resource(id, &resource, properties);
                ctx.surface.insert_layer_at(layer, index);
            }
            Resolution::Pending(future) => {
                ctx.surface
                    .insert_layer_at(RenderLayer::placeholder(id, properties), index);
                self.pending.insert(
                    id.to_string(),
                    PendingLayer {
                        geo_resource_id,
                        future,
                    },
                );
            }
            Resolution::Missing => match ctx.handlers.activate(id, ctx.surface) {
                Some(layer) => insert_with_properties(layer, properties, index, ctx.surface),
                None => report.fail(LayerError::ResolutionFailure {
                    layer_id: id.to_string(),
                    geo_resource_id,
                }),
            },
        }
    }

    fn update_properties(&self, id: &str, ctx: &mut ReconcileContext) {
        let Some(descriptor) = self.descriptor(id) else {
            return;
        };
        let wanted = properties_of(descriptor);
        let current = ctx.surface.layer(id).map(|l| l.properties);
        if current != Some(wanted) {
            ctx.surface.set_layer_properties(id, wanted);
        }
    }
}

fn properties_of(descriptor: &LayerDescriptor) -> LayerProperties {
    LayerProperties {
        visible: descriptor.visible,
        opacity: descriptor.opacity,
    }
}

fn insert_with_properties(
    mut layer: RenderLayer,
    properties: LayerProperties,
    index: usize,
    surface: &mut dyn RenderSurface,
) {
    layer.properties = properties;
    surface.insert_layer_at(layer, index);
}

/// Verschiebt (entfernen + einfügen) nur Layer, deren Position nicht stimmt.
///
/// Nach Bearbeitung von Rang `i` stehen die Positionen `0..=i` korrekt.
fn enforce_order(target_order: &[String], surface: &mut dyn RenderSurface) {
    let present = surface.layer_ids();
    let expected: Vec<&String> = target_order
        .iter()
        .filter(|id| present.contains(*id))
        .collect();

    for (index, id) in expected.into_iter().enumerate() {
        if surface.index_of(id) == Some(index) {
            continue;
        }
        if let Some(layer) = surface.remove_layer(id) {
            surface.insert_layer_at(layer, index);
        }
    }
}
