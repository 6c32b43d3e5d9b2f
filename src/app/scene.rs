//! Szenen-Dateien (JSON) für die Demo-Binary und Integrationstests.
//!
//! Eine Szene beschreibt Deskriptoren, sofort verfügbare Ressourcen und
//! Ressourcen, die erst im nächsten Durchlauf aufgelöst (oder abgelehnt) werden.

use super::fit::FitRequest;
use super::StoreCommand;
use crate::core::{GeoResource, GeoResourceFuture, LayerDescriptor, StaticResolver, ViewState};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Verzögert verfügbare Ressource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredResource {
    pub resource: GeoResource,
    /// Ablehnungsgrund; gesetzt = Laden schlägt fehl
    #[serde(default)]
    pub reject: Option<String>,
}

/// Inhalt einer Szenen-Datei.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub view: Option<ViewState>,
    #[serde(default)]
    pub layers: Vec<LayerDescriptor>,
    #[serde(default)]
    pub resources: Vec<GeoResource>,
    #[serde(default)]
    pub deferred: Vec<DeferredResource>,
    /// Layer-ID, auf die nach dem Laden eingepasst wird
    #[serde(default)]
    pub fit: Option<String>,
}

/// Offene Auflösung einer verzögerten Ressource.
#[derive(Debug, Clone)]
pub struct PendingSettlement {
    future: GeoResourceFuture,
    resource: DeferredResource,
}

impl PendingSettlement {
    /// Löst das Future auf bzw. lehnt es ab.
    pub fn settle(self) {
        match self.resource.reject {
            Some(reason) => {
                self.future.reject(reason);
            }
            None => {
                self.future.resolve(self.resource.resource);
            }
        }
    }
}

impl Scene {
    /// Parst eine Szene aus JSON.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Szene ist kein gültiges JSON")
    }

    /// Lädt eine Szene aus einer Datei.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Szene nicht lesbar: {}", path.display()))?;
        let scene = Self::from_json(&content)?;
        log::info!(
            "Szene geladen: {} Layer, {} Ressourcen, {} verzögert",
            scene.layers.len(),
            scene.resources.len(),
            scene.deferred.len()
        );
        Ok(scene)
    }

    /// Baut den Resolver und die noch offenen Auflösungen.
    pub fn resolver(&self) -> (StaticResolver, Vec<PendingSettlement>) {
        let mut resolver = StaticResolver::new();
        for resource in &self.resources {
            resolver.insert(resource.clone());
        }
        let pending = self
            .deferred
            .iter()
            .map(|deferred| PendingSettlement {
                future: resolver.insert_pending(deferred.resource.id.clone()),
                resource: deferred.clone(),
            })
            .collect();
        (resolver, pending)
    }

    /// Store-Commands, die die Szene in einen leeren Store übertragen.
    pub fn commands(&self) -> Vec<StoreCommand> {
        let mut commands: Vec<StoreCommand> = self
            .layers
            .iter()
            .map(|descriptor| StoreCommand::AddLayer {
                descriptor: descriptor.clone(),
            })
            .collect();
        if let Some(view) = self.view {
            commands.push(StoreCommand::SetView { view });
        }
        if let Some(target) = &self.fit {
            commands.push(StoreCommand::RequestFit {
                request: FitRequest::layer(target.clone()),
            });
        }
        commands
    }
}
