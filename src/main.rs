//! Map-Layer-Engine Demo.
//!
//! Lädt eine Szene, gleicht sie gegen eine Headless-Oberfläche ab, löst
//! verzögerte Ressourcen im nächsten Durchlauf auf und gibt den Layer-Stapel aus.

use anyhow::Context;
use map_layer_engine::app::PendingSettlement;
use map_layer_engine::core::LayerContent;
use map_layer_engine::{
    EngineOptions, HandlerRegistry, InputModel, MapController, MapStore, MemorySurface,
    RenderSurface, Scene,
};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Map-Layer-Engine v{} startet...", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let scene_path = args
        .next()
        .map(PathBuf::from)
        .context("Aufruf: map-layer-engine <scene.json> [options.toml]")?;
    let options = match args.next() {
        Some(path) => EngineOptions::load_from_file(&PathBuf::from(path)),
        None => EngineOptions::load_from_file(&EngineOptions::config_path()),
    };

    let scene = Scene::load(&scene_path)?;
    let (resolver, pending) = scene.resolver();

    let mut store = MapStore::with_log_capacity(options.command_log_capacity);
    let mut surface = MemorySurface::new();
    let mut controller = MapController::new(
        &options,
        HandlerRegistry::new(),
        &mut store,
        InputModel::Pointer,
    );

    for command in scene.commands() {
        store.dispatch(command);
    }
    let rounds = controller.run_until_idle(&mut store, &mut surface, &resolver);
    log::info!("Erster Abgleich nach {} Durchläufen", rounds);

    // Nächster Durchlauf der Event-Loop: verzögerte Ressourcen treffen ein
    pending.into_iter().for_each(PendingSettlement::settle);
    let rounds = controller.run_until_idle(&mut store, &mut surface, &resolver);
    log::info!("Auflösung eingearbeitet nach {} Durchläufen", rounds);

    print_stack(&store, &surface);
    Ok(())
}

fn print_stack(store: &MapStore, surface: &MemorySurface) {
    println!("Layer-Stapel (unten → oben):");
    for (index, layer) in surface.layers().iter().enumerate() {
        let kind = match &layer.content {
            LayerContent::Placeholder => "Platzhalter",
            LayerContent::Vector { .. } => "Vektor",
            LayerContent::Tiles { .. } => "Kacheln",
            LayerContent::Interaction { .. } => "Werkzeug",
            LayerContent::Group(_) => "Gruppe",
        };
        let label = store
            .state()
            .layers
            .iter()
            .find(|d| d.id == layer.id)
            .and_then(|d| d.label.as_deref())
            .unwrap_or("-");
        println!(
            "  {index:>2}  {:<20} {:<12} sichtbar={} deckkraft={:.2} label={}",
            layer.id, kind, layer.properties.visible, layer.properties.opacity, label
        );
    }

    let view = surface.view();
    println!(
        "Ansicht: zoom={:.3} zentrum=({:.5}, {:.5}) rotation={:.5}",
        view.zoom, view.center.x, view.center.y, view.rotation
    );
    for notification in &store.state().notifications {
        println!("{:?}: {}", notification.level, notification.message);
    }
}
