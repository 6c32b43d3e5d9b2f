//! Map-Layer-Engine Library.
//! Hält eine zustandsbehaftete Render-Oberfläche deckungsgleich mit einer
//! deklarativen Layer-Liste und klassifiziert Pointer-Eingaben.

pub mod app;
pub mod core;
pub mod render;
pub mod shared;
pub mod ui;

pub use app::{
    FitOptions, FitRequest, HandlerRegistry, LayerReconciler, MapController, MapEvent, MapStore,
    Scene, StoreChange, StoreCommand, ViewSynchronizer,
};
pub use core::{
    Extent, GeoResource, GeoResourceFuture, GeoResourceResolver, Insets, LayerDescriptor,
    LayerError, RenderLayer, RenderSurface, Resolution, StaticResolver, ViewState,
};
pub use render::MemorySurface;
pub use shared::EngineOptions;
pub use ui::{InputModel, PointerGestureClassifier, PointerInput};
