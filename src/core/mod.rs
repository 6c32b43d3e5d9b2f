//! Core-Domänentypen: Deskriptoren, GeoResources, Ansicht und Render-Oberfläche.

pub mod descriptor;
pub mod error;
pub mod geo_resource;
pub mod geometry;
pub mod surface;
pub mod view;

pub use descriptor::{clamp_opacity, sorted_by_z_index, LayerConstraints, LayerDescriptor};
pub use error::LayerError;
pub use geo_resource::{
    FutureState, GeoResource, GeoResourceFuture, GeoResourceKind, GeoResourceResolver,
    Resolution, StaticResolver,
};
pub use geometry::{Extent, Insets};
pub use surface::{
    FitParams, LayerContent, LayerProperties, RenderLayer, RenderSurface, ViewAnimation,
};
pub use view::ViewState;
