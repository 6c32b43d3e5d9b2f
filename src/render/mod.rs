//! Headless-Render-Oberfläche für Tests, Benchmarks und die Demo-Binary.

mod memory_surface;

pub use memory_surface::{MemorySurface, SurfaceCall};
