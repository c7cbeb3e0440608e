//! Rendering helpers
//!
//! CPU tessellation only: turns the simulation's drawable shape descriptors
//! into vertex lists. Uploading and drawing belongs to the host application.

pub mod shapes;
pub mod vertex;

pub use vertex::Vertex;
