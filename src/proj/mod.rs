//! Projection math: the raw conic conformal transform, spherical rotation,
//! and the configurable projector each composite half owns.

pub mod clip_rect;
pub mod conic_conformal;
pub mod extent;
pub mod projector;
pub mod rotation;

pub use extent::Extent;
pub use projector::{ProjectionStream, Projector};
