//! Composite conic conformal projection for Spain.
//!
//! Assembles two conic conformal projectors — the Iberian Peninsula and the
//! Canary Islands — into one logical projection on a shared canvas, with the
//! islands inset south of the peninsula. Geometry streams are broadcast to
//! both halves; mutually exclusive clip windows decide which half renders
//! each feature, so nothing is ever drawn twice.
//!
//! ```
//! use composite_proj::ConicConformalSpain;
//!
//! let spain = ConicConformalSpain::new();
//! let madrid = spain.project((-3.70, 40.42)).unwrap();
//! let (lon, lat) = spain.invert(madrid).unwrap();
//! assert!((lon + 3.70).abs() < 1e-6);
//! assert!((lat - 40.42).abs() < 1e-6);
//! ```

pub mod error;
pub mod geometry;
pub mod multiplex;
pub mod path;
pub mod proj;
pub mod spain;
pub mod stream;

mod fit;
mod math;

pub use error::ProjError;
pub use geometry::Geometry;
pub use spain::ConicConformalSpain;
