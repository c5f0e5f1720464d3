//! Composite conic conformal projection for Spain.
//!
//! Two conic conformal projectors share one canvas: the Iberian Peninsula
//! (with the Balearic Islands) and the Canary Islands, the latter translated
//! next to the peninsula the way Spanish atlases print it. Geometry streams
//! are broadcast to both halves; their mutually exclusive clip windows decide
//! which half renders each feature. The default configuration targets a
//! 960×500 canvas at scale 2700.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::BezPath;

use crate::error::ProjError;
use crate::fit;
use crate::geometry::Geometry;
use crate::math::EPSILON;
use crate::multiplex::Multiplex;
use crate::path::PathSink;
use crate::proj::{Extent, Projector};
use crate::stream::SharedStream;

const ROTATE: [f64; 2] = [5.0, -38.6];
const PARALLELS: [f64; 2] = [0.0, 60.0];

/// Peninsula clip window as fractions of scale, relative to the origin.
const MAINLAND_CLIP: [(f64, f64); 2] = [(-0.06857, -0.1288), (0.13249, 0.1)];
/// Canary translation offset as fractions of scale.
const CANARIES_OFFSET: (f64, f64) = (0.178, -0.085);
/// Canary clip window as fractions of scale, before the epsilon inset.
const CANARIES_CLIP: [(f64, f64); 2] = [(-0.053, 0.062), (0.044, 0.1)];

pub struct ConicConformalSpain {
    mainland: Projector,
    canaries: Projector,
    /// Canary clip window normalized by the mainland's scale and translation;
    /// inverse queries landing inside it route to the Canary projector.
    routing_frame: Extent,
    /// Single-slot stream memo: (sink identity, built multiplex).
    cache: Option<(SharedStream, SharedStream)>,
}

impl ConicConformalSpain {
    pub fn new() -> Self {
        let mut projection = Self {
            mainland: Projector::new(ROTATE, PARALLELS),
            canaries: Projector::new(ROTATE, PARALLELS),
            routing_frame: Extent::new(0.0, 0.0, 0.0, 0.0),
            cache: None,
        };
        projection.set_scale(2700.0);
        projection
    }

    /// Forward-project a (longitude, latitude) pair in degrees.
    ///
    /// The mainland is consulted first, then the Canaries; `None` when the
    /// point lies in neither clip region.
    pub fn project(&self, coordinates: (f64, f64)) -> Option<(f64, f64)> {
        let (lon, lat) = coordinates;
        self.mainland
            .project(lon, lat)
            .or_else(|| self.canaries.project(lon, lat))
    }

    /// Invert a canvas point back to (longitude, latitude) degrees.
    ///
    /// The query is normalized by the mainland's scale and translation and
    /// tested against the Canary window; everything else falls back to the
    /// mainland inverse, including points that belong to neither region.
    pub fn invert(&self, point: (f64, f64)) -> Option<(f64, f64)> {
        let k = self.mainland.scale();
        let t = self.mainland.translate();
        let x = (point.0 - t.0) / k;
        let y = (point.1 - t.1) / k;
        let frame = self.routing_frame;
        let projector = if x >= frame.x0 && x < frame.x1 && y >= frame.y0 && y < frame.y1 {
            &self.canaries
        } else {
            &self.mainland
        };
        projector.invert(point.0, point.1)
    }

    /// Multiplexing stream: every event is broadcast to both projector
    /// pipelines, which terminate in `sink`.
    ///
    /// The built stream is memoized per sink identity and dropped on any
    /// mutation, so repeated renders into the same consumer reuse one
    /// pipeline.
    pub fn stream(&mut self, sink: &SharedStream) -> SharedStream {
        if let Some((cached_sink, cached)) = &self.cache {
            if Rc::ptr_eq(cached_sink, sink) {
                return Rc::clone(cached);
            }
        }
        let multiplexed: SharedStream = Rc::new(RefCell::new(Multiplex::new(vec![
            Box::new(self.mainland.stream(Rc::clone(sink))),
            Box::new(self.canaries.stream(Rc::clone(sink))),
        ])));
        self.cache = Some((Rc::clone(sink), Rc::clone(&multiplexed)));
        multiplexed
    }

    pub fn scale(&self) -> f64 {
        self.mainland.scale()
    }

    /// Set both halves' scale, then rebuild the layout with the mainland's
    /// current translation — the clip windows are scale-proportional.
    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.mainland.set_scale(scale);
        self.canaries.set_scale(scale);
        let translate = self.mainland.translate();
        self.set_translate(translate)
    }

    pub fn translate(&self) -> (f64, f64) {
        self.mainland.translate()
    }

    /// Re-derive both halves' translations and clip windows from the
    /// proportional layout, then drop any cached stream.
    pub fn set_translate(&mut self, translate: (f64, f64)) -> &mut Self {
        let k = self.mainland.scale();
        let (x, y) = translate;

        self.mainland
            .set_translate(translate)
            .set_clip_extent(Some(Extent::new(
                x + MAINLAND_CLIP[0].0 * k,
                y + MAINLAND_CLIP[0].1 * k,
                x + MAINLAND_CLIP[1].0 * k,
                y + MAINLAND_CLIP[1].1 * k,
            )));

        let canaries_clip = Extent::new(
            x + CANARIES_CLIP[0].0 * k + EPSILON,
            y + CANARIES_CLIP[0].1 * k + EPSILON,
            x + CANARIES_CLIP[1].0 * k - EPSILON,
            y + CANARIES_CLIP[1].1 * k - EPSILON,
        );
        self.canaries
            .set_translate((x + CANARIES_OFFSET.0 * k, y + CANARIES_OFFSET.1 * k))
            .set_clip_extent(Some(canaries_clip));

        // Inverse-routing thresholds, derived from the freshly assigned
        // window so they track every relayout.
        self.routing_frame = Extent::new(
            (canaries_clip.x0 - x) / k,
            (canaries_clip.y0 - y) / k,
            (canaries_clip.x1 - x) / k,
            (canaries_clip.y1 - y) / k,
        );

        self.reset()
    }

    pub fn precision(&self) -> f64 {
        self.mainland.precision()
    }

    pub fn set_precision(&mut self, precision: f64) -> &mut Self {
        self.mainland.set_precision(precision);
        self.canaries.set_precision(precision);
        self.reset()
    }

    /// Scale and translate so `object` fits the extent rectangle.
    pub fn fit_extent(
        &mut self,
        extent: [(f64, f64); 2],
        object: &Geometry,
    ) -> Result<&mut Self, ProjError> {
        fit::fit_extent(self, extent, object)?;
        Ok(self)
    }

    /// Scale and translate so `object` fits a (width, height) box anchored at
    /// the origin.
    pub fn fit_size(
        &mut self,
        size: (f64, f64),
        object: &Geometry,
    ) -> Result<&mut Self, ProjError> {
        fit::fit_size(self, size, object)?;
        Ok(self)
    }

    pub fn fit_width(&mut self, width: f64, object: &Geometry) -> Result<&mut Self, ProjError> {
        fit::fit_width(self, width, object)?;
        Ok(self)
    }

    pub fn fit_height(&mut self, height: f64, object: &Geometry) -> Result<&mut Self, ProjError> {
        fit::fit_height(self, height, object)?;
        Ok(self)
    }

    /// Draw the three-segment border of the Canary inset window.
    ///
    /// The window lives in the Canary projector's frame, but the border must
    /// line up with mainland-rendered geometry, so each corner is inverted
    /// through the mainland projection and re-projected before drawing:
    /// upper-left, then upper-right, then lower-right.
    pub fn draw_composition_borders<P: PathSink>(&self, path: &mut P) -> Result<(), ProjError> {
        let Some(window) = self.canaries.clip_extent() else {
            return Ok(());
        };
        let corners = [
            (window.x0, window.y0),
            (window.x1, window.y0),
            (window.x1, window.y1),
        ];
        let mut first = true;
        for (cx, cy) in corners {
            let (lon, lat) = self
                .mainland
                .invert(cx, cy)
                .ok_or(ProjError::NoInverse(cx, cy))?;
            let (x, y) = self
                .mainland
                .project(lon, lat)
                .ok_or(ProjError::OutsideClipRegion(lon, lat))?;
            if first {
                path.move_to(x, y);
                first = false;
            } else {
                path.line_to(x, y);
            }
        }
        Ok(())
    }

    /// Composition border serialized as an SVG path string.
    pub fn composition_borders(&self) -> Result<String, ProjError> {
        let mut path = BezPath::new();
        self.draw_composition_borders(&mut path)?;
        Ok(path.to_svg())
    }

    fn reset(&mut self) -> &mut Self {
        self.cache = None;
        self
    }
}

impl Default for ConicConformalSpain {
    fn default() -> Self {
        Self::new()
    }
}
