//! Configurable projector: rotation, conic conformal raw transform, planar
//! scale/translate, clip extent, and tessellation precision.
//!
//! The streaming pipeline runs rotation, then projection to planar canvas
//! coordinates with adaptive midpoint resampling, then the rectangle clip.
//! There is no great-circle pre-clip: the supported clip windows sit well
//! inside the projected image of the sphere, so the planar clip alone
//! decides visibility.

use crate::math::EPSILON;
use crate::proj::clip_rect::ClipRect;
use crate::proj::conic_conformal::ConicConformal;
use crate::proj::extent::Extent;
use crate::proj::rotation::Rotation;
use crate::stream::{SharedStream, Stream};

const MAX_RESAMPLE_DEPTH: u8 = 16;
const COS_MIN_DISTANCE: f64 = 0.866_025_403_784_438_6; // cos(30°)
const DEFAULT_PRECISION_SQ: f64 = 0.5;

pub struct Projector {
    rotation: Rotation,
    raw: ConicConformal,
    k: f64,
    tx: f64,
    ty: f64,
    clip_extent: Option<Extent>,
    delta2: f64,
}

impl Projector {
    /// Conic conformal projector with the given rotation and standard
    /// parallels, both in degrees.
    pub fn new(rotate: [f64; 2], parallels: [f64; 2]) -> Self {
        Self {
            rotation: Rotation::new(rotate[0], rotate[1], 0.0),
            raw: ConicConformal::new(parallels[0].to_radians(), parallels[1].to_radians()),
            k: 150.0,
            tx: 480.0,
            ty: 250.0,
            clip_extent: None,
            delta2: DEFAULT_PRECISION_SQ,
        }
    }

    fn transform(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (x, y) = self.raw.forward(lambda, phi);
        (self.tx + self.k * x, self.ty - self.k * y)
    }

    /// Forward projection, degrees in, canvas coordinates out.
    ///
    /// `None` when a clip extent is set and the planar result falls outside
    /// it; this is the membership predicate the composite routes on.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let (lambda, phi) = self.rotation.forward(lon.to_radians(), lat.to_radians());
        let (x, y) = self.transform(lambda, phi);
        match self.clip_extent {
            Some(extent) if !extent.contains(x, y) => None,
            _ => Some((x, y)),
        }
    }

    /// Inverse projection, canvas coordinates in, degrees out.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lambda, phi) = self
            .raw
            .invert((x - self.tx) / self.k, (self.ty - y) / self.k);
        let (lambda, phi) = self.rotation.invert(lambda, phi);
        let (lon, lat) = (lambda.to_degrees(), phi.to_degrees());
        (lon.is_finite() && lat.is_finite()).then_some((lon, lat))
    }

    pub fn scale(&self) -> f64 {
        self.k
    }

    pub fn set_scale(&mut self, k: f64) -> &mut Self {
        self.k = k;
        self
    }

    pub fn translate(&self) -> (f64, f64) {
        (self.tx, self.ty)
    }

    pub fn set_translate(&mut self, translate: (f64, f64)) -> &mut Self {
        self.tx = translate.0;
        self.ty = translate.1;
        self
    }

    pub fn clip_extent(&self) -> Option<Extent> {
        self.clip_extent
    }

    pub fn set_clip_extent(&mut self, extent: Option<Extent>) -> &mut Self {
        self.clip_extent = extent;
        self
    }

    /// Tessellation precision in canvas units.
    pub fn precision(&self) -> f64 {
        self.delta2.sqrt()
    }

    pub fn set_precision(&mut self, precision: f64) -> &mut Self {
        self.delta2 = precision * precision;
        self
    }

    /// Build the streaming pipeline ending in `sink`.
    ///
    /// The pipeline snapshots the current configuration; mutating the
    /// projector afterwards does not reconfigure streams already handed out.
    pub fn stream(&self, sink: SharedStream) -> ProjectionStream {
        ProjectionStream {
            rotation: self.rotation,
            raw: self.raw,
            k: self.k,
            tx: self.tx,
            ty: self.ty,
            delta2: self.delta2,
            clip: ClipRect::new(self.clip_extent, sink),
            mode: LineMode::None,
            in_polygon: false,
            x0: f64::NAN,
            y0: f64::NAN,
            lambda0: f64::NAN,
            a0: f64::NAN,
            b0: f64::NAN,
            c0: f64::NAN,
            x00: f64::NAN,
            y00: f64::NAN,
            lambda00: f64::NAN,
            a00: f64::NAN,
            b00: f64::NAN,
            c00: f64::NAN,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LineMode {
    None,
    Line,
    RingFirst,
    Ring,
}

/// One projector's streaming pipeline: rotation, projection with adaptive
/// midpoint resampling, rectangle clip, terminal sink.
pub struct ProjectionStream {
    rotation: Rotation,
    raw: ConicConformal,
    k: f64,
    tx: f64,
    ty: f64,
    delta2: f64,
    clip: ClipRect,
    mode: LineMode,
    in_polygon: bool,
    // Previous resample vertex: planar position, rotated longitude, and unit
    // cartesian coordinates.
    x0: f64,
    y0: f64,
    lambda0: f64,
    a0: f64,
    b0: f64,
    c0: f64,
    // First ring vertex, for the closing segment.
    x00: f64,
    y00: f64,
    lambda00: f64,
    a00: f64,
    b00: f64,
    c00: f64,
}

impl ProjectionStream {
    fn transform(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (x, y) = self.raw.forward(lambda, phi);
        (self.tx + self.k * x, self.ty - self.k * y)
    }

    fn line_point(&mut self, lambda: f64, phi: f64) {
        let (a, b, c) = cartesian(lambda, phi);
        let (x, y) = self.transform(lambda, phi);
        self.resample_line_to(
            self.x0,
            self.y0,
            self.lambda0,
            self.a0,
            self.b0,
            self.c0,
            x,
            y,
            lambda,
            a,
            b,
            c,
            MAX_RESAMPLE_DEPTH,
        );
        self.x0 = x;
        self.y0 = y;
        self.lambda0 = lambda;
        self.a0 = a;
        self.b0 = b;
        self.c0 = c;
        self.clip.point(x, y);
    }

    /// Recursive midpoint subdivision: emit intermediate points between the
    /// previous vertex and (x1, y1) while the planar chord deviates from the
    /// projected arc by more than the precision threshold.
    #[allow(clippy::too_many_arguments)]
    fn resample_line_to(
        &mut self,
        x0: f64,
        y0: f64,
        lambda0: f64,
        a0: f64,
        b0: f64,
        c0: f64,
        x1: f64,
        y1: f64,
        lambda1: f64,
        a1: f64,
        b1: f64,
        c1: f64,
        depth: u8,
    ) {
        if self.delta2 <= 0.0 {
            return;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let d2 = dx * dx + dy * dy;
        if d2 > 4.0 * self.delta2 && depth > 0 {
            let mut a = a0 + a1;
            let mut b = b0 + b1;
            let mut c = c0 + c1;
            let m = (a * a + b * b + c * c).sqrt();
            c /= m;
            let phi2 = c.asin();
            let lambda2 = if (c.abs() - 1.0).abs() < EPSILON || (lambda0 - lambda1).abs() < EPSILON
            {
                (lambda0 + lambda1) / 2.0
            } else {
                b.atan2(a)
            };
            let (x2, y2) = self.transform(lambda2, phi2);
            let dx2 = x2 - x0;
            let dy2 = y2 - y0;
            let dz = dy * dx2 - dx * dy2;
            if dz * dz / d2 > self.delta2
                || ((dx * dx2 + dy * dy2) / d2 - 0.5).abs() > 0.3
                || a0 * a1 + b0 * b1 + c0 * c1 < COS_MIN_DISTANCE
            {
                a /= m;
                b /= m;
                self.resample_line_to(x0, y0, lambda0, a0, b0, c0, x2, y2, lambda2, a, b, c, depth - 1);
                self.clip.point(x2, y2);
                self.resample_line_to(x2, y2, lambda2, a, b, c, x1, y1, lambda1, a1, b1, c1, depth - 1);
            }
        }
    }
}

impl Stream for ProjectionStream {
    fn point(&mut self, x: f64, y: f64) {
        let (lambda, phi) = self.rotation.forward(x.to_radians(), y.to_radians());
        match self.mode {
            LineMode::None => {
                let (px, py) = self.transform(lambda, phi);
                self.clip.point(px, py);
            }
            LineMode::Line | LineMode::Ring => self.line_point(lambda, phi),
            LineMode::RingFirst => {
                self.line_point(lambda, phi);
                self.x00 = self.x0;
                self.y00 = self.y0;
                self.lambda00 = self.lambda0;
                self.a00 = self.a0;
                self.b00 = self.b0;
                self.c00 = self.c0;
                self.mode = LineMode::Ring;
            }
        }
    }

    fn sphere(&mut self) {
        self.clip.sphere();
    }

    fn line_start(&mut self) {
        self.x0 = f64::NAN;
        self.mode = if self.in_polygon {
            LineMode::RingFirst
        } else {
            LineMode::Line
        };
        self.clip.line_start();
    }

    fn line_end(&mut self) {
        if self.mode == LineMode::Ring {
            // Close the ring through the resampler; the closing vertex itself
            // was already emitted as the ring's first point.
            let (x00, y00, lambda00) = (self.x00, self.y00, self.lambda00);
            let (a00, b00, c00) = (self.a00, self.b00, self.c00);
            self.resample_line_to(
                self.x0,
                self.y0,
                self.lambda0,
                self.a0,
                self.b0,
                self.c0,
                x00,
                y00,
                lambda00,
                a00,
                b00,
                c00,
                MAX_RESAMPLE_DEPTH,
            );
        }
        self.mode = LineMode::None;
        self.clip.line_end();
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
        self.clip.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
        self.clip.polygon_end();
    }
}

fn cartesian(lambda: f64, phi: f64) -> (f64, f64, f64) {
    let cos_phi = phi.cos();
    (lambda.cos() * cos_phi, lambda.sin() * cos_phi, phi.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::testing::{Event, Recorder};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn spain_mainland() -> Projector {
        Projector::new([5.0, -38.6], [0.0, 60.0])
    }

    #[test]
    fn test_defaults() {
        let projector = spain_mainland();
        assert_relative_eq!(projector.scale(), 150.0);
        assert_eq!(projector.translate(), (480.0, 250.0));
        assert_relative_eq!(projector.precision(), 0.5_f64.sqrt());
        assert!(projector.clip_extent().is_none());
    }

    #[test]
    fn test_projection_center_maps_to_translate() {
        let projector = spain_mainland();
        let (x, y) = projector.project(-5.0, 38.6).unwrap();
        assert_relative_eq!(x, 480.0, epsilon = 1e-9);
        assert_relative_eq!(y, 250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        let mut projector = spain_mainland();
        projector.set_scale(2700.0).set_translate((480.0, 250.0));
        let cases: &[(f64, f64)] = &[
            (-3.70, 40.42),  // Madrid
            (2.17, 41.38),   // Barcelona
            (-8.55, 42.88),  // Santiago de Compostela
            (-16.25, 28.47), // Santa Cruz de Tenerife
        ];
        for &(lon, lat) in cases {
            let (x, y) = projector.project(lon, lat).unwrap();
            let (lon2, lat2) = projector.invert(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_clip_extent_gates_forward_output() {
        let mut projector = spain_mainland();
        projector.set_scale(2700.0).set_translate((480.0, 250.0));
        let madrid = projector.project(-3.70, 40.42).unwrap();

        projector.set_clip_extent(Some(Extent::new(
            madrid.0 - 10.0,
            madrid.1 - 10.0,
            madrid.0 + 10.0,
            madrid.1 + 10.0,
        )));
        assert!(projector.project(-3.70, 40.42).is_some());
        // Tenerife lands far outside the tiny window around Madrid.
        assert!(projector.project(-16.25, 28.47).is_none());

        projector.set_clip_extent(None);
        assert!(projector.project(-16.25, 28.47).is_some());
    }

    #[test]
    fn test_stream_points_match_direct_projection() {
        let projector = spain_mainland();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut stream = projector.stream(recorder.clone());
        stream.point(-3.70, 40.42);
        stream.point(2.17, 41.38);

        let expected: Vec<(f64, f64)> = [(-3.70, 40.42), (2.17, 41.38)]
            .iter()
            .map(|&(lon, lat)| projector.project(lon, lat).unwrap())
            .collect();
        assert_eq!(recorder.borrow().points(), expected);
    }

    #[test]
    fn test_stream_resamples_long_lines() {
        let mut projector = spain_mainland();
        projector.set_scale(2700.0);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut stream = projector.stream(recorder.clone());
        stream.line_start();
        stream.point(-8.0, 43.0);
        stream.point(2.0, 39.0);
        stream.line_end();

        let points = recorder.borrow().points();
        assert!(points.len() > 2, "expected intermediate samples");
        // Endpoints are exact.
        let first = projector.project(-8.0, 43.0).unwrap();
        let last = projector.project(2.0, 39.0).unwrap();
        assert_relative_eq!(points.first().unwrap().0, first.0, epsilon = 1e-9);
        assert_relative_eq!(points.last().unwrap().1, last.1, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_precision_disables_resampling() {
        let mut projector = spain_mainland();
        projector.set_scale(2700.0).set_precision(0.0);
        assert_relative_eq!(projector.precision(), 0.0);

        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut stream = projector.stream(recorder.clone());
        stream.line_start();
        stream.point(-8.0, 43.0);
        stream.point(2.0, 39.0);
        stream.line_end();
        assert_eq!(recorder.borrow().points().len(), 2);
    }

    #[test]
    fn test_ring_closure_is_resampled() {
        let mut projector = spain_mainland();
        projector.set_scale(2700.0);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut stream = projector.stream(recorder.clone());
        stream.polygon_start();
        stream.line_start();
        stream.point(-8.0, 43.0);
        stream.point(2.0, 43.0);
        stream.point(2.0, 39.0);
        stream.line_end();
        stream.polygon_end();

        let events = recorder.borrow().events.clone();
        assert_eq!(events.first(), Some(&Event::PolygonStart));
        assert_eq!(events.last(), Some(&Event::PolygonEnd));
        // Three vertices plus resampled points along each edge and the
        // closing segment back to the first vertex.
        let points = recorder.borrow().points();
        assert!(points.len() > 3, "points = {}", points.len());
    }
}
