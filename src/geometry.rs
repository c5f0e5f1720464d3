//! Geometry objects and their dispatch into the stream vocabulary.

use crate::stream::Stream;

/// Vector geometry in (longitude, latitude) degrees.
///
/// Polygon rings follow the GeoJSON convention: the first and last coordinate
/// of a ring are equal, and the closing coordinate is elided when streaming.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point((f64, f64)),
    MultiPoint(Vec<(f64, f64)>),
    LineString(Vec<(f64, f64)>),
    MultiLineString(Vec<Vec<(f64, f64)>>),
    Polygon(Vec<Vec<(f64, f64)>>),
    MultiPolygon(Vec<Vec<Vec<(f64, f64)>>>),
    GeometryCollection(Vec<Geometry>),
    /// The full globe outline.
    Sphere,
}

impl Geometry {
    /// Replay this object as a sequence of stream events.
    pub fn stream_to(&self, stream: &mut dyn Stream) {
        match self {
            Geometry::Point((x, y)) => stream.point(*x, *y),
            Geometry::MultiPoint(points) => {
                for &(x, y) in points {
                    stream.point(x, y);
                }
            }
            Geometry::LineString(line) => stream_line(line, stream, false),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    stream_line(line, stream, false);
                }
            }
            Geometry::Polygon(rings) => stream_polygon(rings, stream),
            Geometry::MultiPolygon(polygons) => {
                for rings in polygons {
                    stream_polygon(rings, stream);
                }
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.stream_to(stream);
                }
            }
            Geometry::Sphere => stream.sphere(),
        }
    }
}

fn stream_line(points: &[(f64, f64)], stream: &mut dyn Stream, closed: bool) {
    let n = if closed {
        points.len().saturating_sub(1)
    } else {
        points.len()
    };
    stream.line_start();
    for &(x, y) in &points[..n] {
        stream.point(x, y);
    }
    stream.line_end();
}

fn stream_polygon(rings: &[Vec<(f64, f64)>], stream: &mut dyn Stream) {
    stream.polygon_start();
    for ring in rings {
        stream_line(ring, stream, true);
    }
    stream.polygon_end();
}
