//! Planar rectangle clipping stage.
//!
//! Post-projection clip against a projector's clip extent. Isolated points
//! are kept or dropped by containment; lines are buffered per run and clipped
//! segment-wise; polygon rings are buffered per ring and clipped with a
//! Sutherland–Hodgman pass against the four window edges. A ring enclosing
//! the whole window degenerates to the window boundary, which keeps fills
//! correct when oversized geometry is broadcast to a small clip window.
//! Rings that cross several corners can pick up zero-area edge slivers; they
//! do not affect fills.

use crate::proj::extent::Extent;
use crate::stream::{SharedStream, Stream};

pub(crate) struct ClipRect {
    extent: Option<Extent>,
    sink: SharedStream,
    buffer: Vec<(f64, f64)>,
    buffering: bool,
    in_polygon: bool,
}

impl ClipRect {
    pub(crate) fn new(extent: Option<Extent>, sink: SharedStream) -> Self {
        Self {
            extent,
            sink,
            buffer: Vec::new(),
            buffering: false,
            in_polygon: false,
        }
    }

    pub(crate) fn point(&mut self, x: f64, y: f64) {
        if self.buffering {
            self.buffer.push((x, y));
            return;
        }
        match self.extent {
            Some(extent) if !extent.contains(x, y) => {}
            _ => self.sink.borrow_mut().point(x, y),
        }
    }

    pub(crate) fn line_start(&mut self) {
        if self.extent.is_some() {
            self.buffering = true;
            self.buffer.clear();
        } else {
            self.sink.borrow_mut().line_start();
        }
    }

    pub(crate) fn line_end(&mut self) {
        let Some(extent) = self.extent else {
            self.sink.borrow_mut().line_end();
            return;
        };
        self.buffering = false;
        let points = std::mem::take(&mut self.buffer);
        let mut sink = self.sink.borrow_mut();
        if self.in_polygon {
            emit_clipped_ring(&extent, &points, &mut *sink);
        } else {
            emit_clipped_line(&extent, &points, &mut *sink);
        }
    }

    pub(crate) fn polygon_start(&mut self) {
        self.in_polygon = true;
        self.sink.borrow_mut().polygon_start();
    }

    pub(crate) fn polygon_end(&mut self) {
        self.in_polygon = false;
        self.sink.borrow_mut().polygon_end();
    }

    pub(crate) fn sphere(&mut self) {
        let mut sink = self.sink.borrow_mut();
        match self.extent {
            // The projected sphere covers any supported clip window, so the
            // sphere outline reduces to the window boundary.
            Some(extent) => {
                sink.polygon_start();
                sink.line_start();
                sink.point(extent.x0, extent.y0);
                sink.point(extent.x1, extent.y0);
                sink.point(extent.x1, extent.y1);
                sink.point(extent.x0, extent.y1);
                sink.line_end();
                sink.polygon_end();
            }
            None => sink.sphere(),
        }
    }
}

/// Liang–Barsky single-segment clip. Returns the clipped endpoints plus
/// whether each original endpoint was cut away.
fn clip_segment(
    extent: &Extent,
    a: (f64, f64),
    b: (f64, f64),
) -> Option<((f64, f64), (f64, f64), bool, bool)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let checks = [
        (-dx, a.0 - extent.x0),
        (dx, extent.x1 - a.0),
        (-dy, a.1 - extent.y0),
        (dy, extent.y1 - a.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
        t0 > 0.0,
        t1 < 1.0,
    ))
}

fn emit_clipped_line(extent: &Extent, points: &[(f64, f64)], sink: &mut dyn Stream) {
    let mut active = false;
    for pair in points.windows(2) {
        match clip_segment(extent, pair[0], pair[1]) {
            None => {
                if active {
                    sink.line_end();
                    active = false;
                }
            }
            Some((p, q, entered, _)) => {
                if !active {
                    sink.line_start();
                    sink.point(p.0, p.1);
                    active = true;
                } else if entered {
                    // Left the window and came back: break the run.
                    sink.line_end();
                    sink.line_start();
                    sink.point(p.0, p.1);
                }
                sink.point(q.0, q.1);
            }
        }
    }
    if active {
        sink.line_end();
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

fn inside(extent: &Extent, edge: Edge, p: (f64, f64)) -> bool {
    match edge {
        Edge::Left => p.0 >= extent.x0,
        Edge::Right => p.0 <= extent.x1,
        Edge::Top => p.1 >= extent.y0,
        Edge::Bottom => p.1 <= extent.y1,
    }
}

fn intersect(extent: &Extent, edge: Edge, a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    match edge {
        Edge::Left => {
            let t = (extent.x0 - a.0) / (b.0 - a.0);
            (extent.x0, a.1 + t * (b.1 - a.1))
        }
        Edge::Right => {
            let t = (extent.x1 - a.0) / (b.0 - a.0);
            (extent.x1, a.1 + t * (b.1 - a.1))
        }
        Edge::Top => {
            let t = (extent.y0 - a.1) / (b.1 - a.1);
            (a.0 + t * (b.0 - a.0), extent.y0)
        }
        Edge::Bottom => {
            let t = (extent.y1 - a.1) / (b.1 - a.1);
            (a.0 + t * (b.0 - a.0), extent.y1)
        }
    }
}

fn clip_ring(extent: &Extent, ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut output = ring.to_vec();
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        for &current in &input {
            let current_inside = inside(extent, edge, current);
            if current_inside {
                if !inside(extent, edge, prev) {
                    output.push(intersect(extent, edge, prev, current));
                }
                output.push(current);
            } else if inside(extent, edge, prev) {
                output.push(intersect(extent, edge, prev, current));
            }
            prev = current;
        }
    }
    output
}

fn emit_clipped_ring(extent: &Extent, ring: &[(f64, f64)], sink: &mut dyn Stream) {
    let clipped = clip_ring(extent, ring);
    if clipped.len() < 3 {
        return;
    }
    sink.line_start();
    for &(x, y) in &clipped {
        sink.point(x, y);
    }
    sink.line_end();
}
