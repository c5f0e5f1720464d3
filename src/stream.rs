//! Geometry-stream event vocabulary.
//!
//! Vector geometry is described incrementally: `line_start`/`line_end`
//! bracket runs of `point` calls, `polygon_start`/`polygon_end` bracket
//! rings, and `sphere` marks the full globe outline. Producers emit events
//! in document order; consumers react to the subset they care about.

use std::cell::RefCell;
use std::rc::Rc;

/// Consumer of incremental vector-geometry events.
///
/// All handlers default to no-ops so degenerate consumers (bounds recorders,
/// test taps) implement only the events they observe.
pub trait Stream {
    fn point(&mut self, _x: f64, _y: f64) {}
    fn sphere(&mut self) {}
    fn line_start(&mut self) {}
    fn line_end(&mut self) {}
    fn polygon_start(&mut self) {}
    fn polygon_end(&mut self) {}
}

/// Shared handle to a stream consumer.
///
/// The composite broadcasts one event sequence into two projection pipelines
/// that terminate in the same caller-supplied consumer, so the terminal
/// consumer is reference-counted. Single-threaded; re-entrant mutation of the
/// owning projection from inside a stream callback is not supported.
pub type SharedStream = Rc<RefCell<dyn Stream>>;

/// Records the planar bounding box of every point event it sees.
#[derive(Debug, Clone)]
pub struct BoundsStream {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Default for BoundsStream {
    fn default() -> Self {
        Self {
            x0: f64::INFINITY,
            y0: f64::INFINITY,
            x1: f64::NEG_INFINITY,
            y1: f64::NEG_INFINITY,
        }
    }
}

impl BoundsStream {
    /// Accumulated bounds as (min corner, max corner), or `None` if no point
    /// was recorded.
    pub fn result(&self) -> Option<((f64, f64), (f64, f64))> {
        if self.x1 < self.x0 {
            None
        } else {
            Some(((self.x0, self.y0), (self.x1, self.y1)))
        }
    }
}

impl Stream for BoundsStream {
    fn point(&mut self, x: f64, y: f64) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds_is_none() {
        let bounds = BoundsStream::default();
        assert!(bounds.result().is_none());
    }

    #[test]
    fn test_bounds_accumulate_min_max() {
        let mut bounds = BoundsStream::default();
        bounds.point(3.0, -2.0);
        bounds.point(-1.0, 5.0);
        bounds.point(2.0, 2.0);
        let ((x0, y0), (x1, y1)) = bounds.result().unwrap();
        assert_eq!((x0, y0), (-1.0, -2.0));
        assert_eq!((x1, y1), (3.0, 5.0));
    }
}
