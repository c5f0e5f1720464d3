//! Lock-step fan-out of geometry-stream events.

use crate::stream::Stream;

/// Broadcasts every event to an ordered list of downstream consumers.
///
/// Forwarding is synchronous and in consumer order 0..n; there is no
/// buffering, reordering, or error suppression. Correct composite rendering
/// additionally requires the consumers' clip regions on the sphere to be
/// mutually exclusive, so the same feature is never emitted twice — that is
/// guaranteed by the composite's layout, never by this adapter.
pub struct Multiplex {
    streams: Vec<Box<dyn Stream>>,
}

impl Multiplex {
    pub fn new(streams: Vec<Box<dyn Stream>>) -> Self {
        Self { streams }
    }
}

impl Stream for Multiplex {
    fn point(&mut self, x: f64, y: f64) {
        for stream in &mut self.streams {
            stream.point(x, y);
        }
    }

    fn sphere(&mut self) {
        for stream in &mut self.streams {
            stream.sphere();
        }
    }

    fn line_start(&mut self) {
        for stream in &mut self.streams {
            stream.line_start();
        }
    }

    fn line_end(&mut self) {
        for stream in &mut self.streams {
            stream.line_end();
        }
    }

    fn polygon_start(&mut self) {
        for stream in &mut self.streams {
            stream.polygon_start();
        }
    }

    fn polygon_end(&mut self) {
        for stream in &mut self.streams {
            stream.polygon_end();
        }
    }
}
