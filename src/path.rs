//! Path sink contract for composition-border drawing.

use kurbo::BezPath;

/// Receiver of move/line path commands in canvas coordinates.
pub trait PathSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
}

impl PathSink for BezPath {
    fn move_to(&mut self, x: f64, y: f64) {
        BezPath::move_to(self, (x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        BezPath::line_to(self, (x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bez_path_serializes_moves_and_lines() {
        let mut path = BezPath::new();
        PathSink::move_to(&mut path, 10.0, 20.0);
        PathSink::line_to(&mut path, 30.0, 40.0);
        let svg = path.to_svg();
        assert!(svg.starts_with('M'), "svg = {svg}");
        assert!(svg.contains('L'), "svg = {svg}");
    }
}
