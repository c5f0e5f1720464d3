//! Spherical conic conformal projection.
//!
//! Raw transform on the rotated sphere: radians in, unit-sphere planar units
//! out. Scale and translation are applied by the projector, so the same raw
//! transform serves any canvas configuration.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::math::{sign, EPSILON};

/// Conic conformal raw transform with two standard parallels.
///
/// Precomputes the cone constant `n` and the radial scale `f` so the
/// per-point work is a tangent, a power, and one sin/cos pair.
#[derive(Clone, Copy, Debug)]
pub struct ConicConformal {
    n: f64, // cone constant
    f: f64, // F = cos(phi0) * tan^n(pi/4 + phi0/2) / n
}

impl ConicConformal {
    /// Create from two standard parallels (radians).
    pub fn new(phi0: f64, phi1: f64) -> Self {
        let cy0 = phi0.cos();
        let n = if (phi0 - phi1).abs() > 1e-10 {
            (cy0 / phi1.cos()).ln()
                / ((FRAC_PI_4 + phi1 / 2.0).tan() / (FRAC_PI_4 + phi0 / 2.0).tan()).ln()
        } else {
            phi0.sin()
        };
        let f = cy0 * (FRAC_PI_4 + phi0 / 2.0).tan().powf(n) / n;
        Self { n, f }
    }

    /// Forward: rotated (lambda, phi) radians to planar units, y up.
    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        // The pole opposite the cone apex maps to infinity; clamp it just
        // inside the domain.
        let phi = if self.f > 0.0 {
            phi.max(-FRAC_PI_2 + EPSILON)
        } else {
            phi.min(FRAC_PI_2 - EPSILON)
        };
        let r = self.f / (FRAC_PI_4 + phi / 2.0).tan().powf(self.n);
        let (sin_nl, cos_nl) = (self.n * lambda).sin_cos();
        (r * sin_nl, self.f - r * cos_nl)
    }

    /// Inverse on the cone's principal branch.
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let fy = self.f - y;
        let r = sign(self.n) * (x * x + fy * fy).sqrt();
        let mut l = x.atan2(fy.abs()) * sign(fy);
        if fy * self.n < 0.0 {
            l -= PI * sign(x) * sign(fy);
        }
        (
            l / self.n,
            2.0 * (self.f / r).powf(1.0 / self.n).atan() - FRAC_PI_2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_maps_to_origin() {
        let proj = ConicConformal::new(0.0, 60.0_f64.to_radians());
        let (x, y) = proj.forward(0.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip_two_parallels() {
        let proj = ConicConformal::new(0.0, 60.0_f64.to_radians());
        let cases: &[(f64, f64)] = &[
            (0.02, 0.03),   // near the projection center
            (-0.18, -0.17), // Canary latitudes after rotation
            (0.13, 0.05),
            (-0.35, 0.25),
        ];
        for &(lambda, phi) in cases {
            let (x, y) = proj.forward(lambda, phi);
            let (lambda2, phi2) = proj.invert(x, y);
            assert_relative_eq!(lambda2, lambda, epsilon = 1e-12);
            assert_relative_eq!(phi2, phi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_roundtrip_coincident_parallels() {
        let phi = 45.0_f64.to_radians();
        let proj = ConicConformal::new(phi, phi);
        let (x, y) = proj.forward(0.2, 0.9);
        let (lambda2, phi2) = proj.invert(x, y);
        assert_relative_eq!(lambda2, 0.2, epsilon = 1e-12);
        assert_relative_eq!(phi2, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_south_pole_is_clamped_finite() {
        let proj = ConicConformal::new(0.0, 60.0_f64.to_radians());
        let (x, y) = proj.forward(0.1, -FRAC_PI_2);
        assert!(x.is_finite());
        assert!(y.is_finite());
    }

    #[test]
    fn test_north_is_up() {
        // Larger latitude lands closer to the cone apex: larger raw y.
        let proj = ConicConformal::new(0.0, 60.0_f64.to_radians());
        let (_, y_low) = proj.forward(0.0, 0.1);
        let (_, y_high) = proj.forward(0.0, 0.5);
        assert!(y_high > y_low);
    }
}
