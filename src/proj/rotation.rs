//! Three-angle spherical rotation.
//!
//! Recenters the sphere before the raw projection: a longitude shift
//! followed by a rotation of the pole. Radians in, radians out.

use std::f64::consts::{PI, TAU};

#[derive(Clone, Copy, Debug)]
pub struct Rotation {
    delta_lambda: f64,
    cos_dphi: f64,
    sin_dphi: f64,
    cos_dgamma: f64,
    sin_dgamma: f64,
}

impl Rotation {
    /// Angles in degrees, matching the projection surface.
    pub fn new(delta_lambda: f64, delta_phi: f64, delta_gamma: f64) -> Self {
        let (sin_dphi, cos_dphi) = delta_phi.to_radians().sin_cos();
        let (sin_dgamma, cos_dgamma) = delta_gamma.to_radians().sin_cos();
        Self {
            delta_lambda: delta_lambda.to_radians(),
            cos_dphi,
            sin_dphi,
            cos_dgamma,
            sin_dgamma,
        }
    }

    /// Rotate (lambda, phi) into the rotated frame.
    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = normalize(lambda + self.delta_lambda);
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_dphi + x * self.sin_dphi;
        (
            (y * self.cos_dgamma - k * self.sin_dgamma)
                .atan2(x * self.cos_dphi - z * self.sin_dphi),
            (k * self.cos_dgamma + y * self.sin_dgamma).asin(),
        )
    }

    /// Rotate (lambda, phi) back into the source frame.
    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_dgamma - y * self.sin_dgamma;
        let l = (y * self.cos_dgamma + z * self.sin_dgamma)
            .atan2(x * self.cos_dphi + k * self.sin_dphi);
        (
            normalize(l - self.delta_lambda),
            (k * self.cos_dphi - x * self.sin_dphi).asin(),
        )
    }
}

fn normalize(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_maps_to_origin() {
        // Rotation [5, -38.6] recenters (-5, 38.6).
        let rotation = Rotation::new(5.0, -38.6, 0.0);
        let (lambda, phi) =
            rotation.forward((-5.0_f64).to_radians(), 38.6_f64.to_radians());
        assert_relative_eq!(lambda, 0.0, epsilon = 1e-12);
        assert_relative_eq!(phi, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        let rotation = Rotation::new(5.0, -38.6, 0.0);
        let cases: &[(f64, f64)] = &[
            (-3.7, 40.42),
            (2.17, 41.38),
            (-16.25, 28.47),
            (170.0, -60.0),
        ];
        for &(lon, lat) in cases {
            let (lambda, phi) = rotation.forward(lon.to_radians(), lat.to_radians());
            let (lon2, lat2) = rotation.invert(lambda, phi);
            assert_relative_eq!(lon2, lon.to_radians(), epsilon = 1e-12);
            assert_relative_eq!(lat2, lat.to_radians(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_longitude_stays_normalized() {
        let rotation = Rotation::new(30.0, 0.0, 0.0);
        let (lambda, _) = rotation.forward(170.0_f64.to_radians(), 0.0);
        assert!(lambda <= PI && lambda >= -PI);
        assert_relative_eq!(lambda, (-160.0_f64).to_radians(), epsilon = 1e-12);
    }
}
