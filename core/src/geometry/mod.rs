//! Geometric primitives used by the line builder.
//!
//! Everything here is plain value types over `nalgebra`: planes, axes,
//! parametrised curves and the bounded edges cut from them.

use nalgebra as na;

pub type Point3 = na::Point3<f64>;
pub type Vector3 = na::Vector3<f64>;

pub const EPSILON: f64 = 1e-6;

pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }
}

impl ApproxEq for Point3 {
    fn approx_eq(&self, other: &Self) -> bool {
        na::distance_squared(self, other) < EPSILON * EPSILON
    }
}

impl ApproxEq for Vector3 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).norm_squared() < EPSILON * EPSILON
    }
}

pub mod axis;
pub mod curve;
pub mod intersection;
pub mod plane;
pub mod utils_2d;

#[cfg(test)]
mod tests_curve;

pub use axis::Axis;
pub use curve::{Curve, Edge};
pub use plane::Plane;

/// Points closer than `tol` are considered the same vertex.
pub fn same_point(a: &Point3, b: &Point3, tol: f64) -> bool {
    na::distance_squared(a, b) <= tol * tol
}

/// Rotate `v` about the direction `axis` by `degrees` (right-handed).
pub fn rotate_vector(v: &Vector3, axis: &Vector3, degrees: f64) -> Vector3 {
    let k = axis.normalize();
    let (sin, cos) = degrees.to_radians().sin_cos();
    v * cos + k.cross(v) * sin + k * k.dot(v) * (1.0 - cos)
}

/// Signed angle from `from` to `to` measured about `normal`, in `(-PI, PI]`.
pub fn signed_angle(from: &Vector3, to: &Vector3, normal: &Vector3) -> f64 {
    let n = normal.normalize();
    from.cross(to).dot(&n).atan2(from.dot(to))
}

// 8-point Gauss-Legendre nodes and weights on [-1, 1].
const GAUSS_NODES: [(f64, f64); 8] = [
    (-0.960_289_856_497_536_3, 0.101_228_536_290_376_26),
    (-0.796_666_477_413_626_7, 0.222_381_034_453_374_47),
    (-0.525_532_409_916_329, 0.313_706_645_877_887_3),
    (-0.183_434_642_495_649_8, 0.362_683_783_378_362),
    (0.183_434_642_495_649_8, 0.362_683_783_378_362),
    (0.525_532_409_916_329, 0.313_706_645_877_887_3),
    (0.796_666_477_413_626_7, 0.222_381_034_453_374_47),
    (0.960_289_856_497_536_3, 0.101_228_536_290_376_26),
];

/// Composite Gauss-Legendre quadrature of `f` over `[a, b]` using `pieces` panels.
pub fn integrate<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, pieces: usize) -> f64 {
    let pieces = pieces.max(1);
    let h = (b - a) / pieces as f64;
    let mut total = 0.0;
    for i in 0..pieces {
        let lo = a + h * i as f64;
        let mid = lo + h / 2.0;
        for (x, w) in GAUSS_NODES {
            total += w * f(mid + x * h / 2.0);
        }
    }
    total * h / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotate_quarter_turn_about_z() {
        let v = rotate_vector(&Vector3::x(), &Vector3::z(), 90.0);
        assert!(v.approx_eq(&Vector3::y()), "got {v:?}");
    }

    #[test]
    fn signed_angle_is_oriented() {
        let a = signed_angle(&Vector3::x(), &Vector3::y(), &Vector3::z());
        let b = signed_angle(&Vector3::x(), &Vector3::y(), &-Vector3::z());
        assert_abs_diff_eq!(a, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(b, -std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn quadrature_integrates_sine() {
        let v = integrate(f64::sin, 0.0, std::f64::consts::PI, 4);
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-10);
    }
}
