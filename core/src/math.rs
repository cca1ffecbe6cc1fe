//! Math type aliases and helper functions.
//!
//! Glyph geometry is computed in single precision, matching what is
//! uploaded to vertex buffers.

pub use nalgebra;

// ===== Types =====

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Triple in array form, as stored in vertex attribute buffers.
pub type Triple = [f32; 3];

// ===== Helper functions =====

/// Scalar triple product `c · (a × b)`.
///
/// Positive when `a`, `b`, `c` form a right-handed frame.
pub fn triple_product(a: &Vec3, b: &Vec3, c: &Vec3) -> f32 {
    c.dot(&a.cross(b))
}

/// Rescale `v` to length `length`, leaving it untouched when its magnitude is zero.
///
/// Returns `false` for the zero-magnitude case.
pub fn rescale_in_place(v: &mut Vec3, length: f32) -> bool {
    let magnitude = v.norm();
    if magnitude > 0.0 {
        *v *= length / magnitude;
        true
    } else {
        false
    }
}

/// `-1.0` for negative values, `1.0` otherwise (including `-0.0` and NaN).
pub fn sign_of(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// Convert a [`Vec3`] to a buffer triple.
pub fn to_triple(v: &Vec3) -> Triple {
    [v.x, v.y, v.z]
}

/// Build a [`Vec3`] from a buffer triple.
pub fn from_triple(t: &Triple) -> Vec3 {
    Vec3::new(t[0], t[1], t[2])
}

/// Component-wise approximate equality.
pub fn approx_eq(a: &Vec3, b: &Vec3, tolerance: f32) -> bool {
    (a - b).amax() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_product_right_handed() {
        let x = Vec3::x();
        let y = Vec3::y();
        let z = Vec3::z();
        assert!((triple_product(&x, &y, &z) - 1.0).abs() < 1e-6);
        assert!((triple_product(&y, &x, &z) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rescale_zero_vector_untouched() {
        let mut v = Vec3::zeros();
        assert!(!rescale_in_place(&mut v, 2.0));
        assert_eq!(v, Vec3::zeros());

        let mut w = Vec3::new(0.0, 3.0, 4.0);
        assert!(rescale_in_place(&mut w, 10.0));
        assert!(approx_eq(&w, &Vec3::new(0.0, 6.0, 8.0), 1e-5));
    }

    #[test]
    fn test_sign_of() {
        assert_eq!(sign_of(-0.5), -1.0);
        assert_eq!(sign_of(0.0), 1.0);
        assert_eq!(sign_of(-0.0), 1.0);
        assert_eq!(sign_of(3.0), 1.0);
    }
}
