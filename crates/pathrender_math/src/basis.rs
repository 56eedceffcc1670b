//! Direction helpers shared by the scattering models.

use crate::Vec3;

/// Build a tangent frame around `normal`.
///
/// Returns `(tangent, bitangent)` such that `(tangent, bitangent, normal)` is
/// orthonormal when `normal` is unit length. The helper axis switches away
/// from X when the normal is nearly parallel to it.
pub fn build_orthonormal_basis(normal: Vec3) -> (Vec3, Vec3) {
    let helper = if normal.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };

    let bitangent = normal.cross(helper).normalize_or_zero();
    let tangent = bitangent.cross(normal).normalize_or_zero();
    (tangent, bitangent)
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(normal: Vec3) {
        let (t, b) = build_orthonormal_basis(normal);
        assert!((t.length() - 1.0).abs() < 1e-5);
        assert!((b.length() - 1.0).abs() < 1e-5);
        assert!(t.dot(b).abs() < 1e-5);
        assert!(t.dot(normal).abs() < 1e-5);
        assert!(b.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        assert_orthonormal(Vec3::Y);
        assert_orthonormal(Vec3::Z);
        assert_orthonormal(Vec3::new(1.0, 2.0, -3.0).normalize());
    }

    #[test]
    fn test_basis_for_x_aligned_normal() {
        // Crossing X with the default helper would be degenerate
        assert_orthonormal(Vec3::X);
        assert_orthonormal(-Vec3::X);
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_with_unit_ratio_passes_straight_through() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(v, Vec3::Y, 1.0);
        assert!((r - v).length() < 1e-5);
    }

    #[test]
    fn test_refract_bends_toward_normal_entering_denser_medium() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(v, Vec3::Y, 1.0 / 1.5);
        assert!(r.x < v.x);
        assert!(r.y < 0.0);
    }
}
