use glam::{DMat4, DQuat, DVec3, EulerRot};

/// Builds the affine matrix for a translation, an Euler rotation (radians)
/// and a per-axis scale.
///
/// The upper-left 3x3 block is `R * S`, the last column is the translation.
/// Rotation angles `(x, y, z)` compose as `Rz * Ry * Rx`; this convention is
/// shared with every caller and must not change independently of them.
///
/// Degenerate inputs (zero or negative scale, NaN angles) pass through
/// unchecked.
pub fn compose(translation: DVec3, rotation: DVec3, scale: DVec3) -> DMat4 {
    DMat4::from_scale_rotation_translation(scale, euler_rotation(rotation), translation)
}

pub fn euler_rotation(rotation: DVec3) -> DQuat {
    DQuat::from_euler(EulerRot::ZYX, rotation.z, rotation.y, rotation.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn assert_mat4_eq(a: DMat4, b: DMat4) {
        for (x, y) in a
            .to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
        {
            assert!((x - y).abs() < EPSILON, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_when_all_defaults() {
        assert_mat4_eq(compose(DVec3::ZERO, DVec3::ZERO, DVec3::ONE), DMat4::IDENTITY);
    }

    #[test]
    fn translation_lands_in_last_column() {
        let m = compose(DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO, DVec3::ONE);
        assert_eq!(m.w_axis.truncate(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.w_axis.w, 1.0);
    }

    #[test]
    fn rotation_matches_zyx_product() {
        // Reference matrix built term by term for Rz * Ry * Rx.
        let (x, y, z) = (0.3, -0.7, 1.1);
        let (sx, cx) = (f64::sin(x), f64::cos(x));
        let (sy, cy) = (f64::sin(y), f64::cos(y));
        let (sz, cz) = (f64::sin(z), f64::cos(z));

        let expected = DMat4::from_cols_array_2d(&[
            [cy * cz, cy * sz, -sy, 0.0],
            [sx * sy * cz - cx * sz, sx * sy * sz + cx * cz, sx * cy, 0.0],
            [cx * sy * cz + sx * sz, cx * sy * sz - sx * cz, cx * cy, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        let m = compose(DVec3::ZERO, DVec3::new(x, y, z), DVec3::ONE);
        assert_mat4_eq(m, expected);
    }

    #[test]
    fn scale_scales_the_rotation_block() {
        let m = compose(DVec3::ZERO, DVec3::ZERO, DVec3::new(2.0, 3.0, 4.0));
        assert_mat4_eq(m, DMat4::from_scale(DVec3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn negative_scale_passes_through() {
        let m = compose(DVec3::ZERO, DVec3::ZERO, DVec3::splat(-1.0));
        let p = m.transform_point3(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, DVec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn composition_is_associative() {
        let a = compose(
            DVec3::new(1.0, 0.0, -2.0),
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::splat(1.5),
        );
        let b = compose(
            DVec3::new(0.0, 4.0, 0.0),
            DVec3::new(-0.4, 0.0, 0.9),
            DVec3::ONE,
        );
        let c = compose(
            DVec3::new(-3.0, 1.0, 1.0),
            DVec3::ZERO,
            DVec3::new(0.5, 2.0, 1.0),
        );

        let left = (a * b) * c;
        let right = a * (b * c);
        for (x, y) in left
            .to_cols_array()
            .iter()
            .zip(right.to_cols_array().iter())
        {
            assert!((x - y).abs() < 1e-9);
        }
    }
}
