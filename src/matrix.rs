//! Precision conversion for 4x4 matrices.
//!
//! Scene math is often done in `f64` while GL uniforms take `f32`.

use glam::{DMat4, Mat4};

/// Narrow a double-precision matrix to single precision, element by element.
///
/// Both matrices are column-major. Each element is converted with a plain
/// `as f32` cast; no other rounding is applied.
#[must_use]
pub fn downcast_mat4(mat: &DMat4) -> Mat4 {
    Mat4::from_cols_array(&downcast_mat4_array(mat.to_cols_array()))
}

/// [`downcast_mat4`] over raw column-major arrays.
#[must_use]
#[expect(clippy::cast_possible_truncation)]
pub fn downcast_mat4_array(mat: [f64; 16]) -> [f32; 16] {
    mat.map(|element| element as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn identity_stays_identity() {
        let narrowed = downcast_mat4(&DMat4::IDENTITY);
        assert_eq!(narrowed.to_cols_array(), Mat4::IDENTITY.to_cols_array());
    }

    #[test]
    fn preserves_column_major_order() {
        let source: [f64; 16] = std::array::from_fn(|i| f64::from(u8::try_from(i).unwrap_or(0)));
        let narrowed = downcast_mat4(&DMat4::from_cols_array(&source));
        for (i, element) in narrowed.to_cols_array().iter().enumerate() {
            assert_eq!(f64::from(*element), source[i]);
        }
        // Element 12 is column 3, row 0: the X translation.
        assert_eq!(narrowed.w_axis.x, 12.0);
    }

    #[test]
    fn translation_survives_narrowing() {
        let mat = DMat4::from_translation(DVec3::new(1.5, -2.25, 100.0));
        let narrowed = downcast_mat4(&mat);
        assert_eq!(narrowed.w_axis.truncate(), glam::Vec3::new(1.5, -2.25, 100.0));
    }

    #[test]
    fn narrowing_is_plain_cast() {
        let value = 0.1_f64;
        let narrowed = downcast_mat4_array([value; 16]);
        #[allow(clippy::cast_possible_truncation)]
        let expected = value as f32;
        assert!(narrowed.iter().all(|&e| e.to_bits() == expected.to_bits()));
    }

    #[test]
    fn out_of_range_values_saturate_to_infinity() {
        let narrowed = downcast_mat4_array([f64::MAX; 16]);
        assert!(narrowed.iter().all(|e| e.is_infinite()));
    }
}
