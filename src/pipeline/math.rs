//! Fixed color-math building blocks for the render pipeline.

use nalgebra::{Matrix3, Vector3};

/// BT.709 luma coefficients for linear RGB.
pub const LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Luma/chroma analysis basis.
///
/// Row 0 is the BT.709 luma row; rows 1 and 2 are the corresponding
/// green and blue chroma rows (`G - Y`, `B - Y`).
pub fn luma_chroma_basis() -> Matrix3<f64> {
    let [kr, kg, kb] = LUMA;
    Matrix3::new(
        kr, kg, kb, //
        -kr, 1.0 - kg, -kb, //
        -kr, -kg, 1.0 - kb,
    )
}

/// Analytic inverse of [`luma_chroma_basis`].
///
/// Closed form exists because the BT.709 coefficients sum to one:
/// `R = Y - (kg*u + kb*w)/kr`, `G = Y + u`, `B = Y + w`.
pub fn luma_chroma_basis_inv() -> Matrix3<f64> {
    let [kr, kg, kb] = LUMA;
    Matrix3::new(
        1.0, -kg / kr, -kb / kr, //
        1.0, 1.0, 0.0, //
        1.0, 0.0, 1.0,
    )
}

/// Scales the chroma components of a linear RGB vector.
///
/// `saturation = 1.0` is the identity; `0.0` collapses to gray.
pub fn scale_saturation(v: Vector3<f64>, saturation: f64) -> Vector3<f64> {
    let mut yuv = luma_chroma_basis() * v;
    yuv[1] *= saturation;
    yuv[2] *= saturation;
    luma_chroma_basis_inv() * yuv
}

/// Gamma-encodes a linear vector: clamp to `[0, 1]`, raise to `1/gamma`.
pub fn gamma_encode(v: Vector3<f64>, gamma: f64) -> Vector3<f64> {
    v.map(|x| x.clamp(0.0, 1.0).powf(1.0 / gamma))
}

/// Linearizes a gamma-encoded vector: clamp to `[0, 1]`, raise to `gamma`.
///
/// Used to turn display-referred patch values into reference linear light.
pub fn gamma_linearize(v: Vector3<f64>, gamma: f64) -> Vector3<f64> {
    v.map(|x| x.clamp(0.0, 1.0).powf(gamma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basis_inverse_is_analytic() {
        let product = luma_chroma_basis() * luma_chroma_basis_inv();
        let identity = Matrix3::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(product[(i, j)], identity[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_unit_saturation_is_identity() {
        let v = Vector3::new(0.3, 0.5, 0.1);
        let out = scale_saturation(v, 1.0);
        assert_relative_eq!(out[0], v[0], epsilon = 1e-12);
        assert_relative_eq!(out[1], v[1], epsilon = 1e-12);
        assert_relative_eq!(out[2], v[2], epsilon = 1e-12);
    }

    #[test]
    fn test_zero_saturation_collapses_to_luma() {
        let v = Vector3::new(0.8, 0.2, 0.4);
        let y = LUMA[0] * v[0] + LUMA[1] * v[1] + LUMA[2] * v[2];
        let out = scale_saturation(v, 0.0);
        for c in 0..3 {
            assert_relative_eq!(out[c], y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gamma_round_trip() {
        let v = Vector3::new(0.1, 0.5, 0.9);
        let back = gamma_linearize(gamma_encode(v, 2.2), 2.2);
        for c in 0..3 {
            assert_relative_eq!(back[c], v[c], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gamma_encode_clamps() {
        let v = Vector3::new(-0.5, 1.5, 0.0);
        let out = gamma_encode(v, 2.2);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], 0.0);
    }
}
