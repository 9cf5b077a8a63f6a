//! Per-channel calibration record.
//!
//! The logical record shape: white-balance vector, color-correction
//! matrix, gamma, saturation, and the CCM enable flag. Persistence
//! encoding is owned by the external store; the record only defines
//! defaults, clamp bands, and the manual adjustment operations.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// White-balance component clamp band.
///
/// Bounds the correction magnitude so a bad reference capture cannot
/// produce runaway channel scaling.
pub const WB_BAND: (f64, f64) = (0.25, 4.0);

/// Gamma clamp band.
pub const GAMMA_BAND: (f64, f64) = (1.40, 2.80);

/// Saturation clamp band.
pub const SATURATION_BAND: (f64, f64) = (0.10, 3.00);

/// Step size for the manual gamma/saturation adjustments.
pub const ADJUST_STEP: f64 = 0.05;

/// Calibration state for one sensor channel.
///
/// Created identity-like the first time a channel is seen; mutated only
/// through whole-record replacement in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Per-channel multiplicative white-balance correction.
    pub white_balance: [f64; 3],
    /// Color-correction matrix, row-major.
    pub ccm: [[f64; 3]; 3],
    /// Display gamma used for encoding (and patch linearization).
    pub gamma: f64,
    /// Chroma scale applied in the luma/chroma basis.
    pub saturation: f64,
    /// Whether the CCM is applied during rendering.
    pub ccm_enabled: bool,
}

impl Default for CalibrationRecord {
    fn default() -> Self {
        Self {
            white_balance: [1.0, 1.0, 1.0],
            ccm: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            gamma: 2.20,
            saturation: 1.00,
            ccm_enabled: true,
        }
    }
}

/// Rounds to two decimals, matching the manual adjustment granularity.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl CalibrationRecord {
    /// The color-correction matrix as a fixed-size matrix.
    pub fn ccm_matrix(&self) -> Matrix3<f64> {
        let m = &self.ccm;
        Matrix3::new(
            m[0][0], m[0][1], m[0][2], //
            m[1][0], m[1][1], m[1][2], //
            m[2][0], m[2][1], m[2][2],
        )
    }

    /// Returns a copy with the matrix replaced.
    pub fn with_ccm(&self, m: Matrix3<f64>) -> Self {
        let mut next = self.clone();
        next.ccm = [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ];
        next
    }

    /// Returns a copy with the white balance replaced, clamped to
    /// [`WB_BAND`].
    pub fn with_white_balance(&self, wb: [f64; 3]) -> Self {
        let mut next = self.clone();
        next.white_balance = wb.map(|w| w.clamp(WB_BAND.0, WB_BAND.1));
        next
    }

    /// Returns a copy with saturation stepped by `delta`, clamped to
    /// [`SATURATION_BAND`].
    pub fn adjust_saturation(&self, delta: f64) -> Self {
        let mut next = self.clone();
        next.saturation = round2(self.saturation + delta)
            .clamp(SATURATION_BAND.0, SATURATION_BAND.1);
        next
    }

    /// Returns a copy with gamma stepped by `delta`, clamped to
    /// [`GAMMA_BAND`].
    pub fn adjust_gamma(&self, delta: f64) -> Self {
        let mut next = self.clone();
        next.gamma = round2(self.gamma + delta).clamp(GAMMA_BAND.0, GAMMA_BAND.1);
        next
    }

    /// Returns a copy with the CCM enable flag flipped.
    pub fn toggled_ccm(&self) -> Self {
        let mut next = self.clone();
        next.ccm_enabled = !self.ccm_enabled;
        next
    }

    /// Returns a copy with every bounded field forced into its band.
    ///
    /// Applied when a record arrives from an external store whose
    /// contents are not trusted to honor the invariants.
    pub fn clamped(&self) -> Self {
        let mut next = self.clone();
        next.white_balance = self
            .white_balance
            .map(|w| w.clamp(WB_BAND.0, WB_BAND.1));
        next.gamma = self.gamma.clamp(GAMMA_BAND.0, GAMMA_BAND.1);
        next.saturation = self.saturation.clamp(SATURATION_BAND.0, SATURATION_BAND.1);
        next
    }
}
