//! Color-correction matrix fitting.
//!
//! Fits the residual 3×3 linear map from white-balanced sensor space to
//! reference linear-light space by least squares over a set of known
//! color patches. With exactly three non-degenerate patches the solve
//! is exact; with more it minimizes total squared color error.

use super::record::CalibrationRecord;
use crate::pipeline::gamma_linearize;
use crate::sensing::RawSample;
use nalgebra::{DMatrix, Matrix3, Vector3};
use thiserror::Error;

/// Minimum patch count for a rank-3 solve.
pub const MIN_PATCHES: usize = 3;

/// Relative singular-value ratio below which the sample matrix is
/// treated as rank-deficient.
const RANK_EPS: f64 = 1e-9;

/// A reference color patch of known display value.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePatch {
    /// Human-readable patch name for capture prompts.
    pub name: &'static str,
    /// Display-referred sRGB value shown on the reference screen.
    pub srgb: [f64; 3],
}

impl ReferencePatch {
    /// The patch's linear-light value under the channel's gamma.
    pub fn reference_linear(&self, gamma: f64) -> Vector3<f64> {
        gamma_linearize(Vector3::from(self.srgb), gamma)
    }
}

/// The capture sequence: primaries and secondaries plus white.
pub const REFERENCE_PATCHES: [ReferencePatch; 7] = [
    ReferencePatch {
        name: "White",
        srgb: [1.0, 1.0, 1.0],
    },
    ReferencePatch {
        name: "Red",
        srgb: [1.0, 0.0, 0.0],
    },
    ReferencePatch {
        name: "Green",
        srgb: [0.0, 1.0, 0.0],
    },
    ReferencePatch {
        name: "Blue",
        srgb: [0.0, 0.0, 1.0],
    },
    ReferencePatch {
        name: "Cyan",
        srgb: [0.0, 1.0, 1.0],
    },
    ReferencePatch {
        name: "Magenta",
        srgb: [1.0, 0.0, 1.0],
    },
    ReferencePatch {
        name: "Yellow",
        srgb: [1.0, 1.0, 0.0],
    },
];

/// One calibration-capture pair for a single patch.
#[derive(Debug, Clone, Copy)]
pub struct PatchSample {
    /// White-balanced, clear-normalized sensor reading.
    pub sensor_normalized: Vector3<f64>,
    /// Reference value in linear light.
    pub reference_linear: Vector3<f64>,
}

/// CCM fit failures. A failed fit is a rejected operation: the
/// channel's existing record is left untouched.
#[derive(Debug, Clone, Error)]
pub enum CcmError {
    #[error("need at least {MIN_PATCHES} patch samples, got {got}")]
    TooFewPatches { got: usize },
    #[error("patch capture contains no samples")]
    EmptyPatchCapture,
    #[error("patch samples are degenerate in sensor space")]
    DegeneratePatches,
}

/// Least-squares fit of the correction matrix from patch samples.
///
/// Stacks sensor readings as rows of `S` and references as rows of `R`;
/// the matrix is `(pinv(S) · R)ᵀ`. Near-singular `S` (collinear or
/// near-collinear patches) is reported as [`CcmError::DegeneratePatches`]
/// rather than silently returning a degenerate matrix.
pub fn fit(samples: &[PatchSample]) -> Result<Matrix3<f64>, CcmError> {
    let n = samples.len();
    if n < MIN_PATCHES {
        return Err(CcmError::TooFewPatches { got: n });
    }

    let s = DMatrix::from_fn(n, 3, |i, j| samples[i].sensor_normalized[j]);
    let r = DMatrix::from_fn(n, 3, |i, j| samples[i].reference_linear[j]);

    let svd = s.svd(true, true);
    let largest = svd.singular_values.max();
    let smallest = svd.singular_values.min();
    if !largest.is_finite() || largest <= 0.0 || smallest < largest * RANK_EPS {
        return Err(CcmError::DegeneratePatches);
    }

    let pinv = svd
        .pseudo_inverse(largest * RANK_EPS)
        .map_err(|_| CcmError::DegeneratePatches)?;
    let fitted = (pinv * r).transpose();

    Ok(Matrix3::from_fn(|i, j| fitted[(i, j)]))
}

/// One CCM calibration session for one channel.
///
/// Capture must happen with color correction disabled and white balance
/// applied, so the fitted matrix is the residual transform. The session
/// hands out a capture-time record with the CCM switched off and never
/// touches the caller's stored record: on success [`CcmSession::solve`]
/// returns the replacement record (matrix installed, CCM enabled), on
/// failure the caller simply keeps what it had — including a
/// previously-disabled enable flag.
#[derive(Debug, Clone)]
pub struct CcmSession {
    baseline: CalibrationRecord,
    capture: CalibrationRecord,
    samples: Vec<PatchSample>,
}

impl CcmSession {
    /// Starts a session against the channel's current record.
    pub fn begin(record: &CalibrationRecord) -> Self {
        let mut capture = record.clone();
        capture.ccm_enabled = false;
        Self {
            baseline: record.clone(),
            capture,
            samples: Vec::with_capacity(REFERENCE_PATCHES.len()),
        }
    }

    /// The record to render with while capturing (CCM disabled).
    pub fn capture_record(&self) -> &CalibrationRecord {
        &self.capture
    }

    /// Number of patches captured so far.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Records an averaged capture of one reference patch.
    pub fn capture_patch(
        &mut self,
        patch: &ReferencePatch,
        reads: &[RawSample],
    ) -> Result<(), CcmError> {
        let mean = RawSample::mean(reads).ok_or(CcmError::EmptyPatchCapture)?;
        let sensor = normalized_mean(mean, &self.capture.white_balance);
        let reference = patch.reference_linear(self.capture.gamma);

        tracing::debug!(
            patch = patch.name,
            sensor = ?sensor.as_slice(),
            reference = ?reference.as_slice(),
            "captured CCM patch"
        );

        self.samples.push(PatchSample {
            sensor_normalized: sensor,
            reference_linear: reference,
        });
        Ok(())
    }

    /// Solves the fit and produces the replacement record.
    pub fn solve(self) -> Result<CalibrationRecord, CcmError> {
        let matrix = fit(&self.samples)?;
        let mut next = self.baseline.with_ccm(matrix);
        next.ccm_enabled = true;
        tracing::info!(patches = self.samples.len(), "CCM fit succeeded");
        Ok(next)
    }
}

/// Clear-normalizes and white-balances an averaged raw capture.
fn normalized_mean(mean: [f64; 4], wb: &[f64; 3]) -> Vector3<f64> {
    let [r, g, b, c] = mean;
    if c <= 0.0 {
        return Vector3::zeros();
    }
    Vector3::new(r / c * wb[0], g / c * wb[1], b / c * wb[2])
}
