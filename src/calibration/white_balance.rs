//! Gray-world white-balance estimation.
//!
//! Under a known neutral reference every channel should read the same;
//! the balance vector is the per-channel correction that makes it so.

use crate::sensing::RawSample;
use thiserror::Error;

/// White-balance estimation failures.
#[derive(Debug, Clone, Error)]
pub enum WhiteBalanceError {
    #[error("white-balance capture contains no samples")]
    EmptyCapture,
}

/// Estimates a white-balance vector from a neutral-reference capture.
///
/// Averages raw red/green/blue across the capture (the clear channel is
/// unused), then scales each channel toward the grand mean. Channel
/// means and the grand mean are floored at 1.0 so near-zero readings
/// cannot blow up the division, and each component is clamped into the
/// white-balance band.
pub fn estimate(samples: &[RawSample]) -> Result<[f64; 3], WhiteBalanceError> {
    let mean = RawSample::mean(samples).ok_or(WhiteBalanceError::EmptyCapture)?;
    let [r, g, b, _clear] = mean;

    let grand = ((r + g + b) / 3.0).max(1.0);
    let wb = [
        grand / r.max(1.0),
        grand / g.max(1.0),
        grand / b.max(1.0),
    ];

    let band = super::record::WB_BAND;
    Ok(wb.map(|w| w.clamp(band.0, band.1)))
}
