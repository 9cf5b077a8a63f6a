//! Discrete auto-exposure control.
//!
//! A bang-bang controller that keeps the clear-channel count inside a
//! usable band by stepping gain and integration time along their fixed
//! lattices. It is called once per read and converges over several read
//! cycles, never within one call.

use super::lattice::ExposureState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clear-count thresholds driving exposure decisions.
///
/// Invariant: `target_min < target_max < clip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureThresholds {
    /// Below this the signal is too dim; exposure steps up.
    pub target_min: u32,
    /// Above this the signal is too bright; exposure steps down.
    pub target_max: u32,
    /// At or above this the sensor is clipping; exposure always steps down.
    pub clip: u32,
}

impl Default for ExposureThresholds {
    fn default() -> Self {
        Self {
            target_min: 12_000,
            target_max: 45_000,
            clip: 60_000,
        }
    }
}

/// Threshold ordering violations.
#[derive(Debug, Clone, Error)]
pub enum ThresholdError {
    #[error("thresholds must satisfy target_min < target_max < clip (got {min} / {max} / {clip})")]
    BadOrdering { min: u32, max: u32, clip: u32 },
}

impl ExposureThresholds {
    /// Validates the strict threshold ordering.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if self.target_min < self.target_max && self.target_max < self.clip {
            Ok(())
        } else {
            Err(ThresholdError::BadOrdering {
                min: self.target_min,
                max: self.target_max,
                clip: self.clip,
            })
        }
    }

    /// Classifies a clear count for display/status purposes.
    ///
    /// Clipping and dim/bright conditions are statuses for the caller,
    /// not errors; the controller itself never retries.
    pub fn classify(&self, clear: u32) -> SignalStatus {
        if clear >= self.clip {
            SignalStatus::Clipping
        } else if clear < self.target_min {
            SignalStatus::Dim
        } else if clear > self.target_max {
            SignalStatus::Bright
        } else {
            SignalStatus::Ok
        }
    }
}

/// Signal level relative to the target band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStatus {
    /// Clear count inside the target band.
    Ok,
    /// Clear count below the target band.
    Dim,
    /// Clear count above the target band but not clipping.
    Bright,
    /// Clear count at or above the clip level.
    Clipping,
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Dim => write!(f, "dim"),
            Self::Bright => write!(f, "bright"),
            Self::Clipping => write!(f, "clipping"),
        }
    }
}

/// Result of one adjustment decision.
#[derive(Debug, Clone, Copy)]
pub struct Adjustment {
    /// Exposure state after the decision.
    pub state: ExposureState,
    /// True if the state differs from the input.
    ///
    /// When set, the caller must apply the new settings and re-read the
    /// sensor after a settling delay before using the next sample.
    pub changed: bool,
}

/// The auto-exposure controller.
///
/// Gain changes settle faster than integration-time changes, so the
/// controller exhausts gain headroom before touching integration time
/// in either direction. Exactly one lattice step per call.
#[derive(Debug, Clone, Default)]
pub struct AutoExposure {
    thresholds: ExposureThresholds,
}

impl AutoExposure {
    /// Creates a controller with the given thresholds.
    pub fn new(thresholds: ExposureThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the controller's thresholds.
    pub fn thresholds(&self) -> &ExposureThresholds {
        &self.thresholds
    }

    /// Decides whether to change exposure for the observed clear count.
    ///
    /// Pure and total over any clear count. If both parameters are at
    /// their limits the result is unchanged and the clipping or dim
    /// condition persists as a [`SignalStatus`].
    pub fn adjust(&self, state: ExposureState, clear: u32) -> Adjustment {
        let t = &self.thresholds;
        let has_floor_headroom = !state.gain_at_floor() || !state.integration_at_floor();
        let has_ceiling_headroom = !state.gain_at_ceiling() || !state.integration_at_ceiling();

        if clear >= t.clip || (clear > t.target_max && has_floor_headroom) {
            // Too bright: drop gain first, integration time once gain is out.
            let next = if !state.gain_at_floor() {
                ExposureState::new(state.gain_index() - 1, state.integration_index())
            } else if !state.integration_at_floor() {
                ExposureState::new(state.gain_index(), state.integration_index() - 1)
            } else {
                return Adjustment {
                    state,
                    changed: false,
                };
            };
            return Adjustment {
                state: next,
                changed: true,
            };
        }

        if clear < t.target_min && has_ceiling_headroom {
            // Too dim: raise gain first, integration time once gain is maxed.
            let next = if !state.gain_at_ceiling() {
                ExposureState::new(state.gain_index() + 1, state.integration_index())
            } else {
                ExposureState::new(state.gain_index(), state.integration_index() + 1)
            };
            return Adjustment {
                state: next,
                changed: true,
            };
        }

        Adjustment {
            state,
            changed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::lattice::{GAIN_VALUES, INTEGRATION_MS};
    use proptest::prelude::*;

    fn controller() -> AutoExposure {
        AutoExposure::default()
    }

    #[test]
    fn test_dim_prefers_gain_increase() {
        let ae = controller();
        let state = ExposureState::new(0, 2);
        let adj = ae.adjust(state, 1_000);
        assert!(adj.changed);
        assert_eq!(adj.state.gain_index(), 1);
        assert_eq!(adj.state.integration_index(), 2);
    }

    #[test]
    fn test_dim_extends_integration_when_gain_maxed() {
        let ae = controller();
        let state = ExposureState::new(GAIN_VALUES.len() - 1, 1);
        let adj = ae.adjust(state, 1_000);
        assert!(adj.changed);
        assert_eq!(adj.state.gain_index(), GAIN_VALUES.len() - 1);
        assert_eq!(adj.state.integration_index(), 2);
    }

    #[test]
    fn test_clip_prefers_gain_decrease() {
        let ae = controller();
        let state = ExposureState::brightest();
        let adj = ae.adjust(state, 60_000);
        assert!(adj.changed);
        assert_eq!(adj.state.gain_index(), GAIN_VALUES.len() - 2);
        assert_eq!(adj.state.integration_index(), INTEGRATION_MS.len() - 1);
    }

    #[test]
    fn test_clip_shortens_integration_when_gain_floored() {
        let ae = controller();
        let state = ExposureState::new(0, 3);
        let adj = ae.adjust(state, 60_000);
        assert!(adj.changed);
        assert_eq!(adj.state.gain_index(), 0);
        assert_eq!(adj.state.integration_index(), 2);
    }

    #[test]
    fn test_clip_at_both_floors_reports_unchanged() {
        let ae = controller();
        let state = ExposureState::dimmest();
        let adj = ae.adjust(state, 65_535);
        assert!(!adj.changed);
        assert_eq!(adj.state, state);
    }

    #[test]
    fn test_dim_at_both_ceilings_reports_unchanged() {
        let ae = controller();
        let state = ExposureState::brightest();
        let adj = ae.adjust(state, 0);
        assert!(!adj.changed);
        assert_eq!(adj.state, state);
    }

    #[test]
    fn test_bright_without_headroom_only_acts_on_clip() {
        let ae = controller();
        let state = ExposureState::dimmest();
        // Above target_max but below clip with no headroom below: no change.
        let adj = ae.adjust(state, 50_000);
        assert!(!adj.changed);
    }

    #[test]
    fn test_classify_bands() {
        let t = ExposureThresholds::default();
        assert_eq!(t.classify(30_000), SignalStatus::Ok);
        assert_eq!(t.classify(11_999), SignalStatus::Dim);
        assert_eq!(t.classify(45_001), SignalStatus::Bright);
        assert_eq!(t.classify(60_000), SignalStatus::Clipping);
    }

    #[test]
    fn test_default_thresholds_valid() {
        assert!(ExposureThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let t = ExposureThresholds {
            target_min: 50_000,
            target_max: 45_000,
            clip: 60_000,
        };
        assert!(t.validate().is_err());
    }

    proptest! {
        /// In-band counts never change exposure (idempotence).
        #[test]
        fn prop_in_band_is_stable(
            g in 0usize..GAIN_VALUES.len(),
            it in 0usize..INTEGRATION_MS.len(),
            clear in 12_000u32..=45_000,
        ) {
            let ae = controller();
            let adj = ae.adjust(ExposureState::new(g, it), clear);
            prop_assert!(!adj.changed);
        }

        /// Dim counts with ceiling headroom step up exactly once, gain first.
        #[test]
        fn prop_dim_steps_up_once(
            g in 0usize..GAIN_VALUES.len(),
            it in 0usize..INTEGRATION_MS.len(),
            clear in 0u32..12_000,
        ) {
            let state = ExposureState::new(g, it);
            prop_assume!(!(state.gain_at_ceiling() && state.integration_at_ceiling()));
            let adj = controller().adjust(state, clear);
            prop_assert!(adj.changed);
            let step = (adj.state.gain_index() - state.gain_index())
                + (adj.state.integration_index() - state.integration_index());
            prop_assert_eq!(step, 1);
            if !state.gain_at_ceiling() {
                prop_assert_eq!(adj.state.gain_index(), state.gain_index() + 1);
            }
        }

        /// Clipping counts with floor headroom step down exactly once, gain first.
        #[test]
        fn prop_clip_steps_down_once(
            g in 0usize..GAIN_VALUES.len(),
            it in 0usize..INTEGRATION_MS.len(),
            clear in 60_000u32..=u32::MAX,
        ) {
            let state = ExposureState::new(g, it);
            prop_assume!(!(state.gain_at_floor() && state.integration_at_floor()));
            let adj = controller().adjust(state, clear);
            prop_assert!(adj.changed);
            let step = (state.gain_index() - adj.state.gain_index())
                + (state.integration_index() - adj.state.integration_index());
            prop_assert_eq!(step, 1);
            if !state.gain_at_floor() {
                prop_assert_eq!(adj.state.gain_index(), state.gain_index() - 1);
            }
        }
    }
}
