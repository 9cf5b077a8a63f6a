//! Discrete auto-exposure control.
//!
//! Keeps each sensor's raw clear-channel signal inside a usable band by
//! stepping gain and integration time along fixed lattices. Decisions
//! are pure; applying them to hardware is the caller's concern.

mod controller;
mod lattice;

pub use controller::{
    Adjustment, AutoExposure, ExposureThresholds, SignalStatus, ThresholdError,
};
pub use lattice::{ExposureState, GAIN_VALUES, INTEGRATION_MS};
