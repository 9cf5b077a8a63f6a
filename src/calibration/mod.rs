//! Per-channel color calibration.
//!
//! The calibration record (white balance, color-correction matrix,
//! gamma, saturation) and the procedures that update it: gray-world
//! white-balance estimation and least-squares CCM fitting. Updates go
//! through the store as whole-record replacements; concurrent
//! calibration of the same channel must be serialized by the caller.

mod ccm;
mod record;
mod store;
pub mod white_balance;

pub use ccm::{
    fit, CcmError, CcmSession, PatchSample, ReferencePatch, MIN_PATCHES, REFERENCE_PATCHES,
};
pub use record::{
    CalibrationRecord, ADJUST_STEP, GAMMA_BAND, SATURATION_BAND, WB_BAND,
};
pub use store::{CalibrationStore, MemoryStore, StoreError};
pub use white_balance::WhiteBalanceError;
