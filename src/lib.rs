//! Chromasense Library
//!
//! Calibrated multi-channel color sensing. Converts raw tristimulus
//! counts from per-channel optical sensors into perceptually usable
//! sRGB values while keeping each sensor's raw signal inside a usable
//! dynamic range.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! sensing → exposure control → re-read → pipeline → RGB8
//!                                            ↑
//!                            calibration (store, WB, CCM)
//! ```
//!
//! # Design Principles
//!
//! - **Pure core**: exposure decisions and color rendering are pure
//!   functions; all I/O and blocking lives at the edges
//! - **Status, not retry**: exposure-limit and clipping conditions are
//!   surfaced to the caller, never retried internally
//! - **Whole-record calibration updates**: calibration changes replace
//!   the channel's record atomically through the store
//! - **Fixed-size math**: all color operations are dimension 3, using
//!   fixed-size vectors and matrices
//!
//! # Example
//!
//! ```
//! use chromasense::{
//!     calibration::{CalibrationStore, MemoryStore},
//!     exposure::ExposureThresholds,
//!     pipeline,
//!     reader::ChannelReader,
//!     sensing::MockSensor,
//! };
//! use std::time::Duration;
//!
//! let sensor = MockSensor::new([6.0, 8.0, 5.0]);
//! let mut reader = ChannelReader::new(
//!     sensor,
//!     ExposureThresholds::default(),
//!     Duration::from_millis(10),
//! );
//! let store = MemoryStore::new();
//!
//! // Drive a few cycles; the controller walks exposure into band.
//! for _ in 0..8 {
//!     let acq = reader.acquire().unwrap();
//!     let cal = store.load_or_default(0);
//!     let rgb = pipeline::render(&acq.sample, &cal);
//!     println!("{} ({})", rgb.hex(), acq.status);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod calibration;
pub mod exposure;
pub mod pipeline;
pub mod reader;
pub mod sensing;

// Re-export commonly used types at crate root
pub use calibration::{CalibrationRecord, CalibrationStore, CcmSession, MemoryStore};
pub use exposure::{AutoExposure, ExposureState, ExposureThresholds, SignalStatus};
pub use pipeline::{render, Rgb8};
pub use reader::{Acquisition, ChannelReader};
pub use sensing::{ChannelId, ColorSensor, MockSensor, RawSample};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
