//! Sensor input and raw sample handling.
//!
//! This module provides abstractions for reading raw tristimulus
//! counts from per-channel color sensors and for configuring the
//! acquisition loop. The physical bus and multiplexer are external
//! collaborators hidden behind the [`ColorSensor`] trait.

mod config;
mod sample;
mod sensor;

pub use config::{CaptureConfig, ConfigError, FileConfig, OutputConfig};
pub use sample::RawSample;
pub use sensor::{ChannelId, ColorSensor, MockSensor, SensorError};
