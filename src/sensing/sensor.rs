//! Sensor abstraction for raw tristimulus reads.
//!
//! This module provides a trait-based abstraction over the physical
//! color sensors, allowing both real bus-attached hardware and mock
//! implementations for testing. Bus framing, multiplexer selection and
//! locking all live behind the trait: from the core's point of view a
//! read or an exposure write is a single atomic operation.

use super::sample::RawSample;
use crate::exposure::ExposureState;
use thiserror::Error;

/// Multiplexer channel identifier.
pub type ChannelId = u8;

/// Errors that can occur during sensor operations.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("bus transaction failed: {0}")]
    Bus(String),
    #[error("no sensor present on channel {0}")]
    NotPresent(ChannelId),
}

/// Trait for color sensor implementations.
///
/// One instance per multiplexer channel. Exposure state is owned by the
/// sensor; only the auto-exposure controller decides new values.
pub trait ColorSensor {
    /// Reads one raw red/green/blue/clear sample.
    fn read_raw(&mut self) -> Result<RawSample, SensorError>;

    /// Returns the current exposure parameters.
    fn exposure(&self) -> ExposureState;

    /// Applies new exposure parameters.
    ///
    /// Counts read before the settling delay has passed are not
    /// representative of the new settings.
    fn set_exposure(&mut self, state: ExposureState) -> Result<(), SensorError>;
}

/// Mock sensor producing deterministic synthetic readings.
///
/// Models a scene as per-channel photon flux (counts per millisecond at
/// unit gain); a read returns `flux × gain × integration_time` with
/// 16-bit saturation, so the auto-exposure loop behaves against it the
/// way it does against hardware.
#[derive(Debug, Clone)]
pub struct MockSensor {
    scene: [f64; 3],
    exposure: ExposureState,
}

/// ADC full scale for a 16-bit sensor.
const FULL_SCALE: f64 = 65_535.0;

impl MockSensor {
    /// Creates a mock observing the given scene flux.
    pub fn new(scene: [f64; 3]) -> Self {
        Self {
            scene,
            exposure: ExposureState::brightest(),
        }
    }

    /// Replaces the scene, simulating a lighting change.
    pub fn set_scene(&mut self, scene: [f64; 3]) {
        self.scene = scene;
    }

    fn count(&self, flux: f64) -> u32 {
        let exposure = self.exposure.gain() as f64 * self.exposure.integration_ms();
        (flux * exposure).clamp(0.0, FULL_SCALE).round() as u32
    }
}

impl ColorSensor for MockSensor {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let [r, g, b] = self.scene;
        Ok(RawSample::new(
            self.count(r),
            self.count(g),
            self.count(b),
            self.count(r + g + b),
        ))
    }

    fn exposure(&self) -> ExposureState {
        self.exposure
    }

    fn set_exposure(&mut self, state: ExposureState) -> Result<(), SensorError> {
        self.exposure = state;
        tracing::trace!(
            gain = state.gain(),
            integration_ms = state.integration_ms(),
            "mock exposure updated"
        );
        Ok(())
    }
}
