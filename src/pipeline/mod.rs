//! Color conversion pipeline.
//!
//! Pure functions turning raw tristimulus counts plus a calibration
//! record into perceptually usable sRGB values. No I/O, no hidden
//! state; safe to call concurrently for different channels.

mod math;
mod render;

pub use math::{
    gamma_encode, gamma_linearize, luma_chroma_basis, luma_chroma_basis_inv, scale_saturation,
    LUMA,
};
pub use render::{linear_rgb, render, Rgb8};
