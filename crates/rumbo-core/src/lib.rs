//! Rumbo Core - shared data model for microphone-array speech processing
//!
//! This crate defines the types the analysis engines operate on:
//!
//! - [`SpectralFrame`] - multichannel short-time spectra, indexed
//!   (channel, time-frame, frequency-bin)
//! - [`SteeringVectorBank`] - expected array response per candidate
//!   direction, indexed (direction, channel, frequency-bin)
//! - [`TfMask`] - real-valued time-frequency weighting, with or without a
//!   per-source axis
//! - [`Error`] / [`Result`] - the shared error taxonomy
//!
//! All spectra are `Complex<f64>` (aliased as [`C`]). Engines never mutate
//! their inputs; they return new arrays or frames.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array3;
//! use rumbo_core::{C, SpectralFrame};
//!
//! // 2 channels, 10 frames, 33 bins of silence
//! let frame = SpectralFrame::new(Array3::<C>::zeros((2, 10, 33))).unwrap();
//! assert_eq!(frame.channels(), 2);
//! assert_eq!(frame.bins(), 33);
//! ```

mod error;
mod frame;
mod mask;
mod steering;

pub use error::{Error, Result};
pub use frame::SpectralFrame;
pub use mask::TfMask;
pub use steering::SteeringVectorBank;

/// Complex short-time spectral coefficient type used throughout rumbo.
pub type C = num_complex::Complex<f64>;

/// Additive stabilizer applied to denominators and log arguments that may
/// sit at or near zero for silent time-frequency cells.
pub const EPSILON: f64 = 1e-8;
