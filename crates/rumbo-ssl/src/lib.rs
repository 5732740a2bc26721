//! Rumbo SSL - spatial features and sound source localization
//!
//! This crate turns multichannel short-time spectra into directional
//! information:
//!
//! - [`spatial`] - per-time-frequency directional features: interchannel
//!   phase difference ([`ipd`]) and magnitude-squared coherence ([`msc`])
//! - [`srp`] - steered-response-power angular spectrum for a linear array
//!   ([`srp_phat_linear`])
//! - [`locate`] - direction-of-arrival estimation against a steering
//!   vector bank: maximum likelihood, SRP, and MUSIC, unified behind
//!   [`DoaEstimator`]
//!
//! Estimators return indices into the bank's candidate-direction grid;
//! mapping an index back to an angle is the caller's concern.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rumbo_core::TfMask;
//! use rumbo_ssl::{DoaEstimator, MlConfig};
//!
//! let estimator = DoaEstimator::Ml(MlConfig::default());
//! let doa = estimator.estimate(&frame, &bank, None)?;
//! println!("direction index: {}", doa[0]);
//! ```

pub mod locate;
pub mod spatial;
pub mod srp;

pub use locate::{DoaEstimator, MlConfig, ml_doa, ml_scores, music_doa, music_spectrum, srp_doa};
pub use spatial::{IpdConfig, ipd, msc};
pub use srp::{SrpPhatConfig, srp_phat_linear};
