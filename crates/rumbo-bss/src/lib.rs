//! Rumbo BSS - blind source separation for microphone arrays
//!
//! - [`AuxIva`] - auxiliary-function independent vector analysis: estimates
//!   a per-frequency-bin demixing matrix from the mixture spectra alone and
//!   returns separated per-source spectra
//! - [`oracle`] - oracle time-frequency masks (IBM/IRM/IAM/PSM) computed
//!   from known target spectra, for reference separation and upper bounds
//!
//! ## Example
//!
//! ```rust,ignore
//! use rumbo_bss::AuxIva;
//!
//! // mixture: SpectralFrame from the STFT collaborator, N channels
//! let separated = AuxIva::new().iterations(20).separate(&mixture)?;
//! // separated: same shape, one source estimate per channel slot,
//! // permutation and scale as returned by the algorithm
//! ```

mod auxiva;
pub mod oracle;

pub use auxiva::AuxIva;
pub use oracle::{OracleMask, apply_mask, oracle_masks};
