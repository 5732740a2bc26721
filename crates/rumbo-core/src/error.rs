//! Error types shared by the rumbo engine crates.

use thiserror::Error;

/// Errors produced by the rumbo analysis engines.
///
/// Shape and configuration problems are reported before any numerical work
/// starts. [`Error::SingularBin`] is the one numerical failure: a singular
/// per-bin demixing solve. Engines fail whole-utterance; there is no
/// partial-output mode.
#[derive(Debug, Error)]
pub enum Error {
    /// An input array has a zero-length axis.
    #[error("empty {axis} axis in {what}")]
    EmptyAxis {
        /// Name of the offending axis.
        axis: &'static str,
        /// Name of the input the axis belongs to.
        what: &'static str,
    },

    /// Spectra and steering bank disagree on channel count.
    #[error("channel count mismatch: spectra have {spectra}, steering bank has {bank}")]
    ChannelMismatch {
        /// Channel count of the spectral frame.
        spectra: usize,
        /// Channel count of the steering vector bank.
        bank: usize,
    },

    /// Spectra and steering bank disagree on frequency-bin count.
    #[error("frequency bin mismatch: spectra have {spectra}, steering bank has {bank}")]
    BinMismatch {
        /// Bin count of the spectral frame.
        spectra: usize,
        /// Bin count of the steering vector bank.
        bank: usize,
    },

    /// A spatial method needs more channels than the frame provides.
    #[error("at least {needed} channels required, got {got}")]
    TooFewChannels {
        /// Minimum channel count for the operation.
        needed: usize,
        /// Channel count of the input.
        got: usize,
    },

    /// A channel-pair index points past the last channel.
    #[error("channel index {index} out of range for {channels} channels")]
    ChannelOutOfRange {
        /// The offending channel index.
        index: usize,
        /// Number of channels actually available.
        channels: usize,
    },

    /// A mask's frame/bin shape does not match the spectra.
    #[error("mask shape ({frames}, {bins}) does not match spectra ({expected_frames}, {expected_bins})")]
    MaskShape {
        /// Frame count of the mask.
        frames: usize,
        /// Bin count of the mask.
        bins: usize,
        /// Frame count of the spectra.
        expected_frames: usize,
        /// Bin count of the spectra.
        expected_bins: usize,
    },

    /// Linear-array topology length differs from the channel count.
    #[error("topology has {positions} microphone positions but spectra have {channels} channels")]
    TopologyMismatch {
        /// Number of microphone positions supplied.
        positions: usize,
        /// Channel count of the spectra.
        channels: usize,
    },

    /// SRP localization was invoked without its channel-pair list.
    #[error("SRP localization requires a non-empty channel pair list")]
    MissingSrpPairs,

    /// Two spectra that must share a shape do not.
    #[error("spectra shape ({frames}, {bins}) does not match reference ({expected_frames}, {expected_bins})")]
    SpectraShape {
        /// Frame count of the offending spectra.
        frames: usize,
        /// Bin count of the offending spectra.
        bins: usize,
        /// Expected frame count.
        expected_frames: usize,
        /// Expected bin count.
        expected_bins: usize,
    },

    /// Oracle masking was invoked with no target spectra.
    #[error("oracle masking requires at least one target spectrum")]
    NoTargets,

    /// The per-bin demixing system could not be solved.
    #[error("singular demixing system at frequency bin {bin}")]
    SingularBin {
        /// Index of the frequency bin whose solve failed.
        bin: usize,
    },
}

/// Convenience result type for rumbo operations.
pub type Result<T> = std::result::Result<T, Error>;
