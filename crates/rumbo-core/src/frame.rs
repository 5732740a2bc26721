//! Multichannel short-time spectra.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::{C, Error, Result};

/// One utterance's multichannel short-time spectra.
///
/// A 3-axis complex array indexed (channel, time-frame, frequency-bin),
/// produced once per utterance by an external STFT collaborator and
/// immutable to the engines that consume it.
#[derive(Debug, Clone)]
pub struct SpectralFrame {
    data: Array3<C>,
}

impl SpectralFrame {
    /// Wrap STFT output, rejecting any zero-length axis.
    pub fn new(data: Array3<C>) -> Result<Self> {
        let (channels, frames, bins) = data.dim();
        if channels == 0 {
            return Err(Error::EmptyAxis {
                axis: "channel",
                what: "spectra",
            });
        }
        if frames == 0 {
            return Err(Error::EmptyAxis {
                axis: "time-frame",
                what: "spectra",
            });
        }
        if bins == 0 {
            return Err(Error::EmptyAxis {
                axis: "frequency-bin",
                what: "spectra",
            });
        }
        Ok(Self { data })
    }

    /// Build a frame from per-channel (time-frame x frequency-bin) spectra.
    ///
    /// All channels must share a shape.
    pub fn from_channels(channels: Vec<Array2<C>>) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(Error::EmptyAxis {
                axis: "channel",
                what: "spectra",
            });
        };
        let (frames, bins) = first.dim();
        for ch in &channels {
            let (t, f) = ch.dim();
            if (t, f) != (frames, bins) {
                return Err(Error::SpectraShape {
                    frames: t,
                    bins: f,
                    expected_frames: frames,
                    expected_bins: bins,
                });
            }
        }
        let mut data = Array3::zeros((channels.len(), frames, bins));
        for (m, ch) in channels.iter().enumerate() {
            data.index_axis_mut(Axis(0), m).assign(ch);
        }
        Self::new(data)
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.data.dim().0
    }

    /// Number of time frames.
    pub fn frames(&self) -> usize {
        self.data.dim().1
    }

    /// Number of frequency bins.
    pub fn bins(&self) -> usize {
        self.data.dim().2
    }

    /// (channels, frames, bins) in one call.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Read-only view of the full (channel, frame, bin) array.
    pub fn view(&self) -> ArrayView3<'_, C> {
        self.data.view()
    }

    /// Read-only (frame, bin) view of one channel.
    ///
    /// # Panics
    /// Panics if `channel` is out of range.
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, C> {
        self.data.index_axis(Axis(0), channel)
    }

    /// Consume the frame, returning the underlying array.
    pub fn into_inner(self) -> Array3<C> {
        self.data
    }
}
