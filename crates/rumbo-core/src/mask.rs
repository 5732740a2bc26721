//! Time-frequency masks.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::{Error, Result};

/// Real-valued weighting of time-frequency cells, values conceptually in
/// [0, 1] (not enforced).
///
/// [`TfMask::Single`] weights every cell once; [`TfMask::PerSource`] carries
/// a leading source axis so one call can score several sources at once.
/// Estimators that receive no mask build the uniform all-ones default
/// internally.
#[derive(Debug, Clone)]
pub enum TfMask {
    /// One (frame, bin) weight matrix.
    Single(Array2<f64>),
    /// One (frame, bin) weight matrix per source.
    PerSource(Array3<f64>),
}

impl TfMask {
    /// All-ones mask: uniform weighting, the default when no mask is given.
    pub fn uniform(frames: usize, bins: usize) -> Self {
        Self::Single(Array2::ones((frames, bins)))
    }

    /// Number of sources the mask scores (1 for [`TfMask::Single`]).
    pub fn num_sources(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::PerSource(m) => m.dim().0,
        }
    }

    /// Check the frame/bin axes against the spectra they will weight.
    pub fn validate(&self, frames: usize, bins: usize) -> Result<()> {
        let (t, f) = match self {
            Self::Single(m) => m.dim(),
            Self::PerSource(m) => {
                let (_, t, f) = m.dim();
                (t, f)
            }
        };
        if (t, f) != (frames, bins) {
            return Err(Error::MaskShape {
                frames: t,
                bins: f,
                expected_frames: frames,
                expected_bins: bins,
            });
        }
        Ok(())
    }

    /// (frame, bin) view of the weights for one source.
    ///
    /// # Panics
    /// Panics if `source` is out of range.
    pub fn source(&self, source: usize) -> ArrayView2<'_, f64> {
        match self {
            Self::Single(m) => {
                assert_eq!(source, 0, "single mask has exactly one source");
                m.view()
            }
            Self::PerSource(m) => m.index_axis(Axis(0), source),
        }
    }
}
