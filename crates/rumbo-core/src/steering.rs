//! Steering vector banks over a candidate-direction grid.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis};

use crate::frame::SpectralFrame;
use crate::{C, EPSILON, Error, Result};

/// Expected per-channel, per-frequency plane-wave response for each
/// candidate direction, indexed (direction, channel, frequency-bin).
///
/// The bank is externally supplied; rumbo validates its shape against the
/// spectra it is scored with but never constructs steering vectors itself.
/// The ordered direction axis defines the output alphabet of the DOA
/// estimators: they return indices into it, not angles.
#[derive(Debug, Clone)]
pub struct SteeringVectorBank {
    data: Array3<C>,
}

impl SteeringVectorBank {
    /// Wrap a (direction, channel, bin) array, rejecting zero-length axes.
    pub fn new(data: Array3<C>) -> Result<Self> {
        let (directions, channels, bins) = data.dim();
        if directions == 0 {
            return Err(Error::EmptyAxis {
                axis: "direction",
                what: "steering bank",
            });
        }
        if channels == 0 {
            return Err(Error::EmptyAxis {
                axis: "channel",
                what: "steering bank",
            });
        }
        if bins == 0 {
            return Err(Error::EmptyAxis {
                axis: "frequency-bin",
                what: "steering bank",
            });
        }
        Ok(Self { data })
    }

    /// Number of candidate directions.
    pub fn directions(&self) -> usize {
        self.data.dim().0
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.data.dim().1
    }

    /// Number of frequency bins.
    pub fn bins(&self) -> usize {
        self.data.dim().2
    }

    /// Read-only view of the full (direction, channel, bin) array.
    pub fn view(&self) -> ArrayView3<'_, C> {
        self.data.view()
    }

    /// Read-only (channel, bin) view of one candidate direction.
    ///
    /// # Panics
    /// Panics if `direction` is out of range.
    pub fn direction(&self, direction: usize) -> ArrayView2<'_, C> {
        self.data.index_axis(Axis(0), direction)
    }

    /// Check that channel and bin axes match the given spectra exactly.
    pub fn validate_against(&self, frame: &SpectralFrame) -> Result<()> {
        if self.channels() != frame.channels() {
            return Err(Error::ChannelMismatch {
                spectra: frame.channels(),
                bank: self.channels(),
            });
        }
        if self.bins() != frame.bins() {
            return Err(Error::BinMismatch {
                spectra: frame.bins(),
                bank: self.bins(),
            });
        }
        Ok(())
    }

    /// Copy of the bank with every (direction, bin) vector scaled to unit
    /// norm across the channel axis.
    ///
    /// Idempotent: vectors that are already unit-norm come back unchanged
    /// (up to rounding). Zero vectors are left as-is via an epsilon guard.
    pub fn normalized(&self) -> Array3<C> {
        let (directions, channels, bins) = self.data.dim();
        let mut out = self.data.clone();
        for a in 0..directions {
            for f in 0..bins {
                let norm = (0..channels)
                    .map(|m| self.data[[a, m, f]].norm_sqr())
                    .sum::<f64>()
                    .sqrt();
                if norm > EPSILON {
                    for m in 0..channels {
                        out[[a, m, f]] = self.data[[a, m, f]] / norm;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    #[test]
    fn rejects_empty_axes() {
        assert!(SteeringVectorBank::new(Array3::<C>::zeros((0, 2, 8))).is_err());
        assert!(SteeringVectorBank::new(Array3::<C>::zeros((3, 0, 8))).is_err());
        assert!(SteeringVectorBank::new(Array3::<C>::zeros((3, 2, 0))).is_err());
    }

    #[test]
    fn validate_against_reports_axis() {
        let frame = SpectralFrame::new(Array3::<C>::from_elem((2, 4, 8), C::new(1.0, 0.0))).unwrap();
        let bank = SteeringVectorBank::new(Array3::<C>::from_elem((5, 3, 8), C::new(1.0, 0.0))).unwrap();
        assert!(matches!(
            bank.validate_against(&frame),
            Err(Error::ChannelMismatch { spectra: 2, bank: 3 })
        ));

        let bank = SteeringVectorBank::new(Array3::<C>::from_elem((5, 2, 9), C::new(1.0, 0.0))).unwrap();
        assert!(matches!(
            bank.validate_against(&frame),
            Err(Error::BinMismatch { spectra: 8, bank: 9 })
        ));
    }

    #[test]
    fn normalized_gives_unit_channel_norm() {
        let data = Array3::from_shape_fn((2, 3, 4), |(a, m, f)| {
            C::new(1.0 + a as f64 + m as f64, f as f64 - 1.0)
        });
        let bank = SteeringVectorBank::new(data).unwrap();
        let sv = bank.normalized();
        for a in 0..2 {
            for f in 0..4 {
                let norm: f64 = (0..3).map(|m| sv[[a, m, f]].norm_sqr()).sum();
                assert!((norm - 1.0).abs() < 1e-12, "norm^2 = {norm}");
            }
        }
    }

    #[test]
    fn normalized_is_idempotent() {
        let data = Array3::from_shape_fn((2, 2, 3), |(a, m, f)| {
            C::new((a + m) as f64 + 0.5, f as f64 * 0.25)
        });
        let bank = SteeringVectorBank::new(data).unwrap();
        let once = SteeringVectorBank::new(bank.normalized()).unwrap();
        let twice = once.normalized();
        for (x, y) in once.view().iter().zip(twice.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }
}
