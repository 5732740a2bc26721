//! Auxiliary-function independent vector analysis (AuxIVA).
//!
//! Ono's stable update rules: each sweep majorizes the IVA objective with a
//! per-source auxiliary weight derived from the time-aggregated energy
//! envelope, then updates the demixing matrix one column at a time via a
//! weighted-covariance linear solve.

use nalgebra::{DMatrix, DVector};
use ndarray::Array3;
use tracing::debug;

use rumbo_core::{C, EPSILON, Error, Result, SpectralFrame};

/// Default number of demixing sweeps.
const DEFAULT_ITERATIONS: usize = 20;

/// AuxIVA blind source separation engine.
///
/// Consumes a mixture [`SpectralFrame`] with N channels and returns a frame
/// of identical shape holding N separated source estimates. Source
/// permutation and scale are left as the algorithm returns them; no
/// post-hoc alignment is performed.
///
/// The per-bin demixing matrices live only inside [`AuxIva::separate`];
/// nothing is retained between calls, so one engine value can serve any
/// number of utterances.
#[derive(Debug, Clone)]
pub struct AuxIva {
    iterations: usize,
    epsilon: f64,
}

impl Default for AuxIva {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            epsilon: EPSILON,
        }
    }
}

impl AuxIva {
    /// Engine with the default 20 sweeps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of demixing sweeps.
    ///
    /// Zero is accepted and leaves the identity demixing in place: the
    /// output equals the mixture.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the stabilizer added to per-frame source envelopes before
    /// taking their reciprocal. Keeps silent sources from dividing by zero.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Separate a multichannel mixture.
    ///
    /// A singular per-bin system (Wᴴ V) is a fatal numerical error for the
    /// whole utterance, reported as [`Error::SingularBin`] with the
    /// offending bin index. Near-silent sources are not errors; their
    /// auxiliary weights are epsilon-stabilized instead.
    pub fn separate(&self, mixture: &SpectralFrame) -> Result<SpectralFrame> {
        let (channels, frames, bins) = mixture.dim();
        let spectra = mixture.view();

        debug!(channels, frames, bins, iterations = self.iterations, "auxiva start");

        // Per-bin mixture matrices, channel x frame.
        let x_bins: Vec<DMatrix<C>> = (0..bins)
            .map(|f| DMatrix::from_fn(channels, frames, |m, t| spectra[[m, t, f]]))
            .collect();

        // Per-bin demixing matrices, identity to start.
        let mut w_bins: Vec<DMatrix<C>> = (0..bins)
            .map(|_| DMatrix::identity(channels, channels))
            .collect();

        let mut y_bins = demix(&x_bins, &w_bins);

        for sweep in 0..self.iterations {
            // Auxiliary weights: reciprocal of each source's per-frame
            // energy envelope aggregated over frequency.
            let weights = auxiliary_weights(&y_bins, channels, frames, self.epsilon);

            for (f, (x, w)) in x_bins.iter().zip(w_bins.iter_mut()).enumerate() {
                for n in 0..channels {
                    let v = weighted_covariance(x, &weights[n]);

                    // Solve (W^H V) w = e_n for the updated column.
                    let system = w.adjoint() * &v;
                    let mut rhs = DVector::<C>::zeros(channels);
                    rhs[n] = C::new(1.0, 0.0);
                    let col = system
                        .lu()
                        .solve(&rhs)
                        .ok_or(Error::SingularBin { bin: f })?;

                    // Rescale so w^H V w = 1 (the majorization bound's
                    // normalization), then install immediately: later
                    // columns in this bin must see this update.
                    let quad = col.dotc(&(&v * &col)).re;
                    if quad <= 0.0 || !quad.is_finite() {
                        return Err(Error::SingularBin { bin: f });
                    }
                    w.set_column(n, &col.unscale(quad.sqrt()));
                }
            }

            y_bins = demix(&x_bins, &w_bins);
            debug!(sweep = sweep + 1, "auxiva sweep done");
        }

        let mut out = Array3::<C>::zeros((channels, frames, bins));
        for (f, y) in y_bins.iter().enumerate() {
            for n in 0..channels {
                for t in 0..frames {
                    out[[n, t, f]] = y[(n, t)];
                }
            }
        }
        SpectralFrame::new(out)
    }
}

/// Y_f = W_f^H X_f per bin.
fn demix(x_bins: &[DMatrix<C>], w_bins: &[DMatrix<C>]) -> Vec<DMatrix<C>> {
    x_bins
        .iter()
        .zip(w_bins.iter())
        .map(|(x, w)| w.adjoint() * x)
        .collect()
}

/// Per-source, per-frame reciprocal energy envelopes: 1 / (R_n(t) + eps)
/// with R_n(t) = sqrt(sum over bins of |Y|^2).
fn auxiliary_weights(
    y_bins: &[DMatrix<C>],
    channels: usize,
    frames: usize,
    epsilon: f64,
) -> Vec<Vec<f64>> {
    let mut weights = vec![vec![0.0; frames]; channels];
    for (n, row) in weights.iter_mut().enumerate() {
        for (t, g) in row.iter_mut().enumerate() {
            let energy: f64 = y_bins.iter().map(|y| y[(n, t)].norm_sqr()).sum();
            *g = 1.0 / (energy.sqrt() + epsilon);
        }
    }
    weights
}

/// V = (1/T) * sum_t weight(t) * x(t) x(t)^H.
fn weighted_covariance(x: &DMatrix<C>, weights: &[f64]) -> DMatrix<C> {
    let (channels, frames) = x.shape();
    let mut v = DMatrix::<C>::zeros(channels, channels);
    for (t, &g) in weights.iter().enumerate() {
        let col = x.column(t);
        for i in 0..channels {
            for j in 0..channels {
                v[(i, j)] += col[i] * col[j].conj() * g;
            }
        }
    }
    v.unscale(frames as f64)
}
