//! SRP-PHAT angular spectrum for a linear microphone array.

use ndarray::Array2;
use tracing::debug;

use rumbo_core::{Error, Result, SpectralFrame};

/// Configuration for [`srp_phat_linear`].
#[derive(Debug, Clone)]
pub struct SrpPhatConfig {
    /// Waveform sample rate in Hz.
    pub sample_rate: f64,
    /// Number of candidate directions sampled over [0, 180] degrees.
    pub num_doa: usize,
    /// Sample candidates uniformly in TDOA space instead of angle.
    ///
    /// Uniform angular sampling oversamples the end-fire regions of a
    /// linear array; TDOA-uniform sampling matches the array's physical
    /// resolution. The choice is a modeling decision left to the caller.
    pub sample_tdoa: bool,
    /// Speed of sound in m/s.
    pub sound_speed: f64,
}

impl Default for SrpPhatConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000.0,
            num_doa: 181,
            sample_tdoa: false,
            sound_speed: 340.0,
        }
    }
}

/// Steered-response-power (phase transform) angular spectrum.
///
/// `topo` lists the microphone positions in meters along the array axis,
/// one per channel, in channel order. For every time frame the observed
/// interchannel phase differences of all microphone pairs are compared
/// against the plane-wave delays of each candidate direction; the result
/// is a (frames, num_doa) response map whose per-frame argmax is the
/// dominant direction.
pub fn srp_phat_linear(
    frame: &SpectralFrame,
    topo: &[f64],
    config: &SrpPhatConfig,
) -> Result<Array2<f64>> {
    let (channels, frames, bins) = frame.dim();
    if channels < 2 {
        return Err(Error::TooFewChannels {
            needed: 2,
            got: channels,
        });
    }
    if topo.len() != channels {
        return Err(Error::TopologyMismatch {
            positions: topo.len(),
            channels,
        });
    }
    if config.num_doa == 0 {
        return Err(Error::EmptyAxis {
            axis: "direction",
            what: "srp candidate grid",
        });
    }

    let pairs: Vec<(usize, usize)> = (0..channels)
        .flat_map(|i| (i + 1..channels).map(move |j| (i, j)))
        .collect();
    let distances: Vec<f64> = pairs
        .iter()
        .map(|&(i, j)| (topo[j] - topo[i]).abs())
        .collect();
    let max_distance = distances.iter().fold(0.0f64, |a, &b| a.max(b));

    debug!(
        channels,
        frames,
        bins,
        num_doa = config.num_doa,
        sample_tdoa = config.sample_tdoa,
        "srp-phat angular spectrum"
    );

    // Candidate delay per (direction, pair), in seconds.
    let num_doa = config.num_doa;
    let grid_step = if num_doa > 1 { (num_doa - 1) as f64 } else { 1.0 };
    let delays: Vec<Vec<f64>> = (0..num_doa)
        .map(|a| {
            if config.sample_tdoa {
                // Uniform in TDOA of the widest pair, scaled per pair.
                let tau_max = max_distance / config.sound_speed;
                let tau = -tau_max + 2.0 * tau_max * a as f64 / grid_step;
                distances
                    .iter()
                    .map(|&d| {
                        if max_distance > 0.0 {
                            tau * d / max_distance
                        } else {
                            0.0
                        }
                    })
                    .collect()
            } else {
                // Uniform in angle over [0, pi].
                let theta = std::f64::consts::PI * a as f64 / grid_step;
                distances
                    .iter()
                    .map(|&d| d * theta.cos() / config.sound_speed)
                    .collect()
            }
        })
        .collect();

    // One-sided spectrum: bin f sits at f * sr / nfft.
    let nfft = (2 * bins.saturating_sub(1)).max(1) as f64;
    let omega: Vec<f64> = (0..bins)
        .map(|f| std::f64::consts::TAU * f as f64 * config.sample_rate / nfft)
        .collect();

    let spectra = frame.view();
    let mut out = Array2::zeros((frames, num_doa));
    let cells = (pairs.len() * bins) as f64;
    for t in 0..frames {
        for (a, taus) in delays.iter().enumerate() {
            let mut acc = 0.0;
            for (p, &(i, j)) in pairs.iter().enumerate() {
                for f in 0..bins {
                    let observed =
                        spectra[[i, t, f]].arg() - spectra[[j, t, f]].arg();
                    acc += (observed - omega[f] * taus[p]).cos();
                }
            }
            out[[t, a]] = acc / cells;
        }
    }
    Ok(out)
}
