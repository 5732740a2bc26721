//! Per-time-frequency spatial features: IPD and MSC.

use ndarray::Array2;

use rumbo_core::{C, EPSILON, Error, Result, SpectralFrame};

/// IPD encoding options.
///
/// Raw phase difference by default. `cos` maps each angle through cosine
/// for circular continuity; `sin` additionally appends the sine half along
/// the frequency axis (only meaningful together with `cos`).
#[derive(Debug, Clone, Copy, Default)]
pub struct IpdConfig {
    /// Encode the phase difference as its cosine.
    pub cos: bool,
    /// Append the sine encoding after the cosine (requires `cos`).
    pub sin: bool,
}

/// Interchannel phase difference features.
///
/// For each ordered channel pair (L, R) computes the (frame, bin) matrix
/// of angle(X_L) - angle(X_R), encoded per `config`. Pairs are
/// concatenated along the frequency axis in the order given, so the result
/// is (frames, pairs * bins) - or twice that bin width with the sine
/// encoding appended.
pub fn ipd(
    frame: &SpectralFrame,
    pairs: &[(usize, usize)],
    config: IpdConfig,
) -> Result<Array2<f64>> {
    let (channels, frames, bins) = frame.dim();
    if channels < 2 {
        return Err(Error::TooFewChannels {
            needed: 2,
            got: channels,
        });
    }
    if pairs.is_empty() {
        return Err(Error::EmptyAxis {
            axis: "pair",
            what: "ipd channel pairs",
        });
    }
    for &(l, r) in pairs {
        for index in [l, r] {
            if index >= channels {
                return Err(Error::ChannelOutOfRange { index, channels });
            }
        }
    }

    let spectra = frame.view();
    let pair_width = if config.cos && config.sin { 2 * bins } else { bins };
    let mut out = Array2::zeros((frames, pairs.len() * pair_width));

    for (p, &(l, r)) in pairs.iter().enumerate() {
        let offset = p * pair_width;
        for t in 0..frames {
            for f in 0..bins {
                let angle = spectra[[l, t, f]].arg() - spectra[[r, t, f]].arg();
                if config.cos {
                    out[[t, offset + f]] = angle.cos();
                    if config.sin {
                        out[[t, offset + bins + f]] = angle.sin();
                    }
                } else {
                    out[[t, offset + f]] = angle;
                }
            }
        }
    }
    Ok(out)
}

/// Magnitude-squared coherence across channels.
///
/// Per (frame, bin) cell, estimates how correlated the channels are by
/// smoothing cross- and auto-spectra over `context` neighbouring frames on
/// each side (clamped at the utterance edges), then averaging the
/// coherence of every unordered channel pair. Values land in [0, 1].
pub fn msc(frame: &SpectralFrame, context: usize) -> Result<Array2<f64>> {
    let (channels, frames, bins) = frame.dim();
    if channels < 2 {
        return Err(Error::TooFewChannels {
            needed: 2,
            got: channels,
        });
    }

    let spectra = frame.view();
    let num_pairs = channels * (channels - 1) / 2;
    let mut out = Array2::zeros((frames, bins));

    for t in 0..frames {
        let lo = t.saturating_sub(context);
        let hi = (t + context + 1).min(frames);
        for f in 0..bins {
            let mut coherence = 0.0;
            for i in 0..channels {
                for j in i + 1..channels {
                    let mut cross = C::new(0.0, 0.0);
                    let mut power_i = 0.0;
                    let mut power_j = 0.0;
                    for tau in lo..hi {
                        let xi = spectra[[i, tau, f]];
                        let xj = spectra[[j, tau, f]];
                        cross += xi * xj.conj();
                        power_i += xi.norm_sqr();
                        power_j += xj.norm_sqr();
                    }
                    coherence += cross.norm_sqr() / (power_i * power_j + EPSILON);
                }
            }
            out[[t, f]] = coherence / num_pairs as f64;
        }
    }
    Ok(out)
}
