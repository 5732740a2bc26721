//! Oracle time-frequency masks from known target spectra.
//!
//! Given the mixture spectrum and each speaker's clean spectrum (same STFT
//! configuration), these masks give reference separations and performance
//! upper bounds for mask-based systems.

use ndarray::{Array2, ArrayView2};

use rumbo_core::{C, EPSILON, Error, Result};

/// Oracle mask families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMask {
    /// Ideal binary mask: 1 where the speaker dominates all others.
    Ibm,
    /// Ideal ratio mask: |target| over the summed target magnitudes.
    Irm,
    /// Ideal amplitude mask: |target| over the mixture magnitude.
    Iam,
    /// Phase-sensitive mask: IAM weighted by the cosine of the
    /// mixture-target phase gap.
    Psm,
}

/// Compute one oracle mask per target speaker.
///
/// `mixture` and every entry of `targets` are (frame, bin) spectra of one
/// reference channel and must share a shape. Returns masks in target order.
/// IBM masks are exactly 0/1; the ratio masks are epsilon-stabilized, so
/// near-silent cells stay finite rather than erroring.
pub fn oracle_masks(
    mixture: ArrayView2<'_, C>,
    targets: &[ArrayView2<'_, C>],
    kind: OracleMask,
) -> Result<Vec<Array2<f64>>> {
    if targets.is_empty() {
        return Err(Error::NoTargets);
    }
    let (frames, bins) = mixture.dim();
    for target in targets {
        let (t, f) = target.dim();
        if (t, f) != (frames, bins) {
            return Err(Error::SpectraShape {
                frames: t,
                bins: f,
                expected_frames: frames,
                expected_bins: bins,
            });
        }
    }

    match kind {
        OracleMask::Ibm => {
            let masks = targets
                .iter()
                .enumerate()
                .map(|(s, _)| {
                    Array2::from_shape_fn((frames, bins), |(t, f)| {
                        let winner = targets
                            .iter()
                            .enumerate()
                            .max_by(|(_, a), (_, b)| {
                                a[[t, f]].norm().partial_cmp(&b[[t, f]].norm()).unwrap()
                            })
                            .map(|(i, _)| i)
                            .unwrap();
                        if winner == s { 1.0 } else { 0.0 }
                    })
                })
                .collect();
            Ok(masks)
        }
        OracleMask::Irm => {
            let denom = Array2::from_shape_fn((frames, bins), |(t, f)| {
                targets.iter().map(|x| x[[t, f]].norm()).sum::<f64>() + EPSILON
            });
            Ok(targets
                .iter()
                .map(|x| {
                    Array2::from_shape_fn((frames, bins), |(t, f)| x[[t, f]].norm() / denom[[t, f]])
                })
                .collect())
        }
        OracleMask::Iam => Ok(targets
            .iter()
            .map(|x| {
                Array2::from_shape_fn((frames, bins), |(t, f)| {
                    x[[t, f]].norm() / (mixture[[t, f]].norm() + EPSILON)
                })
            })
            .collect()),
        OracleMask::Psm => Ok(targets
            .iter()
            .map(|x| {
                Array2::from_shape_fn((frames, bins), |(t, f)| {
                    let gap = mixture[[t, f]].arg() - x[[t, f]].arg();
                    x[[t, f]].norm() * gap.cos() / (mixture[[t, f]].norm() + EPSILON)
                })
            })
            .collect()),
    }
}

/// Weight a complex spectrum by a real mask elementwise.
pub fn apply_mask(spectrum: ArrayView2<'_, C>, mask: ArrayView2<'_, f64>) -> Result<Array2<C>> {
    let (frames, bins) = spectrum.dim();
    if mask.dim() != (frames, bins) {
        let (t, f) = mask.dim();
        return Err(Error::MaskShape {
            frames: t,
            bins: f,
            expected_frames: frames,
            expected_bins: bins,
        });
    }
    Ok(Array2::from_shape_fn((frames, bins), |(t, f)| {
        spectrum[[t, f]] * mask[[t, f]]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(frames: usize, bins: usize, seed: f64) -> Array2<C> {
        Array2::from_shape_fn((frames, bins), |(t, f)| {
            let phase = seed * (t as f64 + 1.0) + 0.4 * f as f64;
            let mag = seed + (t + f) as f64 * 0.1;
            C::new(mag * phase.cos(), mag * phase.sin())
        })
    }

    #[test]
    fn irm_sums_to_one_over_speakers() {
        let a = spectrum(4, 6, 1.0);
        let b = spectrum(4, 6, 2.5);
        let mix = &a + &b;
        let masks = oracle_masks(mix.view(), &[a.view(), b.view()], OracleMask::Irm).unwrap();
        for t in 0..4 {
            for f in 0..6 {
                let total: f64 = masks.iter().map(|m| m[[t, f]]).sum();
                assert!((total - 1.0).abs() < 1e-6, "sum = {total}");
            }
        }
    }

    #[test]
    fn ibm_is_one_hot() {
        let a = spectrum(5, 3, 0.8);
        let b = spectrum(5, 3, 1.7);
        let mix = &a + &b;
        let masks = oracle_masks(mix.view(), &[a.view(), b.view()], OracleMask::Ibm).unwrap();
        for t in 0..5 {
            for f in 0..3 {
                let total: f64 = masks.iter().map(|m| m[[t, f]]).sum();
                assert_eq!(total, 1.0);
                assert!(masks.iter().all(|m| m[[t, f]] == 0.0 || m[[t, f]] == 1.0));
            }
        }
    }

    #[test]
    fn psm_recovers_aligned_target() {
        // Target in phase with the mixture: PSM equals IAM.
        let a = spectrum(3, 4, 1.2);
        let psm = oracle_masks(a.view(), &[a.view()], OracleMask::Psm).unwrap();
        let iam = oracle_masks(a.view(), &[a.view()], OracleMask::Iam).unwrap();
        for (p, i) in psm[0].iter().zip(iam[0].iter()) {
            assert!((p - i).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_empty_targets_and_bad_shapes() {
        let mix = spectrum(3, 4, 1.0);
        assert!(matches!(
            oracle_masks(mix.view(), &[], OracleMask::Irm),
            Err(Error::NoTargets)
        ));
        let bad = spectrum(3, 5, 1.0);
        assert!(matches!(
            oracle_masks(mix.view(), &[bad.view()], OracleMask::Irm),
            Err(Error::SpectraShape { .. })
        ));
    }

    #[test]
    fn apply_mask_checks_shape() {
        let mix = spectrum(3, 4, 1.0);
        let mask = Array2::from_elem((3, 4), 0.5);
        let out = apply_mask(mix.view(), mask.view()).unwrap();
        assert!((out[[1, 2]] - mix[[1, 2]] * 0.5).norm() < 1e-12);

        let bad = Array2::from_elem((2, 4), 0.5);
        assert!(apply_mask(mix.view(), bad.view()).is_err());
    }
}
