//! Integration tests for rumbo-ssl.
//!
//! A synthetic uniform linear array with an exactly-gridded plane-wave
//! source: all three estimators must agree on the true direction, MUSIC
//! must show a null there, and the scoring must be invariant to steering
//! vector scale and obey single-cell masks.

use ndarray::{Array2, Array3};
use rumbo_core::{C, SpectralFrame, SteeringVectorBank, TfMask};
use rumbo_ssl::{DoaEstimator, MlConfig, ml_scores, music_spectrum, srp_doa};

const CHANNELS: usize = 4;
const FRAMES: usize = 8;
const BINS: usize = 33;
const DIRECTIONS: usize = 19; // 0..=180 degrees in 10 degree steps

const SAMPLE_RATE: f64 = 16000.0;
const SOUND_SPEED: f64 = 340.0;
const SPACING: f64 = 0.05;

fn omega(f: usize) -> f64 {
    let nfft = (2 * (BINS - 1)) as f64;
    std::f64::consts::TAU * f as f64 * SAMPLE_RATE / nfft
}

/// Plane-wave steering bank for the uniform linear array.
fn steering_bank() -> SteeringVectorBank {
    let data = Array3::from_shape_fn((DIRECTIONS, CHANNELS, BINS), |(a, m, f)| {
        let theta = std::f64::consts::PI * a as f64 / (DIRECTIONS - 1) as f64;
        let delay = m as f64 * SPACING * theta.cos() / SOUND_SPEED;
        let phase = -omega(f) * delay;
        C::new(phase.cos(), phase.sin())
    });
    SteeringVectorBank::new(data).unwrap()
}

/// Noise-free observation of a single source at grid index `direction`,
/// with a deterministic pseudo-random source spectrum.
fn single_source_frame(bank: &SteeringVectorBank, direction: usize) -> SpectralFrame {
    let mut state = 0xDEAD_BEEFu32;
    let mut noise = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as i32 as f64) / (i32::MAX as f64)
    };
    let mut data = Array3::<C>::zeros((CHANNELS, FRAMES, BINS));
    for t in 0..FRAMES {
        for f in 0..BINS {
            let mag = 1.0 + 0.5 * noise().abs();
            let phase = std::f64::consts::PI * noise();
            let source = C::new(mag * phase.cos(), mag * phase.sin());
            for m in 0..CHANNELS {
                data[[m, t, f]] = bank.view()[[direction, m, f]] * source;
            }
        }
    }
    SpectralFrame::new(data).unwrap()
}

#[test]
fn all_estimators_agree_on_a_gridded_source() {
    let bank = steering_bank();
    let truth = 6; // 60 degrees
    let frame = single_source_frame(&bank, truth);

    let ml = DoaEstimator::Ml(MlConfig::default())
        .estimate(&frame, &bank, None)
        .unwrap();
    assert_eq!(ml, vec![truth]);

    let pairs: Vec<(usize, usize)> = (1..CHANNELS).map(|m| (0, m)).collect();
    let srp = DoaEstimator::Srp { pairs }
        .estimate(&frame, &bank, None)
        .unwrap();
    assert_eq!(srp, vec![truth]);

    let music = DoaEstimator::Music.estimate(&frame, &bank, None).unwrap();
    assert_eq!(music, vec![truth]);
}

#[test]
fn music_null_sits_at_the_source() {
    let bank = steering_bank();
    let truth = 4; // 40 degrees
    let frame = single_source_frame(&bank, truth);

    let spectrum = music_spectrum(&frame, &bank, None).unwrap();
    assert_eq!(spectrum.len(), DIRECTIONS);

    // Noise-free single source: the projection energy at the true index is
    // numerically zero and the global minimum.
    assert!(spectrum[truth] < 1e-6, "null energy {}", spectrum[truth]);
    for (a, &energy) in spectrum.iter().enumerate() {
        if a != truth {
            assert!(
                energy > spectrum[truth],
                "direction {a} ({energy}) undercuts the null"
            );
        }
    }
}

#[test]
fn ml_scores_ignore_steering_vector_scale() {
    let bank = steering_bank();
    let frame = single_source_frame(&bank, 9);

    // Scale every (direction, bin) vector by its own arbitrary non-zero
    // complex factor; unit normalization must erase the difference.
    let scaled = Array3::from_shape_fn((DIRECTIONS, CHANNELS, BINS), |(a, m, f)| {
        let gain = 0.5 + a as f64 * 0.37 + f as f64 * 0.11;
        let rot = 0.3 * (a + f) as f64;
        bank.view()[[a, m, f]] * C::new(gain * rot.cos(), gain * rot.sin())
    });
    let scaled = SteeringVectorBank::new(scaled).unwrap();

    let config = MlConfig::default();
    let reference = ml_scores(&frame, &bank, None, &config).unwrap();
    let rescored = ml_scores(&frame, &scaled, None, &config).unwrap();
    for (x, y) in reference.iter().zip(rescored.iter()) {
        let tolerance = 1e-9 * x.abs().max(1.0);
        assert!((x - y).abs() < tolerance, "{x} vs {y}");
    }
}

#[test]
fn single_cell_masks_pin_the_decision_to_that_cell() {
    let bank = steering_bank();
    let (dir_a, dir_b) = (6, 12);

    // Cell (1, 20) carries a wave from dir_a, cell (5, 24) one from dir_b;
    // everything else is deterministic clutter.
    let mut state = 0x1234_5678u32;
    let mut noise = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as i32 as f64) / (i32::MAX as f64)
    };
    let mut data = Array3::<C>::zeros((CHANNELS, FRAMES, BINS));
    for t in 0..FRAMES {
        for f in 0..BINS {
            for m in 0..CHANNELS {
                data[[m, t, f]] = C::new(noise(), noise());
            }
        }
    }
    for m in 0..CHANNELS {
        data[[m, 1, 20]] = bank.view()[[dir_a, m, 20]] * C::new(1.2, 0.4);
        data[[m, 5, 24]] = bank.view()[[dir_b, m, 24]] * C::new(-0.3, 0.9);
    }
    let frame = SpectralFrame::new(data).unwrap();

    let mask_for = |t: usize, f: usize| {
        let mut m = Array2::zeros((FRAMES, BINS));
        m[[t, f]] = 1.0;
        TfMask::Single(m)
    };

    let ml = DoaEstimator::Ml(MlConfig::default());
    assert_eq!(ml.estimate(&frame, &bank, Some(&mask_for(1, 20))).unwrap(), vec![dir_a]);
    assert_eq!(ml.estimate(&frame, &bank, Some(&mask_for(5, 24))).unwrap(), vec![dir_b]);

    let pairs: Vec<(usize, usize)> = (1..CHANNELS).map(|m| (0, m)).collect();
    let TfMask::Single(m_a) = mask_for(1, 20) else { unreachable!() };
    let TfMask::Single(m_b) = mask_for(5, 24) else { unreachable!() };
    assert_eq!(srp_doa(&frame, &bank, &pairs, Some(m_a.view())).unwrap(), dir_a);
    assert_eq!(srp_doa(&frame, &bank, &pairs, Some(m_b.view())).unwrap(), dir_b);
}

#[test]
fn per_source_mask_scores_each_speaker() {
    let bank = steering_bank();
    let (dir_a, dir_b) = (3, 15);

    // Speaker A occupies the first half of the frames, speaker B the rest.
    let frame_a = single_source_frame(&bank, dir_a);
    let frame_b = single_source_frame(&bank, dir_b);
    let mut data = Array3::<C>::zeros((CHANNELS, FRAMES, BINS));
    for m in 0..CHANNELS {
        for t in 0..FRAMES {
            for f in 0..BINS {
                data[[m, t, f]] = if t < FRAMES / 2 {
                    frame_a.view()[[m, t, f]]
                } else {
                    frame_b.view()[[m, t, f]]
                };
            }
        }
    }
    let frame = SpectralFrame::new(data).unwrap();

    let mut masks = Array3::zeros((2, FRAMES, BINS));
    for t in 0..FRAMES {
        for f in 0..BINS {
            masks[[usize::from(t >= FRAMES / 2), t, f]] = 1.0;
        }
    }
    let mask = TfMask::PerSource(masks);

    for estimator in [
        DoaEstimator::Ml(MlConfig::default()),
        DoaEstimator::Srp {
            pairs: vec![(0, 1), (0, 2), (0, 3)],
        },
        DoaEstimator::Music,
    ] {
        let indices = estimator.estimate(&frame, &bank, Some(&mask)).unwrap();
        assert_eq!(indices, vec![dir_a, dir_b], "{estimator:?}");
    }
}
