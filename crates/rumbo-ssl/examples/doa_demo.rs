//! Localize a synthetic plane wave with all three DOA estimators.
//!
//! Run with: cargo run -p rumbo-ssl --example doa_demo

use ndarray::Array3;
use rumbo_core::{C, SpectralFrame, SteeringVectorBank};
use rumbo_ssl::{DoaEstimator, MlConfig};

const CHANNELS: usize = 4;
const FRAMES: usize = 50;
const BINS: usize = 65;
const DIRECTIONS: usize = 181;

const SAMPLE_RATE: f64 = 16000.0;
const SOUND_SPEED: f64 = 340.0;
const SPACING: f64 = 0.05;

fn omega(f: usize) -> f64 {
    let nfft = (2 * (BINS - 1)) as f64;
    std::f64::consts::TAU * f as f64 * SAMPLE_RATE / nfft
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    // Uniform linear array, candidate grid over [0, 180] degrees.
    let bank = SteeringVectorBank::new(Array3::from_shape_fn(
        (DIRECTIONS, CHANNELS, BINS),
        |(a, m, f)| {
            let theta = std::f64::consts::PI * a as f64 / (DIRECTIONS - 1) as f64;
            let phase = -omega(f) * m as f64 * SPACING * theta.cos() / SOUND_SPEED;
            C::new(phase.cos(), phase.sin())
        },
    ))
    .expect("non-empty bank");

    // A single plane wave from 60 degrees plus a little sensor noise.
    let truth = 60;
    let mut rng = 0x2545_F491u32;
    let mut noise = move |scale: f64| {
        rng ^= rng << 13;
        rng ^= rng >> 17;
        rng ^= rng << 5;
        scale * (rng as i32 as f64) / (i32::MAX as f64)
    };
    let mut data = Array3::<C>::zeros((CHANNELS, FRAMES, BINS));
    for t in 0..FRAMES {
        for f in 0..BINS {
            let source = C::new(noise(1.0), noise(1.0));
            for m in 0..CHANNELS {
                data[[m, t, f]] = bank.view()[[truth, m, f]] * source
                    + C::new(noise(1e-2), noise(1e-2));
            }
        }
    }
    let frame = SpectralFrame::new(data).expect("non-empty spectra");

    let estimators = [
        ("ml", DoaEstimator::Ml(MlConfig::default())),
        (
            "srp",
            DoaEstimator::Srp {
                pairs: (1..CHANNELS).map(|m| (0, m)).collect(),
            },
        ),
        ("music", DoaEstimator::Music),
    ];
    for (name, estimator) in estimators {
        let doa = estimator
            .estimate(&frame, &bank, None)
            .expect("estimation failed");
        println!("{name:>5}: {} degrees (truth {truth})", doa[0]);
    }
}
