//! AuxIVA demo on a synthetic two-speaker mixture.
//!
//! Run with: cargo run -p rumbo-bss --example separate_demo

use ndarray::Array3;
use rumbo_bss::AuxIva;
use rumbo_core::{C, SpectralFrame};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let (frames, bins) = (80, 33);
    let mut rng = 0x9E37_79B9u32;
    let mut noise = move |scale: f64| {
        rng ^= rng << 13;
        rng ^= rng >> 17;
        rng ^= rng << 5;
        scale * (rng as i32 as f64) / (i32::MAX as f64)
    };

    // Speaker 0 talks first, speaker 1 second; fixed complex mixing.
    let sources = Array3::from_shape_fn((2, frames, bins), |(s, t, _f)| {
        let active = (s == 0) == (t < frames / 2);
        if active {
            C::new(noise(1.0), noise(1.0))
        } else {
            C::new(0.0, 0.0)
        }
    });
    let mix = [
        [C::new(1.0, 0.0), C::new(0.5, 0.25)],
        [C::new(0.35, -0.15), C::new(1.0, 0.0)],
    ];
    let mut data = Array3::<C>::zeros((2, frames, bins));
    for m in 0..2 {
        for t in 0..frames {
            for f in 0..bins {
                data[[m, t, f]] = mix[m][0] * sources[[0, t, f]]
                    + mix[m][1] * sources[[1, t, f]]
                    + C::new(noise(1e-3), noise(1e-3));
            }
        }
    }
    let mixture = SpectralFrame::new(data).expect("non-empty mixture");

    let separated = AuxIva::new()
        .iterations(20)
        .separate(&mixture)
        .expect("separation failed");

    for n in 0..2 {
        let first: f64 = (0..frames / 2)
            .flat_map(|t| (0..bins).map(move |f| (t, f)))
            .map(|(t, f)| separated.view()[[n, t, f]].norm_sqr())
            .sum();
        let second: f64 = (frames / 2..frames)
            .flat_map(|t| (0..bins).map(move |f| (t, f)))
            .map(|(t, f)| separated.view()[[n, t, f]].norm_sqr())
            .sum();
        println!(
            "source estimate {n}: first-half energy {first:.2}, second-half energy {second:.2}"
        );
    }
}
