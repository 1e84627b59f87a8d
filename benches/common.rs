#![allow(dead_code)]

use num_bigint::BigInt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use radix_math::{ExtendedDecimal, ExtendedFloat};

/// Decimals with 1..=`max_digits` random digits and exponents in `-40..40`.
pub fn random_decimals(count: usize, max_digits: usize, seed: u64) -> Vec<ExtendedDecimal> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let digits = rng.gen_range(1..=max_digits);
            let mut mantissa = BigInt::from(rng.gen_range(1u32..10));
            for _ in 1..digits {
                mantissa = mantissa * 10u32 + rng.gen_range(0u32..10);
            }
            if rng.gen_bool(0.5) {
                mantissa = -mantissa;
            }
            ExtendedDecimal::new(mantissa, BigInt::from(rng.gen_range(-40i64..40)))
        })
        .collect()
}

/// Finite `f64` samples converted exactly.
pub fn random_floats(count: usize, seed: u64) -> Vec<ExtendedFloat> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| ExtendedFloat::from_f64(rng.gen_range(-1.0e12..1.0e12)))
        .collect()
}

/// Set `BENCH_VERBOSE=1` to print sample results before timing.
pub fn verbose() -> bool {
    std::env::var("BENCH_VERBOSE").is_ok_and(|value| value == "1")
}
