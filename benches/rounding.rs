mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use common::{random_decimals, random_floats, verbose};
use radix_math::{BinaryHelper, DecimalHelper, PrecisionContext, RadixArithmetic, RadixMath};

const SAMPLE_COUNT: usize = 2_000;

fn bench_decimal_rounding(c: &mut Criterion) {
    let math = RadixMath::new(DecimalHelper);
    let mut group = c.benchmark_group("decimal_round_to_precision");
    for digits in [20usize, 200, 2_000] {
        let inputs = random_decimals(SAMPLE_COUNT, digits, 11);
        let ctx = PrecisionContext::decimal64();
        if verbose() {
            if let Ok(sample) = math.round_to_precision(&inputs[0], &ctx) {
                eprintln!("[rounding] {} -> {}", inputs[0], sample.value);
            }
        }
        group.bench_with_input(BenchmarkId::from_parameter(digits), &inputs, |b, inputs| {
            b.iter(|| {
                for value in inputs {
                    black_box(math.round_to_precision(value, &ctx).is_ok());
                }
            })
        });
    }
    group.finish();
}

fn bench_decimal_addition(c: &mut Criterion) {
    let math = RadixMath::new(DecimalHelper);
    let lhs = random_decimals(SAMPLE_COUNT, 34, 12);
    let rhs = random_decimals(SAMPLE_COUNT, 34, 13);
    let ctx = PrecisionContext::decimal128();
    c.bench_function("decimal128_add", |b| {
        b.iter(|| {
            for (left, right) in lhs.iter().zip(&rhs) {
                black_box(math.add(left, right, &ctx).is_ok());
            }
        })
    });
}

fn bench_binary_rounding(c: &mut Criterion) {
    let math = RadixMath::new(BinaryHelper);
    let inputs = random_floats(SAMPLE_COUNT, 14);
    let ctx = PrecisionContext::binary32();
    c.bench_function("binary32_round_f64", |b| {
        b.iter(|| {
            for value in &inputs {
                black_box(math.round_to_precision(value, &ctx).is_ok());
            }
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_decimal_rounding, bench_decimal_addition, bench_binary_rounding
}
criterion_main!(benches);
