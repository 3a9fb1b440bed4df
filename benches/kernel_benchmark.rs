use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mpexpr_rs::bigint::BigInt;
use mpexpr_rs::bigint::tenpow::TenPowers;
use mpexpr_rs::format::to_decimal;
use mpexpr_rs::rational::BigRational;
use mpexpr_rs::transcendental;

// Deterministic operands of `words` 32-bit words
fn operand(words: usize, seed: u32) -> BigInt {
    let mut state = seed;
    let mag = (0..words)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            state
        })
        .collect();
    BigInt::from_parts(false, mag)
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    for words in [4usize, 32, 128, 512] {
        let a = operand(words, 1);
        let b = operand(words, 2);
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |bench, _| {
            bench.iter(|| black_box(&a) * black_box(&b))
        });
    }
    group.finish();
}

fn bench_divide(c: &mut Criterion) {
    let mut group = c.benchmark_group("divide");
    for words in [8usize, 64, 256] {
        let n = operand(words * 2, 3);
        let d = operand(words, 4);
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |bench, _| {
            bench.iter(|| black_box(&n).div_rem(black_box(&d)))
        });
    }
    group.finish();
}

fn bench_gcd(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcd");
    let a = operand(64, 5);
    let b = operand(48, 6);
    for threshold in [0usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("threshold", threshold), &threshold, |bench, t| {
            bench.iter(|| black_box(&a).gcd_with_threshold(black_box(&b), *t))
        });
    }
    group.finish();
}

fn bench_factorial(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorial");
    group.sample_size(20);
    for n in [100i64, 1000, 5000] {
        let z = BigInt::from_i64(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &z, |bench, z| {
            bench.iter(|| black_box(z).fact(u64::MAX))
        });
    }
    group.finish();
}

fn bench_decimal_printing(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_decimal");
    for words in [16usize, 128, 1024] {
        let z = operand(words, 7);
        let mut cache = TenPowers::new();
        group.bench_with_input(BenchmarkId::from_parameter(words), &z, |bench, z| {
            bench.iter(|| to_decimal(black_box(z), &mut cache))
        });
    }
    group.finish();
}

fn bench_transcendental(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcendental");
    group.sample_size(20);
    let x = BigRational::new(BigInt::from_i64(7), BigInt::from_i64(5)).unwrap_or_default();
    for digits in [20u32, 100] {
        let eps = BigRational::new(BigInt::one(), mpexpr_rs::bigint::tenpow::ten_pow(digits as u64))
            .unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("exp", digits), &eps, |bench, eps| {
            bench.iter(|| transcendental::exp(black_box(&x), eps))
        });
        group.bench_with_input(BenchmarkId::new("ln", digits), &eps, |bench, eps| {
            bench.iter(|| transcendental::ln(black_box(&x), eps))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_multiply,
    bench_divide,
    bench_gcd,
    bench_factorial,
    bench_decimal_printing,
    bench_transcendental
);
criterion_main!(benches);
