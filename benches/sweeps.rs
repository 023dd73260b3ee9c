use criterion::{criterion_group, criterion_main, Criterion};
use polysweep::{
    basis::{Basis, LegendreBasis, MonomialBasis},
    data::{train_test_split, SampleSet, TrainTestSplit},
    regularized::{LassoModel, RidgeModel, SolverOptions},
    sweep::{cross_validated_sweep, degree_sweep, penalty_sweep},
    transforms::Strength,
    PolynomialFit,
};
use std::hint::black_box;

fn gen_split(n: usize) -> TrainTestSplit {
    let sample = SampleSet::noisy_sine(n, Strength::Absolute(0.1), Some(42)).expect("Failed to sample");
    train_test_split(sample.points(), 0.3, Some(43)).expect("Failed to split")
}

fn fit<B: Basis<f64>>(data: &[(f64, f64)], degree: usize) -> PolynomialFit<B> {
    PolynomialFit::<B>::new(data, degree).expect("Failed to fit data")
}

fn criterion_benchmark(c: &mut Criterion) {
    let split = gen_split(101);
    let options = SolverOptions::default();

    //
    // Single OLS fits, scaling with degree
    println!("Benchmarking fit vs degree (n=70)...");
    let mut group = c.benchmark_group("fit_vs_degree");
    for degree in [1, 5, 10, 20, 30] {
        group.bench_function(format!("Legendre/Degree={degree}"), |b| {
            b.iter(|| fit::<LegendreBasis>(black_box(&split.train), degree))
        });
        group.bench_function(format!("Monomial/Degree={degree}"), |b| {
            b.iter(|| fit::<MonomialBasis>(black_box(&split.train), degree))
        });
    }
    group.finish();

    //
    // Whole sweeps at the default experiment size
    println!("Benchmarking sweeps (n=101, Degree=10)...");
    let alphas: Vec<f64> = (0..20).map(|i| 10f64.powf(-4.0 + 0.2 * f64::from(i))).collect();
    let mut group = c.benchmark_group("sweeps");
    group.bench_function("OLS 1..=30", |b| {
        b.iter(|| degree_sweep::<LegendreBasis>(black_box(&split), 30))
    });
    group.bench_function("Lasso", |b| {
        b.iter(|| penalty_sweep::<LassoModel, LegendreBasis>(black_box(&split), 10, &alphas, &options))
    });
    group.bench_function("Ridge", |b| {
        b.iter(|| penalty_sweep::<RidgeModel, LegendreBasis>(black_box(&split), 10, &alphas, &options))
    });
    group.bench_function("Lasso CV (10 folds)", |b| {
        b.iter(|| {
            cross_validated_sweep::<LassoModel, LegendreBasis>(
                black_box(&split.train),
                10,
                &alphas,
                10,
                &options,
            )
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
