//! Benchmarks for numerical flux functions.
//!
//! Run with: `cargo bench --bench flux_bench`
//!
//! Compares the two-point fluxes of both equation families and the cost of
//! the wave-speed estimates inside HLL.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dgsem_rs::equations::{
    CompressibleEuler2D, Direction, Equations2D, EulerPrimitive2D, EulerState2D, ShallowWater2D,
    ShallowWaterState2D,
};
use dgsem_rs::flux::{
    EulerFlux, FluxHydrostaticReconstruction, NonconservativeFlux, ShallowWaterFlux,
    ShallowWaterNonconservativeFlux, SurfaceFlux,
};
use dgsem_rs::wave_speed::{MaxAbsSpeedEstimate, MinMaxSpeedEstimate};

/// Generate shallow water face states over a smooth bottom.
fn generate_swe_states(n: usize) -> Vec<(ShallowWaterState2D, ShallowWaterState2D, Direction)> {
    (0..n)
        .map(|i| {
            let phase = (i as f64) * 0.1;
            let b_l = 0.2 * phase.sin();
            let b_r = 0.2 * (phase + 0.1).sin();

            let left = ShallowWaterState2D::from_primitives(
                10.0 + 2.0 * phase.sin() - b_l,
                0.5 + 0.3 * phase.cos(),
                0.2 - 0.1 * phase.sin(),
                b_l,
            );
            let right = ShallowWaterState2D::from_primitives(
                10.0 + 1.5 * (phase + 0.5).sin() - b_r,
                0.4 + 0.2 * (phase + 0.3).cos(),
                0.3 - 0.15 * (phase + 0.2).sin(),
                b_r,
            );

            let angle = phase * 0.5;
            (left, right, Direction::normal(angle.cos(), angle.sin()))
        })
        .collect()
}

/// Generate Euler face states with moderate jumps.
fn generate_euler_states(
    eq: &CompressibleEuler2D,
    n: usize,
) -> Vec<(EulerState2D, EulerState2D, Direction)> {
    (0..n)
        .map(|i| {
            let phase = (i as f64) * 0.1;
            let left = eq.prim2cons(&EulerPrimitive2D::new(
                1.0 + 0.2 * phase.sin(),
                0.3 * phase.cos(),
                -0.1,
                1.0 + 0.3 * phase.cos(),
            ));
            let right = eq.prim2cons(&EulerPrimitive2D::new(
                0.9 + 0.2 * (phase + 0.4).sin(),
                0.2,
                0.1 * phase.sin(),
                0.8 + 0.2 * (phase + 0.1).cos(),
            ));
            let angle = phase * 0.5;
            (left, right, Direction::normal(angle.cos(), angle.sin()))
        })
        .collect()
}

fn sum_surface_fluxes<E, F>(
    flux: &F,
    states: &[(E::State, E::State, Direction)],
    eq: &E,
) -> E::State
where
    E: Equations2D,
    F: SurfaceFlux<E>,
{
    let mut total = E::State::default();
    for (left, right, dir) in states {
        total += flux.compute(black_box(left), black_box(right), black_box(*dir), eq);
    }
    total
}

/// Benchmark the shallow water surface fluxes.
fn bench_swe_fluxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("swe_fluxes");

    let eq = ShallowWater2D::new(9.81, 10.0);
    let states = generate_swe_states(1000);

    let fluxes = [
        ShallowWaterFlux::Central,
        ShallowWaterFlux::LaxFriedrichs {
            estimate: MaxAbsSpeedEstimate::Local,
        },
        ShallowWaterFlux::Hll {
            estimate: MinMaxSpeedEstimate::Einfeldt,
        },
        ShallowWaterFlux::FjordholmEtal,
        ShallowWaterFlux::WintermeyerEtal,
    ];
    for flux in fluxes {
        group.bench_function(flux.name(), |b| {
            b.iter(|| sum_surface_fluxes(&flux, &states, &eq));
        });
    }

    let reconstructed = FluxHydrostaticReconstruction::new(ShallowWaterFlux::Hll {
        estimate: MinMaxSpeedEstimate::Einfeldt,
    });
    group.bench_function("hydrostatic_reconstruction_hll", |b| {
        b.iter(|| sum_surface_fluxes(&reconstructed, &states, &eq));
    });

    group.finish();
}

/// Benchmark the non-conservative topography fluxes.
fn bench_nonconservative_fluxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonconservative_fluxes");

    let eq = ShallowWater2D::new(9.81, 10.0);
    let states = generate_swe_states(1000);

    for flux in [
        ShallowWaterNonconservativeFlux::WintermeyerEtal,
        ShallowWaterNonconservativeFlux::FjordholmEtal,
        ShallowWaterNonconservativeFlux::AudusseEtal,
    ] {
        group.bench_function(flux.name(), |b| {
            b.iter(|| {
                let mut total = ShallowWaterState2D::default();
                for (left, right, dir) in &states {
                    total += flux.compute(black_box(left), black_box(right), black_box(*dir), &eq);
                }
                total
            });
        });
    }

    group.finish();
}

/// Benchmark the compressible Euler fluxes.
fn bench_euler_fluxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("euler_fluxes");

    let eq = CompressibleEuler2D::new(1.4);
    let states = generate_euler_states(&eq, 1000);

    for flux in [
        EulerFlux::Central,
        EulerFlux::Hll {
            estimate: MinMaxSpeedEstimate::Davis,
        },
        EulerFlux::Ranocha,
        EulerFlux::Chandrashekar,
        EulerFlux::ShimaEtal,
        EulerFlux::KennedyGruber,
    ] {
        group.bench_function(flux.name(), |b| {
            b.iter(|| sum_surface_fluxes(&flux, &states, &eq));
        });
    }

    group.finish();
}

/// Benchmark HLL with each wave-speed estimate.
fn bench_hll_estimates(c: &mut Criterion) {
    let mut group = c.benchmark_group("hll_estimates");

    let eq = ShallowWater2D::new(9.81, 10.0);
    let states = generate_swe_states(1000);

    for estimate in [
        MinMaxSpeedEstimate::Naive,
        MinMaxSpeedEstimate::Davis,
        MinMaxSpeedEstimate::Einfeldt,
    ] {
        let flux = ShallowWaterFlux::Hll { estimate };
        group.bench_with_input(
            BenchmarkId::new("swe", estimate.name()),
            &estimate,
            |b, _| {
                b.iter(|| sum_surface_fluxes(&flux, &states, &eq));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_swe_fluxes,
    bench_nonconservative_fluxes,
    bench_euler_fluxes,
    bench_hll_estimates
);
criterion_main!(benches);
