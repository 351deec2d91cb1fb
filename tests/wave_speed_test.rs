//! Integration tests for the signal-speed estimates.
//!
//! These tests verify, over randomized wet state pairs and scaled normals:
//! - The naive bound dominates the local and Davis estimates
//! - Einfeldt's interval lies inside Davis' interval
//! - Every interval contains both sides' characteristic speeds

use dgsem_rs::equations::{
    CompressibleEuler2D, Direction, Equations2D, EulerPrimitive2D, ShallowWater2D,
    ShallowWaterState2D,
};
use dgsem_rs::wave_speed::{
    MinMaxSpeedEstimate, max_abs_speed, max_abs_speed_naive, min_max_speed_davis,
    min_max_speed_einfeldt, min_max_speed_naive,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SLACK: f64 = 1e-12;
const N_SAMPLES: usize = 20_000;

fn random_direction(rng: &mut StdRng) -> Direction {
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    let scale = rng.gen_range(0.1..3.0);
    Direction::normal(scale * angle.cos(), scale * angle.sin())
}

fn random_swe_state(rng: &mut StdRng) -> ShallowWaterState2D {
    ShallowWaterState2D::from_primitives(
        rng.gen_range(0.01..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-1.0..1.0),
    )
}

#[test]
fn test_swe_estimate_ordering() {
    let eq = ShallowWater2D::new(9.81, 1.0);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..N_SAMPLES {
        let u_ll = random_swe_state(&mut rng);
        let u_rr = random_swe_state(&mut rng);
        let dir = random_direction(&mut rng);

        let naive = max_abs_speed_naive(&u_ll, &u_rr, dir, &eq);
        let local = max_abs_speed(&u_ll, &u_rr, dir, &eq);
        let (lo_d, hi_d) = min_max_speed_davis(&u_ll, &u_rr, dir, &eq);
        let (lo_e, hi_e) = min_max_speed_einfeldt(&u_ll, &u_rr, dir, &eq);

        assert!(naive >= local - SLACK);
        assert!(naive >= lo_d.abs().max(hi_d.abs()) - SLACK);
        assert!(lo_e >= lo_d - SLACK, "einfeldt {lo_e} below davis {lo_d}");
        assert!(hi_e <= hi_d + SLACK, "einfeldt {hi_e} above davis {hi_d}");
        assert!(lo_e <= hi_e);
    }
}

#[test]
fn test_swe_intervals_contain_characteristic_speeds() {
    let eq = ShallowWater2D::new(9.81, 1.0);
    let mut rng = StdRng::seed_from_u64(43);
    let estimates = [
        MinMaxSpeedEstimate::Naive,
        MinMaxSpeedEstimate::Davis,
        MinMaxSpeedEstimate::Einfeldt,
    ];

    for _ in 0..N_SAMPLES / 4 {
        let u_ll = random_swe_state(&mut rng);
        let u_rr = random_swe_state(&mut rng);
        let dir = random_direction(&mut rng);
        let (v_ll, c_ll) = eq.normal_velocity_and_sound_speed(&u_ll, dir);
        let (v_rr, c_rr) = eq.normal_velocity_and_sound_speed(&u_rr, dir);

        for estimate in estimates {
            let (lo, hi) = estimate.evaluate(&u_ll, &u_rr, dir, &eq);
            // Einfeldt only bounds the outgoing waves of each side.
            assert!(lo <= v_ll - c_ll + SLACK, "{}", estimate.name());
            assert!(hi >= v_rr + c_rr - SLACK, "{}", estimate.name());
        }
    }
}

#[test]
fn test_euler_estimate_ordering() {
    let eq = CompressibleEuler2D::new(1.4);
    let mut rng = StdRng::seed_from_u64(44);
    let random_state = |rng: &mut StdRng| {
        eq.prim2cons(&EulerPrimitive2D::new(
            rng.gen_range(0.1..4.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(0.1..4.0),
        ))
    };

    for _ in 0..N_SAMPLES / 4 {
        let u_ll = random_state(&mut rng);
        let u_rr = random_state(&mut rng);
        let dir = random_direction(&mut rng);

        let naive = max_abs_speed_naive(&u_ll, &u_rr, dir, &eq);
        let local = max_abs_speed(&u_ll, &u_rr, dir, &eq);
        let (lo_d, hi_d) = min_max_speed_davis(&u_ll, &u_rr, dir, &eq);
        let (lo_n, hi_n) = min_max_speed_naive(&u_ll, &u_rr, dir, &eq);

        assert!(naive >= local - SLACK);
        assert!(lo_n <= lo_d + SLACK);
        assert!(hi_n >= hi_d - SLACK);
    }
}

#[test]
fn test_speeds_scale_with_normal_length() {
    let eq = ShallowWater2D::new(9.81, 1.0);
    let mut rng = StdRng::seed_from_u64(45);

    for _ in 0..1000 {
        let u_ll = random_swe_state(&mut rng);
        let u_rr = random_swe_state(&mut rng);
        let scale = rng.gen_range(0.1..3.0);
        let unit = Direction::normal(0.6, 0.8);
        let scaled = Direction::normal(0.6 * scale, 0.8 * scale);

        let (lo, hi) = min_max_speed_einfeldt(&u_ll, &u_rr, unit, &eq);
        let (lo_s, hi_s) = min_max_speed_einfeldt(&u_ll, &u_rr, scaled, &eq);
        assert!((lo_s - scale * lo).abs() < 1e-10 * (1.0 + lo.abs()));
        assert!((hi_s - scale * hi).abs() < 1e-10 * (1.0 + hi.abs()));
    }
}
