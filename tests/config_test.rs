//! Integration tests for configuration-driven setup.
//!
//! These tests verify:
//! - JSON configurations build the expected fluxes and limiters
//! - Family defaults for unset fluxes
//! - Rejection of fluxes, limiters and variables a family does not support

use dgsem_rs::config::{ConfigError, SolverConfig};
use dgsem_rs::solver::DiscretizationFamily;

fn build(json: &str) -> Result<DiscretizationFamily, ConfigError> {
    DiscretizationFamily::from_config(&SolverConfig::from_json_str(json)?)
}

#[test]
fn test_shallow_water_hydrostatic_setup() {
    let family = build(
        r#"{
            "polydeg": 2,
            "equations": { "family": "shallow_water", "gravity": 9.81 },
            "surface_flux": { "type": "hll", "estimate": "einfeldt" },
            "hydrostatic_reconstruction": true,
            "limiters": [
                { "type": "positivity_zhang_shu",
                  "constraints": [{ "variable": "water_height", "threshold": 1e-3 }] }
            ],
            "cfl": 0.8
        }"#,
    )
    .unwrap();

    let DiscretizationFamily::ShallowWater(dg) = family else {
        panic!("expected shallow water");
    };
    assert_eq!(dg.basis.n_nodes_1d(), 3);
    assert_eq!(dg.surface_flux.name(), "hydrostatic_reconstruction");
    assert_eq!(
        dg.nonconservative_flux.as_ref().map(|g| g.name()),
        Some("nonconservative_audusse_etal")
    );
    assert_eq!(dg.limiter.names(), vec!["positivity_zhang_shu"]);
    assert_eq!(dg.cfl, 0.8);
}

#[test]
fn test_wintermeyer_default_partner() {
    let family = build(r#"{ "surface_flux": { "type": "wintermeyer_etal" } }"#).unwrap();
    let DiscretizationFamily::ShallowWater(dg) = family else {
        panic!("expected shallow water");
    };
    assert_eq!(dg.surface_flux.name(), "wintermeyer_etal");
    assert_eq!(
        dg.nonconservative_flux.as_ref().map(|g| g.name()),
        Some("nonconservative_wintermeyer_etal")
    );
}

#[test]
fn test_euler_setup() {
    let family = build(
        r#"{
            "equations": { "family": "compressible_euler", "gamma": 1.4 },
            "surface_flux": { "type": "lax_friedrichs" },
            "limiters": [
                { "type": "positivity_zhang_shu",
                  "constraints": [
                      { "variable": "density", "threshold": 1e-8 },
                      { "variable": "pressure", "threshold": 1e-8 }
                  ] },
                { "type": "entropy_bounded" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(family.name(), "CompressibleEulerEquations2D");
    assert_eq!(family.surface_flux_name(), "lax_friedrichs");
    let DiscretizationFamily::CompressibleEuler(dg) = family else {
        panic!("expected compressible Euler");
    };
    assert!(dg.nonconservative_flux.is_none());
    assert_eq!(dg.limiter.len(), 2);
}

#[test]
fn test_family_specific_rejections() {
    let euler = r#""equations": { "family": "compressible_euler", "gamma": 1.4 }"#;
    let cases = [
        format!(r#"{{ {euler}, "surface_flux": {{ "type": "fjordholm_etal" }} }}"#),
        format!(r#"{{ {euler}, "nonconservative_flux": "wintermeyer_etal" }}"#),
        format!(r#"{{ {euler}, "hydrostatic_reconstruction": true }}"#),
        r#"{ "surface_flux": { "type": "ranocha" } }"#.to_string(),
        r#"{ "limiters": [{ "type": "entropy_bounded" }] }"#.to_string(),
    ];
    for json in &cases {
        let err = build(json).unwrap_err();
        assert!(matches!(err, ConfigError::Unsupported { .. }), "{json}: {err}");
    }
}

#[test]
fn test_invalid_parameters() {
    let err = build(
        r#"{ "limiters": [{ "type": "positivity_zhang_shu",
             "constraints": [{ "variable": "pressure", "threshold": 1e-8 }] }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedVariable { .. }));

    let err = build(r#"{ "limiters": [{ "type": "positivity_zhang_shu", "constraints": [] }] }"#)
        .unwrap_err();
    assert_eq!(err, ConfigError::EmptyConstraints);

    assert_eq!(build(r#"{ "polydeg": 0 }"#).unwrap_err(), ConfigError::InvalidPolydeg(0));
    assert_eq!(build(r#"{ "cfl": -1.0 }"#).unwrap_err(), ConfigError::InvalidCfl(-1.0));
    assert!(matches!(
        build(r#"{ "equations": { "family": "shallow_water", "gravity": 0.0 } }"#),
        Err(ConfigError::InvalidGravity(_))
    ));
    assert!(matches!(
        build(r#"{ "surface_flux": { "type": "roe" } }"#),
        Err(ConfigError::Parse(_))
    ));
}
