//! Element-loop driver functions.
//!
//! Every per-element computation reads only its own element slice plus the
//! shared read-only equation, basis and geometry tables, so the loops below
//! run over elements in any order. With the `parallel` feature they use
//! rayon's `par_chunks_mut` over the interleaved solution storage.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;

use super::solution::SystemSolution2D;
use crate::equations::{Direction, Equations2D, StateVector};
use crate::flux::{NonconservativeFlux, SurfaceFlux};
use crate::limiters::{LimiterContext2D, LimiterError, LimiterReport, StageLimiter};
use crate::types::{ElementIndex, NodeIndex};

/// First non-admissible node found by [`check_admissibility`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("non-admissible state at element {element}, node {node}")]
pub struct AdmissibilityError {
    pub element: ElementIndex,
    pub node: NodeIndex,
}

/// Run `f` on every element slice (`[node * N + var]`).
pub fn for_each_element_mut<const N: usize, F>(u: &mut SystemSolution2D<N>, f: F)
where
    F: Fn(ElementIndex, &mut [f64]) + Send + Sync,
{
    let len = u.element_len();
    if len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        u.data
            .par_chunks_mut(len)
            .enumerate()
            .for_each(|(k, element)| f(ElementIndex::new(k), element));
    }

    #[cfg(not(feature = "parallel"))]
    {
        u.data
            .chunks_mut(len)
            .enumerate()
            .for_each(|(k, element)| f(ElementIndex::new(k), element));
    }
}

/// Check that a solution matches the equation family and the geometry.
pub fn check_layout<E: Equations2D, const N: usize>(
    u: &SystemSolution2D<N>,
    ctx: &LimiterContext2D<'_, E>,
) -> Result<(), LimiterError> {
    let checks = [
        ("variables per node", <E::State as StateVector>::N_VARS, N),
        ("elements", ctx.n_elements(), u.n_elements),
        ("nodes per element", ctx.n_nodes(), u.n_nodes),
        ("solution length", ctx.n_elements() * ctx.n_nodes() * N, u.data.len()),
    ];
    match checks.into_iter().find(|(_, expected, actual)| expected != actual) {
        Some((what, expected, actual)) => Err(LimiterError::LayoutMismatch {
            what,
            expected,
            actual,
        }),
        None => Ok(()),
    }
}

/// Apply a stage limiter to every element of `u`.
///
/// `u_prev` is the solution at the start of the stage. On error the
/// elements processed so far stay limited; the stage should be rejected.
pub fn apply_stage_limiter<E, L, const N: usize>(
    limiter: &L,
    u: &mut SystemSolution2D<N>,
    u_prev: &SystemSolution2D<N>,
    ctx: &LimiterContext2D<'_, E>,
) -> Result<LimiterReport, LimiterError>
where
    E: Equations2D,
    L: StageLimiter<E> + ?Sized,
{
    check_layout(u, ctx)?;
    check_layout(u_prev, ctx)?;
    let len = u.element_len();

    #[cfg(feature = "parallel")]
    let report = u
        .data
        .par_chunks_mut(len)
        .zip(u_prev.data.par_chunks(len))
        .enumerate()
        .map(|(k, (u_k, prev_k))| limiter.limit_element(ElementIndex::new(k), u_k, prev_k, ctx))
        .try_fold(LimiterReport::default, |report, outcome| {
            outcome.map(|o| report.record(o))
        })
        .try_reduce(LimiterReport::default, |a, b| Ok(a.merge(b)))?;

    #[cfg(not(feature = "parallel"))]
    let report = u
        .data
        .chunks_mut(len)
        .zip(u_prev.data.chunks(len))
        .enumerate()
        .try_fold(LimiterReport::default(), |report, (k, (u_k, prev_k))| {
            limiter
                .limit_element(ElementIndex::new(k), u_k, prev_k, ctx)
                .map(|o| report.record(o))
        })?;

    tracing::debug!(
        limiter = limiter.name(),
        elements_checked = report.elements_checked,
        elements_limited = report.elements_limited,
        min_retained = report.min_retained,
        "stage limiter pass"
    );
    Ok(report)
}

/// Surface contributions of one face, seen from each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterfaceFlux<S> {
    /// `F*(u_ll, u_rr) + ½ G(u_ll, u_rr)`
    pub left: S,
    /// `F*(u_ll, u_rr) + ½ G(u_rr, u_ll)`
    pub right: S,
}

/// Combine the conservative and non-conservative fluxes at a face.
///
/// `dir` points from `u_ll` to `u_rr`. Without a non-conservative flux both
/// sides receive `F*`.
#[inline]
pub fn interface_flux<E, F, G>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
    surface_flux: &F,
    nonconservative_flux: Option<&G>,
) -> InterfaceFlux<E::State>
where
    E: Equations2D,
    F: SurfaceFlux<E> + ?Sized,
    G: NonconservativeFlux<E> + ?Sized,
{
    let flux = surface_flux.compute(u_ll, u_rr, dir, eq);
    match nonconservative_flux {
        Some(g) => InterfaceFlux {
            left: flux + g.compute(u_ll, u_rr, dir, eq) * 0.5,
            right: flux + g.compute(u_rr, u_ll, dir, eq) * 0.5,
        },
        None => InterfaceFlux {
            left: flux,
            right: flux,
        },
    }
}

/// Largest stable explicit time step for the CFL number `cfl`.
///
/// `Δt = cfl · 2 / (n_1d · max (λ_x + λ_y) · sqrt|J⁻¹|)`, where the square
/// root of the inverse Jacobian determinant serves as the inverse element
/// length. Returns infinity for a solution at rest with zero wave speeds.
pub fn max_dt<E: Equations2D, const N: usize>(
    u: &SystemSolution2D<N>,
    ctx: &LimiterContext2D<'_, E>,
    cfl: f64,
) -> f64 {
    debug_assert!(check_layout(u, ctx).is_ok());
    let eq = ctx.equations;
    let len = u.element_len();
    if len == 0 {
        return f64::INFINITY;
    }

    let element_max = |(k, element): (usize, &[f64])| -> f64 {
        let inv_jacobian = ctx.geometry.element_inverse_jacobian(ElementIndex::new(k));
        element
            .chunks_exact(N)
            .zip(inv_jacobian)
            .map(|(node, inv_j)| {
                let [lambda_x, lambda_y] = eq.max_abs_speeds(&E::State::from_slice(node));
                (lambda_x + lambda_y) * inv_j.abs().sqrt()
            })
            .fold(0.0, f64::max)
    };

    #[cfg(feature = "parallel")]
    let max_scaled_speed = u
        .data
        .par_chunks(len)
        .enumerate()
        .map(element_max)
        .reduce(|| 0.0, f64::max);

    #[cfg(not(feature = "parallel"))]
    let max_scaled_speed = u.data.chunks(len).enumerate().map(element_max).fold(0.0, f64::max);

    if max_scaled_speed > 0.0 {
        cfl * 2.0 / (ctx.basis.n_nodes_1d() as f64 * max_scaled_speed)
    } else {
        f64::INFINITY
    }
}

/// Find the first node (in element order) that is not admissible.
pub fn check_admissibility<E: Equations2D, const N: usize>(
    u: &SystemSolution2D<N>,
    eq: &E,
) -> Result<(), AdmissibilityError> {
    let len = u.element_len();
    if len == 0 {
        return Ok(());
    }

    let first_bad = |(k, element): (usize, &[f64])| {
        element
            .chunks_exact(N)
            .position(|node| !eq.is_admissible(&E::State::from_slice(node)))
            .map(|i| AdmissibilityError {
                element: ElementIndex::new(k),
                node: NodeIndex::new(i),
            })
    };

    #[cfg(feature = "parallel")]
    let found = u.data.par_chunks(len).enumerate().find_map_first(first_bad);

    #[cfg(not(feature = "parallel"))]
    let found = u.data.chunks(len).enumerate().find_map(first_bad);

    match found {
        Some(err) => {
            tracing::warn!(element = %err.element, node = %err.node, "non-admissible state");
            Err(err)
        }
        None => Ok(()),
    }
}
