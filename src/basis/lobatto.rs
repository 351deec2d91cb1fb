//! Legendre–Gauss–Lobatto nodes and quadrature weights.
//!
//! The `N + 1` LGL nodes of degree `N` are `±1` plus the roots of `P'_N`.
//! With a diagonal (collocated) mass matrix the quadrature weights are also
//! the node volume weights used by the stage limiters.

use std::f64::consts::PI;

const NEWTON_TOL: f64 = 1e-15;
const NEWTON_MAX_ITER: usize = 100;

/// Evaluate `P_n(x)` and `P'_n(x)` with the three-term recurrence.
///
/// At `x = ±1` the derivative uses the closed form `(±1)^{n+1} n(n+1)/2`.
pub fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    match n {
        0 => return (1.0, 0.0),
        1 => return (x, 1.0),
        _ => {}
    }

    let mut p_km1 = 1.0;
    let mut p_k = x;
    for k in 1..n {
        let kf = k as f64;
        let p_kp1 = ((2.0 * kf + 1.0) * x * p_k - kf * p_km1) / (kf + 1.0);
        p_km1 = p_k;
        p_k = p_kp1;
    }

    let nf = n as f64;
    let one_minus_x2 = 1.0 - x * x;
    let dp = if one_minus_x2.abs() < 1e-14 {
        let sign = if x > 0.0 || n % 2 == 1 { 1.0 } else { -1.0 };
        sign * 0.5 * nf * (nf + 1.0)
    } else {
        nf * (p_km1 - x * p_k) / one_minus_x2
    };

    (p_k, dp)
}

/// Compute LGL nodes and weights for polynomial degree `polydeg >= 1`.
///
/// Interior nodes are found by Newton iteration on `P'_N`, starting from the
/// Chebyshev–Gauss–Lobatto points. The second derivative comes from the
/// Legendre ODE `(1 - x²) P'' = 2x P' - N(N+1) P`.
pub fn lobatto_nodes_and_weights(polydeg: usize) -> (Vec<f64>, Vec<f64>) {
    debug_assert!(polydeg >= 1, "LGL quadrature needs at least two nodes");

    let n = polydeg;
    let nf = n as f64;
    let mut nodes = vec![0.0; n + 1];
    nodes[0] = -1.0;
    nodes[n] = 1.0;

    for (j, node) in nodes.iter_mut().enumerate().take(n).skip(1) {
        let mut x = -(PI * j as f64 / nf).cos();
        for _ in 0..NEWTON_MAX_ITER {
            let (p, dp) = legendre_with_derivative(n, x);
            let d2p = (2.0 * x * dp - nf * (nf + 1.0) * p) / (1.0 - x * x);
            let delta = dp / d2p;
            x -= delta;
            if delta.abs() < NEWTON_TOL {
                break;
            }
        }
        *node = x;
    }

    // Enforce exact symmetry; Newton converges to both halves independently.
    for j in 0..(n + 1) / 2 {
        let mirrored = 0.5 * (nodes[n - j] - nodes[j]);
        nodes[j] = -mirrored;
        nodes[n - j] = mirrored;
    }
    if n % 2 == 0 {
        nodes[n / 2] = 0.0;
    }

    let scale = 2.0 / (nf * (nf + 1.0));
    let weights = nodes
        .iter()
        .map(|&x| {
            let (p, _) = legendre_with_derivative(n, x);
            scale / (p * p)
        })
        .collect();

    (nodes, weights)
}
