//! Nodal polynomial basis shared by all elements of one degree.
//!
//! Only the part of the basis the flux and limiter core consumes lives
//! here: the 1D Legendre–Gauss–Lobatto nodes and quadrature weights and
//! their tensor-product combinations. Differentiation and interpolation
//! matrices belong to the spatial discretization.

mod lobatto;

pub use lobatto::{legendre_with_derivative, lobatto_nodes_and_weights};

use crate::config::ConfigError;
use crate::types::NodeIndex;

/// Tensor-product Lobatto–Legendre basis on the reference square `[-1, 1]²`.
///
/// Immutable after construction and shared read-only by every element.
///
/// # Example
///
/// ```
/// use dgsem_rs::basis::LobattoLegendreBasis;
///
/// let basis = LobattoLegendreBasis::new(3).unwrap();
/// assert_eq!(basis.n_nodes_1d(), 4);
/// assert_eq!(basis.n_nodes(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct LobattoLegendreBasis {
    polydeg: usize,
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl LobattoLegendreBasis {
    /// Build the basis for polynomial degree `polydeg` (at least 1).
    pub fn new(polydeg: usize) -> Result<Self, ConfigError> {
        if polydeg == 0 {
            return Err(ConfigError::InvalidPolydeg(polydeg));
        }
        let (nodes, weights) = lobatto_nodes_and_weights(polydeg);
        Ok(Self {
            polydeg,
            nodes,
            weights,
        })
    }

    /// Polynomial degree.
    #[inline]
    pub fn polydeg(&self) -> usize {
        self.polydeg
    }

    /// Nodes per spatial direction.
    #[inline]
    pub fn n_nodes_1d(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes per 2D element.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len() * self.nodes.len()
    }

    /// 1D reference node locations in `[-1, 1]`.
    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// 1D quadrature weights (sum to 2).
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Reference coordinates `(xi, eta)` of a 2D node.
    #[inline]
    pub fn reference_coordinates(&self, node: NodeIndex) -> (f64, f64) {
        let (i, j) = node.to_tensor(self.n_nodes_1d());
        (self.nodes[i], self.nodes[j])
    }

    /// Tensor-product weight `w_i * w_j` of a 2D node.
    #[inline]
    pub fn tensor_weight(&self, node: NodeIndex) -> f64 {
        let (i, j) = node.to_tensor(self.n_nodes_1d());
        self.weights[i] * self.weights[j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degree_zero() {
        assert!(matches!(
            LobattoLegendreBasis::new(0),
            Err(ConfigError::InvalidPolydeg(0))
        ));
    }

    #[test]
    fn test_tensor_weights_sum_to_reference_area() {
        let basis = LobattoLegendreBasis::new(4).unwrap();
        let total: f64 = NodeIndex::iter(basis.n_nodes())
            .map(|node| basis.tensor_weight(node))
            .sum();
        assert!((total - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_coordinates_ordering() {
        let basis = LobattoLegendreBasis::new(2).unwrap();
        // i runs fastest
        assert_eq!(basis.reference_coordinates(NodeIndex::new(1)), (0.0, -1.0));
        assert_eq!(basis.reference_coordinates(NodeIndex::new(3)), (-1.0, 0.0));
        assert_eq!(basis.reference_coordinates(NodeIndex::new(8)), (1.0, 1.0));
    }
}
