//! Per-node geometric metrics of 2D tensor-product elements.
//!
//! The mesh (tree refinement, connectivity) is owned elsewhere; the core only
//! consumes the inverse Jacobian determinant and the physical coordinates at
//! each node. Both are fixed before any per-element loop starts.

use crate::basis::LobattoLegendreBasis;
use crate::config::ConfigError;
use crate::types::{ElementIndex, NodeIndex};

/// Geometric metrics for a flat collection of local elements.
///
/// Layout is element-major: entry `k * n_nodes + node`.
#[derive(Clone, Debug)]
pub struct ElementGeometry2D {
    n_elements: usize,
    n_nodes_1d: usize,
    /// Inverse of the Jacobian determinant `1 / det(∂x/∂ξ)` at each node.
    inverse_jacobian: Vec<f64>,
    /// Physical node coordinates `(x, y)`.
    node_coordinates: Vec<(f64, f64)>,
    /// Node volume weights `w_i w_j / |J⁻¹|`, precomputed from the above.
    volume_weights: Vec<f64>,
}

impl ElementGeometry2D {
    /// Build the geometry from per-node inverse Jacobians and coordinates.
    ///
    /// Both vectors must hold `n_elements * basis.n_nodes()` entries and every
    /// inverse Jacobian must be finite and non-zero.
    pub fn new(
        basis: &LobattoLegendreBasis,
        n_elements: usize,
        inverse_jacobian: Vec<f64>,
        node_coordinates: Vec<(f64, f64)>,
    ) -> Result<Self, ConfigError> {
        let n_nodes = basis.n_nodes();
        let expected = n_elements * n_nodes;
        if inverse_jacobian.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                what: "inverse_jacobian",
                expected,
                actual: inverse_jacobian.len(),
            });
        }
        if node_coordinates.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                what: "node_coordinates",
                expected,
                actual: node_coordinates.len(),
            });
        }
        if let Some(pos) = inverse_jacobian
            .iter()
            .position(|j| !j.is_finite() || *j == 0.0)
        {
            return Err(ConfigError::DegenerateJacobian {
                element: pos / n_nodes,
                node: pos % n_nodes,
            });
        }

        let volume_weights = inverse_jacobian
            .iter()
            .enumerate()
            .map(|(idx, inv_j)| basis.tensor_weight(NodeIndex::new(idx % n_nodes)) / inv_j.abs())
            .collect();

        Ok(Self {
            n_elements,
            n_nodes_1d: basis.n_nodes_1d(),
            inverse_jacobian,
            node_coordinates,
            volume_weights,
        })
    }

    /// Build a geometry from an element mapping.
    ///
    /// `mapping(k, xi, eta)` returns the physical coordinates of the reference
    /// point and the inverse Jacobian determinant there.
    pub fn from_mapping<F>(
        basis: &LobattoLegendreBasis,
        n_elements: usize,
        mapping: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(ElementIndex, f64, f64) -> ((f64, f64), f64),
    {
        let n_nodes = basis.n_nodes();
        let mut inverse_jacobian = Vec::with_capacity(n_elements * n_nodes);
        let mut node_coordinates = Vec::with_capacity(n_elements * n_nodes);

        for k in ElementIndex::iter(n_elements) {
            for node in NodeIndex::iter(n_nodes) {
                let (xi, eta) = basis.reference_coordinates(node);
                let (xy, inv_j) = mapping(k, xi, eta);
                node_coordinates.push(xy);
                inverse_jacobian.push(inv_j);
            }
        }

        Self::new(basis, n_elements, inverse_jacobian, node_coordinates)
    }

    /// Uniform Cartesian elements covering `[x_min, x_max] × [y_min, y_max]`.
    ///
    /// Elements are numbered row by row, `k = ex + ey * nx`. This is the leaf
    /// layer of a uniformly refined tree.
    pub fn uniform_cartesian(
        basis: &LobattoLegendreBasis,
        (x_min, x_max): (f64, f64),
        (y_min, y_max): (f64, f64),
        nx: usize,
        ny: usize,
    ) -> Result<Self, ConfigError> {
        let dx = (x_max - x_min) / nx as f64;
        let dy = (y_max - y_min) / ny as f64;
        let inv_j = 4.0 / (dx * dy);

        Self::from_mapping(basis, nx * ny, |k, xi, eta| {
            let ex = k.as_usize() % nx;
            let ey = k.as_usize() / nx;
            let x = x_min + (ex as f64 + 0.5 * (xi + 1.0)) * dx;
            let y = y_min + (ey as f64 + 0.5 * (eta + 1.0)) * dy;
            ((x, y), inv_j)
        })
    }

    /// Number of elements.
    #[inline]
    pub fn n_elements(&self) -> usize {
        self.n_elements
    }

    /// Nodes per element.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.n_nodes_1d * self.n_nodes_1d
    }

    /// Nodes per direction.
    #[inline]
    pub fn n_nodes_1d(&self) -> usize {
        self.n_nodes_1d
    }

    /// Inverse Jacobian determinant at a node.
    #[inline]
    pub fn inverse_jacobian(&self, k: ElementIndex, node: NodeIndex) -> f64 {
        self.inverse_jacobian[k.as_usize() * self.n_nodes() + node.as_usize()]
    }

    /// Physical coordinates of a node.
    #[inline]
    pub fn node_coordinates(&self, k: ElementIndex, node: NodeIndex) -> (f64, f64) {
        self.node_coordinates[k.as_usize() * self.n_nodes() + node.as_usize()]
    }

    /// Node volume weights of one element.
    #[inline]
    pub fn element_volume_weights(&self, k: ElementIndex) -> &[f64] {
        let n = self.n_nodes();
        &self.volume_weights[k.as_usize() * n..(k.as_usize() + 1) * n]
    }

    /// Inverse Jacobians of one element.
    #[inline]
    pub fn element_inverse_jacobian(&self, k: ElementIndex) -> &[f64] {
        let n = self.n_nodes();
        &self.inverse_jacobian[k.as_usize() * n..(k.as_usize() + 1) * n]
    }

    /// Physical volume of an element.
    pub fn element_volume(&self, k: ElementIndex) -> f64 {
        self.element_volume_weights(k).iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn basis() -> LobattoLegendreBasis {
        LobattoLegendreBasis::new(3).unwrap()
    }

    #[test]
    fn test_uniform_cartesian_volumes() {
        let basis = basis();
        let geom = ElementGeometry2D::uniform_cartesian(&basis, (0.0, 2.0), (0.0, 1.0), 4, 2).unwrap();

        assert_eq!(geom.n_elements(), 8);
        for k in ElementIndex::iter(geom.n_elements()) {
            assert!((geom.element_volume(k) - 0.25).abs() < TOL);
        }
        let total: f64 = ElementIndex::iter(8).map(|k| geom.element_volume(k)).sum();
        assert!((total - 2.0).abs() < TOL);
    }

    #[test]
    fn test_uniform_cartesian_coordinates() {
        let basis = basis();
        let geom = ElementGeometry2D::uniform_cartesian(&basis, (0.0, 2.0), (0.0, 1.0), 2, 1).unwrap();

        let last = NodeIndex::new(basis.n_nodes() - 1);
        assert_eq!(geom.node_coordinates(ElementIndex::new(0), NodeIndex::new(0)), (0.0, 0.0));
        let (x, y) = geom.node_coordinates(ElementIndex::new(1), last);
        assert!((x - 2.0).abs() < TOL);
        assert!((y - 1.0).abs() < TOL);
    }

    #[test]
    fn test_dimension_mismatch() {
        let basis = basis();
        let err = ElementGeometry2D::new(&basis, 2, vec![1.0; 3], vec![(0.0, 0.0); 32]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DimensionMismatch { what: "inverse_jacobian", expected: 32, actual: 3 }
        ));
    }

    #[test]
    fn test_degenerate_jacobian_rejected() {
        let basis = basis();
        let mut inv_j = vec![1.0; 32];
        inv_j[21] = 0.0;
        let err = ElementGeometry2D::new(&basis, 2, inv_j, vec![(0.0, 0.0); 32]).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateJacobian { element: 1, node: 5 }));
    }

    #[test]
    fn test_varying_jacobian_weights() {
        let basis = basis();
        // Jacobian determinant doubles across the element in xi.
        let geom = ElementGeometry2D::from_mapping(&basis, 1, |_, xi, eta| {
            let det_j = 1.5 + 0.5 * xi;
            ((xi, eta), 1.0 / det_j)
        })
        .unwrap();

        // ∫∫ (1.5 + 0.5 xi) dxi deta = 6 over [-1, 1]²
        assert!((geom.element_volume(ElementIndex::new(0)) - 6.0).abs() < TOL);
    }
}
