//! Nodal solution storage for 2D systems of conservation laws.
//!
//! Provides a multi-variable container with interleaved layout for good cache
//! locality during flux and limiter computations.

use crate::equations::StateVector;
use crate::types::{ElementIndex, NodeIndex};

/// Solution storage for 2D systems of N conservation laws.
///
/// Stores nodal values in interleaved layout:
/// `data[k * n_nodes * N + i * N + var]` for element k, node i, variable var.
/// Nodes of an element are numbered `i + j * n_1d` (see [`NodeIndex`]).
///
/// This layout keeps every element a contiguous slice, which is what the
/// per-element loops hand out to workers.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSolution2D<const N: usize> {
    /// Nodal values in interleaved layout
    pub data: Vec<f64>,
    /// Number of elements
    pub n_elements: usize,
    /// Number of nodes per element
    pub n_nodes: usize,
}

impl<const N: usize> SystemSolution2D<N> {
    /// Create a new solution storage initialized to zero.
    pub fn new(n_elements: usize, n_nodes: usize) -> Self {
        Self {
            data: vec![0.0; n_elements * n_nodes * N],
            n_elements,
            n_nodes,
        }
    }

    /// Create a solution from raw interleaved data.
    ///
    /// Returns `None` if `data.len() != n_elements * n_nodes * N`.
    pub fn from_data(data: Vec<f64>, n_elements: usize, n_nodes: usize) -> Option<Self> {
        (data.len() == n_elements * n_nodes * N).then_some(Self {
            data,
            n_elements,
            n_nodes,
        })
    }

    /// Fill every node with the state returned by `f(element, node)`.
    pub fn from_fn<S, F>(n_elements: usize, n_nodes: usize, mut f: F) -> Self
    where
        S: StateVector,
        F: FnMut(ElementIndex, NodeIndex) -> S,
    {
        let mut solution = Self::new(n_elements, n_nodes);
        for k in ElementIndex::iter(n_elements) {
            for i in NodeIndex::iter(n_nodes) {
                solution.set_state(k, i, &f(k, i));
            }
        }
        solution
    }

    #[inline(always)]
    fn offset(&self, k: ElementIndex, i: NodeIndex) -> usize {
        (k.as_usize() * self.n_nodes + i.as_usize()) * N
    }

    /// Get the raw values at node i in element k.
    #[inline(always)]
    pub fn get(&self, k: ElementIndex, i: NodeIndex) -> [f64; N] {
        let base = self.offset(k, i);
        let mut result = [0.0; N];
        result.copy_from_slice(&self.data[base..base + N]);
        result
    }

    /// Set the raw values at node i in element k.
    #[inline(always)]
    pub fn set(&mut self, k: ElementIndex, i: NodeIndex, values: [f64; N]) {
        let base = self.offset(k, i);
        self.data[base..base + N].copy_from_slice(&values);
    }

    /// Get the state at node i in element k.
    #[inline(always)]
    pub fn get_state<S: StateVector>(&self, k: ElementIndex, i: NodeIndex) -> S {
        debug_assert_eq!(S::N_VARS, N);
        let base = self.offset(k, i);
        S::from_slice(&self.data[base..base + N])
    }

    /// Set the state at node i in element k.
    #[inline(always)]
    pub fn set_state<S: StateVector>(&mut self, k: ElementIndex, i: NodeIndex, state: &S) {
        debug_assert_eq!(S::N_VARS, N);
        let base = self.offset(k, i);
        state.write_to(&mut self.data[base..base + N]);
    }

    /// Get a single variable at node i in element k.
    #[inline(always)]
    pub fn get_var(&self, k: ElementIndex, i: NodeIndex, var: usize) -> f64 {
        self.data[self.offset(k, i) + var]
    }

    /// Number of values per element.
    #[inline(always)]
    pub fn element_len(&self) -> usize {
        self.n_nodes * N
    }

    /// Get direct slice access to element data for batch operations.
    #[inline(always)]
    pub fn element_data(&self, k: ElementIndex) -> &[f64] {
        let start = k.as_usize() * self.element_len();
        &self.data[start..start + self.element_len()]
    }

    /// Get mutable direct slice access to element data for batch operations.
    #[inline(always)]
    pub fn element_data_mut(&mut self, k: ElementIndex) -> &mut [f64] {
        let len = self.element_len();
        let start = k.as_usize() * len;
        &mut self.data[start..start + len]
    }

    /// Get maximum absolute value for a specific variable.
    pub fn max_abs_var(&self, var: usize) -> f64 {
        self.data
            .chunks_exact(N)
            .map(|node| node[var].abs())
            .fold(0.0, f64::max)
    }

    /// Copy from another solution.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.data.len(), other.data.len());
        self.data.copy_from_slice(&other.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::ShallowWaterState2D;

    #[test]
    fn test_solution_layout() {
        let mut sol: SystemSolution2D<4> = SystemSolution2D::new(3, 4);
        assert_eq!(sol.data.len(), 3 * 4 * 4);

        let k = ElementIndex::new(1);
        let i = NodeIndex::new(2);
        sol.set(k, i, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(sol.data[(4 + 2) * 4 + 1], 2.0);
        assert_eq!(sol.get_var(k, i, 3), 4.0);
        assert_eq!(sol.element_data(k)[2 * 4], 1.0);
    }

    #[test]
    fn test_state_access() {
        let sol: SystemSolution2D<4> = SystemSolution2D::from_fn(2, 4, |k, i| {
            ShallowWaterState2D::new(1.0 + k.as_usize() as f64, i.as_usize() as f64, 0.0, 0.5)
        });
        let s: ShallowWaterState2D = sol.get_state(ElementIndex::new(1), NodeIndex::new(3));
        assert_eq!(s, ShallowWaterState2D::new(2.0, 3.0, 0.0, 0.5));
        assert_eq!(sol.max_abs_var(1), 3.0);
    }

    #[test]
    fn test_from_data_checks_length() {
        assert!(SystemSolution2D::<4>::from_data(vec![0.0; 15], 1, 4).is_none());
        assert!(SystemSolution2D::<4>::from_data(vec![0.0; 16], 1, 4).is_some());
    }
}
