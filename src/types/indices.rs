//! Strongly-typed index newtypes.
//!
//! Element and node indices are both plain `usize` underneath; keeping them
//! apart stops a node offset from being used as an element id in the
//! per-element loops.

use std::fmt;

macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Raw index value.
            #[inline]
            pub const fn as_usize(self) -> usize {
                self.0
            }

            /// Iterate over `[0, n)`.
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = $name> {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }
    };
}

define_index!(
    /// Index of a mesh element (the unit of the per-element loops).
    ///
    /// ```
    /// use dgsem_rs::types::ElementIndex;
    ///
    /// let elem = ElementIndex::new(42);
    /// assert_eq!(elem.as_usize(), 42);
    /// assert_eq!(elem.to_string(), "E42");
    /// ```
    ElementIndex,
    "E"
);

define_index!(
    /// Index of a tensor-product node inside one element.
    ///
    /// Nodes are numbered `i + j * n_1d` with `i` running fastest along the
    /// first reference coordinate.
    NodeIndex,
    "N"
);

impl NodeIndex {
    /// Build the flat node index from tensor indices `(i, j)`.
    #[inline]
    pub const fn from_tensor(i: usize, j: usize, n_1d: usize) -> Self {
        Self(i + j * n_1d)
    }

    /// Split the flat node index into tensor indices `(i, j)`.
    #[inline]
    pub const fn to_tensor(self, n_1d: usize) -> (usize, usize) {
        (self.0 % n_1d, self.0 / n_1d)
    }
}
