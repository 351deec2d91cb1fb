//! Fixed-size state vectors.
//!
//! Every equation family stores its conserved, primitive and entropy
//! variables in small `Copy` structs with named fields. [`StateVector`] is
//! the shared interface the generic fluxes and limiters work against.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A point value of an equation family's variables.
pub trait StateVector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + AddAssign
{
    /// Number of variables.
    const N_VARS: usize;

    /// All components zero.
    #[inline(always)]
    fn zero() -> Self {
        Self::default()
    }

    /// Read from the first `N_VARS` entries of a node slice.
    fn from_slice(values: &[f64]) -> Self;

    /// Write into the first `N_VARS` entries of a node slice.
    fn write_to(&self, out: &mut [f64]);

    /// Component `var`.
    fn get(&self, var: usize) -> f64;

    /// Euclidean inner product.
    fn dot(&self, other: &Self) -> f64 {
        (0..Self::N_VARS).map(|v| self.get(v) * other.get(v)).sum()
    }

    /// Largest componentwise absolute difference.
    fn max_abs_diff(&self, other: &Self) -> f64 {
        (0..Self::N_VARS)
            .map(|v| (self.get(v) - other.get(v)).abs())
            .fold(0.0, f64::max)
    }

    /// `true` if no component is NaN or infinite.
    fn is_finite(&self) -> bool {
        (0..Self::N_VARS).all(|v| self.get(v).is_finite())
    }
}

macro_rules! define_state {
    (
        $(#[$meta:meta])*
        $name:ident, $n:literal {
            $( $(#[$fmeta:meta])* $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: f64, )+
        }

        impl $name {
            #[inline(always)]
            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }

            #[inline(always)]
            pub fn to_array(&self) -> [f64; $n] {
                [$(self.$field),+]
            }

            #[inline(always)]
            pub fn from_array(values: [f64; $n]) -> Self {
                let [$($field),+] = values;
                Self { $($field),+ }
            }
        }

        impl $crate::equations::StateVector for $name {
            const N_VARS: usize = $n;

            #[inline(always)]
            fn from_slice(values: &[f64]) -> Self {
                let mut array = [0.0; $n];
                array.copy_from_slice(&values[..$n]);
                Self::from_array(array)
            }

            #[inline(always)]
            fn write_to(&self, out: &mut [f64]) {
                out[..$n].copy_from_slice(&self.to_array());
            }

            #[inline(always)]
            fn get(&self, var: usize) -> f64 {
                self.to_array()[var]
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;

            #[inline(always)]
            fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field),+ }
            }
        }

        impl std::ops::AddAssign for $name {
            #[inline(always)]
            fn add_assign(&mut self, other: Self) {
                $(self.$field += other.$field;)+
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field),+ }
            }
        }

        impl std::ops::Neg for $name {
            type Output = Self;

            #[inline(always)]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl std::ops::Mul<f64> for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, scalar: f64) -> Self {
                Self { $($field: self.$field * scalar),+ }
            }
        }

        impl std::ops::Mul<$name> for f64 {
            type Output = $name;

            #[inline(always)]
            fn mul(self, state: $name) -> $name {
                state * self
            }
        }
    };
}

pub(crate) use define_state;
