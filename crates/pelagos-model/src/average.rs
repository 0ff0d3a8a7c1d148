//! Pairwise averaging laws.
//!
//! Numerical kernels combine a per-particle quantity of the two members
//! of an interaction pair with one of three laws. The law is a type
//! parameter ([`AverageLaw`]) so that each kernel instantiation compiles
//! down to a single inlined scalar expression; [`AveragingOperator`] is
//! the runtime configuration value, turned into a type exactly once via
//! [`AveragingOperator::specialize`].
//!
//! ```
//! use pelagos_model::average::{average, Harmonic};
//!
//! assert_eq!(average::<Harmonic>(2.0, 2.0), 2.0);
//! ```

use std::fmt;
use std::str::FromStr;

use pelagos_core::ModelError;

use crate::names::{parse_named, NameEntry};

/// The averaging law selected by a model configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AveragingOperator {
    /// `(a + b) / 2`
    Arithmetic,
    /// `2ab / (a + b)`
    Harmonic,
    /// `sqrt(ab)`
    Geometric,
}

impl AveragingOperator {
    const NAMES: [NameEntry<Self>; 3] = [
        (Self::Arithmetic, "Arithmetic", "arithmetic"),
        (Self::Harmonic, "Harmonic", "harmonic"),
        (Self::Geometric, "Geometric", "geometric"),
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }

    /// Monomorphize `kernel` for this law.
    ///
    /// This is the only place the runtime value is inspected; everything
    /// inside [`AveragingKernel::run`] sees the law as a type.
    pub fn specialize<K: AveragingKernel>(self, kernel: K) -> K::Output {
        match self {
            Self::Arithmetic => kernel.run::<Arithmetic>(),
            Self::Harmonic => kernel.run::<Harmonic>(),
            Self::Geometric => kernel.run::<Geometric>(),
        }
    }

    /// Evaluate the law through a runtime match.
    ///
    /// For setup code and diagnostics. Per-pair loops go through
    /// [`specialize`](Self::specialize) instead.
    pub fn evaluate(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Arithmetic => Arithmetic::average(a, b),
            Self::Harmonic => Harmonic::average(a, b),
            Self::Geometric => Geometric::average(a, b),
        }
    }
}

impl fmt::Display for AveragingOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AveragingOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("averaging operator", s, &Self::NAMES)
    }
}

/// A compile-time averaging law.
///
/// Implementors are zero-sized; `average` has no state and is safe to
/// call from any number of threads.
pub trait AverageLaw: Copy + Default + Send + Sync + 'static {
    /// The configuration value this law corresponds to.
    const OPERATOR: AveragingOperator;

    /// Combine two samples.
    fn average(a: f32, b: f32) -> f32;
}

/// Arithmetic mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Arithmetic;

/// Harmonic mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Harmonic;

/// Geometric mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometric;

/// 2^100: lifts a pair whose product underflows back into the normal range.
const SCALE_UP: f32 = f32::from_bits((127 + 100) << 23);
/// 2^-66: brings a pair whose product overflows below `f32::MAX`.
const SCALE_DOWN: f32 = f32::from_bits((127 - 66) << 23);

impl AverageLaw for Arithmetic {
    const OPERATOR: AveragingOperator = AveragingOperator::Arithmetic;

    #[inline(always)]
    fn average(a: f32, b: f32) -> f32 {
        let mean = (a + b) * 0.5;
        if mean.is_finite() {
            mean
        } else {
            // Finite operands whose sum overflows.
            a * 0.5 + b * 0.5
        }
    }
}

impl AverageLaw for Harmonic {
    const OPERATOR: AveragingOperator = AveragingOperator::Harmonic;

    /// A zero sum yields 0; any other degenerate input follows IEEE rules.
    #[inline(always)]
    fn average(a: f32, b: f32) -> f32 {
        // Ordered operands make the result exactly symmetric and exact on
        // the diagonal (2 hi / (lo + hi) == 1 when lo == hi).
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let sum = lo + hi;
        if sum == 0.0 {
            return 0.0;
        }
        let mean = lo * (2.0 * hi / sum);
        if mean.is_finite() {
            mean
        } else {
            // `2 hi` or the sum overflowed; the ratio is scale-free.
            let (l, h) = (lo * 0.25, hi * 0.25);
            lo * (2.0 * h / (l + h))
        }
    }
}

impl AverageLaw for Geometric {
    const OPERATOR: AveragingOperator = AveragingOperator::Geometric;

    #[inline(always)]
    fn average(a: f32, b: f32) -> f32 {
        let product = a * b;
        if product.is_normal() || a == 0.0 || b == 0.0 {
            return product.sqrt();
        }
        // The product over- or underflowed. Power-of-two scaling is exact,
        // so sqrt(a * a) == a still holds.
        let scale = if product.is_infinite() {
            SCALE_DOWN
        } else {
            SCALE_UP
        };
        ((a * scale) * (b * scale)).sqrt() / scale
    }
}

/// Average two samples with the law `L`.
#[inline(always)]
pub fn average<L: AverageLaw>(a: f32, b: f32) -> f32 {
    L::average(a, b)
}

/// Code that needs the averaging law as a type parameter.
///
/// Implement this for a numerical kernel and hand it to
/// [`AveragingOperator::specialize`]; `run` is instantiated once per law.
pub trait AveragingKernel {
    /// What the kernel produces.
    type Output;

    /// Execute with the law `L` fixed at compile time.
    fn run<L: AverageLaw>(self) -> Self::Output;
}
