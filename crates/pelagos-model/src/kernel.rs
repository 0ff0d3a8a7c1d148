//! Smoothing kernels.
//!
//! All kernels are radially symmetric and normalized in three dimensions.
//! A kernel is split into a dimensionless [`shape`](KernelType::shape) of
//! `q = r / h` and a [`normalization`](KernelType::normalization)
//! coefficient, so that `W(r, h) = normalization * shape(r / h) / h³`.
//! Filter engines ship the coefficient to the compute backend as a
//! device constant.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use pelagos_core::ModelError;

use crate::names::{parse_named, NameEntry};

/// Smoothing kernel family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelType {
    /// Monaghan's cubic B-spline.
    CubicSpline,
    /// Johnson's quadratic kernel.
    Quadratic,
    /// Wendland C2.
    Wendland,
    /// Gaussian truncated at `3h`.
    Gaussian,
}

impl KernelType {
    const NAMES: [NameEntry<Self>; 4] = [
        (Self::CubicSpline, "Cubic spline", "cubic"),
        (Self::Quadratic, "Quadratic", "quadratic"),
        (Self::Wendland, "Wendland", "wendland"),
        (Self::Gaussian, "Gaussian", "gaussian"),
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }

    /// Support radius in units of the smoothing length.
    pub const fn radius_factor(self) -> f32 {
        match self {
            Self::Gaussian => 3.0,
            _ => 2.0,
        }
    }

    /// Influence radius for smoothing length `h`.
    pub fn influence_radius(self, h: f32) -> f32 {
        self.radius_factor() * h
    }

    /// 3-D normalization coefficient (before division by `h³`).
    pub fn normalization(self) -> f32 {
        match self {
            Self::CubicSpline => 1.0 / PI,
            Self::Quadratic => 15.0 / (16.0 * PI),
            Self::Wendland => 21.0 / (16.0 * PI),
            Self::Gaussian => 1.0 / (PI * PI.sqrt()),
        }
    }

    /// Unnormalized kernel profile; zero at and beyond the support radius.
    #[inline]
    pub fn shape(self, q: f32) -> f32 {
        if !(q < self.radius_factor()) {
            return 0.0;
        }
        match self {
            Self::CubicSpline => {
                if q < 1.0 {
                    1.0 - 1.5 * q * q + 0.75 * q * q * q
                } else {
                    let t = 2.0 - q;
                    0.25 * t * t * t
                }
            }
            Self::Quadratic => 0.25 * q * q - q + 1.0,
            Self::Wendland => {
                let t = 1.0 - 0.5 * q;
                let t2 = t * t;
                t2 * t2 * (1.0 + 2.0 * q)
            }
            Self::Gaussian => (-q * q).exp(),
        }
    }

    /// Kernel value at distance `r` with an explicit normalization.
    #[inline]
    pub fn evaluate_with(self, normalization: f32, r: f32, h: f32) -> f32 {
        normalization * self.shape(r / h) / (h * h * h)
    }

    /// Kernel value at distance `r`.
    pub fn evaluate(self, r: f32, h: f32) -> f32 {
        self.evaluate_with(self.normalization(), r, h)
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("kernel", s, &Self::NAMES)
    }
}
