//! Error types for the Pelagos SPH model layer.
//!
//! Organized by when they can occur: [`ModelError`] during configuration
//! assembly (before any numerical work starts) and [`FilterError`] when a
//! filter pass cannot run at all. Per-particle numerical trouble is not
//! an error; filters fall back locally and report it in their pass
//! statistics.

use std::error::Error;
use std::fmt;

use crate::field::ParticleField;

/// Errors detected while assembling a physical-model configuration.
///
/// All of these are fatal to simulation startup and are never raised
/// once the time-stepping loop is running.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// A configuration name did not match any value of its axis.
    UnknownValue {
        /// The axis being parsed (e.g. `"turbulence"`).
        axis: &'static str,
        /// The rejected input.
        value: String,
    },
    /// An integer selector fell outside the axis' ordinal range.
    OrdinalOutOfRange {
        /// The axis being converted.
        axis: &'static str,
        /// The rejected ordinal.
        ordinal: u32,
    },
    /// The number of fluid phases is zero or above the supported maximum.
    FluidCount {
        /// The configured count.
        count: usize,
        /// The supported maximum.
        max: usize,
    },
    /// An explicit configuration's multi-fluid axis disagrees with the
    /// declared number of fluid phases.
    MultiFluidMismatch {
        /// The configured fluid count.
        fluid_count: usize,
        /// The configuration's multi-fluid flag.
        multi_fluid: bool,
    },
    /// The smoothing length is NaN, infinite, zero or negative.
    InvalidSmoothingLength {
        /// The invalid value.
        value: f32,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValue { axis, value } => {
                write!(f, "unknown {axis} '{value}'")
            }
            Self::OrdinalOutOfRange { axis, ordinal } => {
                write!(f, "{axis} ordinal {ordinal} is out of range")
            }
            Self::FluidCount { count, max } => {
                write!(f, "fluid count {count} must be between 1 and {max}")
            }
            Self::MultiFluidMismatch {
                fluid_count,
                multi_fluid,
            } => write!(
                f,
                "configuration is {}multi-fluid but {fluid_count} fluid(s) are declared",
                if *multi_fluid { "" } else { "not " }
            ),
            Self::InvalidSmoothingLength { value } => {
                write!(f, "smoothing length must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ModelError {}

/// Errors that prevent a filter pass from running.
///
/// A pass either completes for the whole particle range or fails with
/// one of these before writing anything.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterError {
    /// A buffer the filter reads or writes is not present.
    MissingBuffer {
        /// Name of the filter.
        filter: String,
        /// The missing field.
        field: ParticleField,
    },
    /// A buffer holds fewer slots than the particle range requires.
    BufferTooShort {
        /// Name of the filter.
        filter: String,
        /// The undersized field.
        field: ParticleField,
        /// Actual length in f32 slots.
        len: usize,
        /// Required length in f32 slots.
        required: usize,
    },
    /// No neighbor list was supplied, or it covers too few particles.
    MissingNeighbors {
        /// Name of the filter.
        filter: String,
    },
    /// A device constant was never uploaded for this pass.
    MissingConstant {
        /// Name of the filter.
        filter: String,
        /// The constant's symbol.
        symbol: String,
    },
    /// `particle_range_end` exceeds the number of active particles.
    InvalidRange {
        /// End of the range to process.
        particle_range_end: usize,
        /// Number of active particles.
        num_particles: usize,
    },
    /// Smoothing length or influence radius is not finite and positive.
    InvalidSmoothing {
        /// The smoothing length.
        slength: f32,
        /// The kernel influence radius.
        influence_radius: f32,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBuffer { filter, field } => {
                write!(f, "filter '{filter}' needs buffer '{field}'")
            }
            Self::BufferTooShort {
                filter,
                field,
                len,
                required,
            } => write!(
                f,
                "filter '{filter}': buffer '{field}' has {len} slots, needs {required}"
            ),
            Self::MissingNeighbors { filter } => {
                write!(f, "filter '{filter}' has no usable neighbor list")
            }
            Self::MissingConstant { filter, symbol } => {
                write!(f, "filter '{filter}': constant '{symbol}' was not uploaded")
            }
            Self::InvalidRange {
                particle_range_end,
                num_particles,
            } => write!(
                f,
                "particle range end {particle_range_end} exceeds {num_particles} active particles"
            ),
            Self::InvalidSmoothing {
                slength,
                influence_radius,
            } => write!(
                f,
                "smoothing length {slength} and influence radius {influence_radius} \
                 must be finite and positive"
            ),
        }
    }
}

impl Error for FilterError {}
