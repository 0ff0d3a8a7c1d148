//! The [`FilterEngine`] trait and its activation [`Cadence`].
//!
//! Filter engines are strategy objects that periodically re-project a
//! particle field (typically density) from its neighborhood. They own no
//! particle data and no scheduling logic beyond their frequency; the
//! driver decides when to call them.

use pelagos_core::{ConstantBank, FieldSet, FilterError};

use crate::context::FilterContext;
use crate::report::FilterReport;

/// How often an engine runs, in iterations.
///
/// A frequency of `n > 0` activates the engine on every iteration that
/// is a multiple of `n`, starting with iteration 0. A frequency of 0
/// disables the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Cadence {
    frequency: u32,
}

impl Cadence {
    /// Run every `frequency` iterations (0 disables).
    pub const fn every(frequency: u32) -> Self {
        Self { frequency }
    }

    /// Never run.
    pub const fn disabled() -> Self {
        Self { frequency: 0 }
    }

    /// Iterations between activations.
    pub const fn frequency(self) -> u32 {
        self.frequency
    }

    /// Whether the engine never runs.
    pub const fn is_disabled(self) -> bool {
        self.frequency == 0
    }

    /// Whether an engine with this cadence runs at `iteration`.
    pub const fn is_due(self, iteration: u64) -> bool {
        self.frequency != 0 && iteration % self.frequency as u64 == 0
    }
}

/// A periodic field-correction pass.
///
/// # Contract
///
/// - `process()` reads only the fields in `reads()` and writes only the
///   fields in `writes()`, and only for particles in
///   `[0, particle_range_end)`.
/// - Per-particle results are independent within one pass, so `process()`
///   may run data-parallel.
/// - `set_constants()` is called before every `process()` and
///   `get_constants()` after it, by the same driver.
///
/// # Object safety
///
/// This trait is object-safe; the schedule stores engines as
/// `Vec<Box<dyn FilterEngine>>`.
///
/// # Examples
///
/// An engine that clamps density from below:
///
/// ```
/// use pelagos_core::{FieldSet, FilterError, ParticleField};
/// use pelagos_filter::{Cadence, FilterContext, FilterEngine, FilterReport};
///
/// struct DensityFloor {
///     cadence: Cadence,
///     floor: f32,
/// }
///
/// impl FilterEngine for DensityFloor {
///     fn name(&self) -> &str { "density_floor" }
///
///     fn reads(&self) -> FieldSet { FieldSet::empty().with(ParticleField::Density) }
///
///     fn writes(&self) -> FieldSet { FieldSet::empty().with(ParticleField::Density) }
///
///     fn frequency(&self) -> u32 { self.cadence.frequency() }
///
///     fn set_frequency(&mut self, frequency: u32) { self.cadence = Cadence::every(frequency); }
///
///     fn process(&self, ctx: &mut FilterContext<'_>) -> Result<FilterReport, FilterError> {
///         let name = self.name();
///         let src = ctx.read_field(name, ParticleField::Density)?;
///         let end = ctx.particle_range_end();
///         let dst = ctx.write_field(name, ParticleField::Density)?;
///         for (d, s) in dst.iter_mut().zip(&src[..end]) {
///             *d = s.max(self.floor);
///         }
///         Ok(FilterReport::new(end, 0))
///     }
/// }
///
/// let engine = DensityFloor { cadence: Cadence::every(10), floor: 1.0 };
/// assert!(engine.is_due(20));
/// assert!(!engine.is_due(25));
/// ```
pub trait FilterEngine: Send + Sync + 'static {
    /// Human-readable name for logging and error reporting.
    fn name(&self) -> &str;

    /// Fields this engine reads.
    fn reads(&self) -> FieldSet;

    /// Fields this engine writes.
    fn writes(&self) -> FieldSet;

    /// Iterations between activations (0 disables).
    fn frequency(&self) -> u32;

    /// Change the activation frequency.
    fn set_frequency(&mut self, frequency: u32);

    /// Whether the driver should run this engine at `iteration`.
    fn is_due(&self, iteration: u64) -> bool {
        Cadence::every(self.frequency()).is_due(iteration)
    }

    /// Push algorithm constants to the compute backend.
    ///
    /// Default: nothing to upload.
    fn set_constants(&self, _bank: &mut dyn ConstantBank) {}

    /// Pull back constants the pass may have changed.
    ///
    /// Default: nothing to download.
    fn get_constants(&mut self, _bank: &dyn ConstantBank) {}

    /// Run one pass over `[0, particle_range_end)`.
    fn process(&self, ctx: &mut FilterContext<'_>) -> Result<FilterReport, FilterError>;
}
