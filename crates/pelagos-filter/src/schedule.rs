//! Driver-side scheduling of filter engines.
//!
//! [`FilterSchedule`] owns the registered engines, checks them once at
//! startup with [`validate()`](FilterSchedule::validate), and on every
//! iteration runs the engines that are due, each bracketed by its
//! constants upload and download.
//!
//! Engines due on the same iteration are chained: each one reads the
//! fields written by the engines before it, so two density filters
//! compose instead of the later one discarding the earlier result.

use std::error::Error;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace, warn};
use smallvec::SmallVec;

use pelagos_core::{
    BufferReader, BufferWriter, ConstantBank, FieldSet, FilterError, ModelError, NeighborList,
    ParticleField,
};

use crate::context::{FilterContext, PassParams};
use crate::engine::FilterEngine;
use crate::report::FilterReport;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from schedule or model validation (startup-time).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Two engines share a name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// The physical model is invalid.
    Model(ModelError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "filter '{name}' is registered more than once")
            }
            Self::Model(e) => write!(f, "model: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

/// A filter pass failed during an iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleError {
    /// Name of the failing engine.
    pub engine: String,
    /// Iteration at which it ran.
    pub iteration: u64,
    /// What went wrong.
    pub source: FilterError,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "filter '{}' failed at iteration {}: {}",
            self.engine, self.iteration, self.source
        )
    }
}

impl Error for ScheduleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

// ── Schedule ───────────────────────────────────────────────────────

/// One engine's outcome in an iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRecord {
    /// Engine name.
    pub engine: String,
    /// Pass statistics.
    pub report: FilterReport,
}

/// The set of filter engines a simulation runs, in registration order.
#[derive(Default)]
pub struct FilterSchedule {
    engines: Vec<Box<dyn FilterEngine>>,
}

impl FilterSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an engine.
    pub fn register(&mut self, engine: Box<dyn FilterEngine>) {
        self.engines.push(engine);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, engine: Box<dyn FilterEngine>) -> Self {
        self.register(engine);
        self
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether no engine is registered.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Registered engines in order.
    pub fn engines(&self) -> &[Box<dyn FilterEngine>] {
        &self.engines
    }

    /// Look up an engine by name, e.g. to change its frequency.
    pub fn engine_mut(&mut self, name: &str) -> Option<&mut dyn FilterEngine> {
        self.engines
            .iter_mut()
            .find(|e| e.name() == name)
            .map(|e| e.as_mut())
    }

    /// Check structural invariants.
    ///
    /// Engine names must be distinct, since [`engine_mut`](Self::engine_mut)
    /// and [`ScheduleError`] identify engines by name. Several engines may
    /// write the same field; see [`run_iteration`](Self::run_iteration).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for engine in &self.engines {
            if !seen.insert(engine.name()) {
                return Err(ConfigError::DuplicateName {
                    name: engine.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Indices of the engines due at `iteration`.
    pub fn due_engines(&self, iteration: u64) -> SmallVec<[usize; 4]> {
        self.engines
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_due(iteration))
            .map(|(i, _)| i)
            .collect()
    }

    /// Run every engine due at `iteration`.
    ///
    /// For each due engine, in registration order: upload its constants,
    /// run one pass into `writes`, then download constants. The first
    /// engine reads `reads`; every later one sees the fields already
    /// written this iteration over `[0, particle_range_end)` and `reads`
    /// everywhere else. Stops at the first failing pass.
    ///
    /// # Errors
    ///
    /// Invalid `params` fail before any constant is uploaded. A failing
    /// pass still has its constants downloaded before the error returns.
    pub fn run_iteration(
        &mut self,
        iteration: u64,
        reads: &dyn BufferReader,
        writes: &mut dyn BufferWriter,
        constants: &mut dyn ConstantBank,
        params: PassParams,
    ) -> Result<Vec<PassRecord>, ScheduleError> {
        let due = self.due_engines(iteration);
        let Some(&first) = due.first() else {
            return Ok(Vec::new());
        };
        params.validate().map_err(|source| ScheduleError {
            engine: self.engines[first].name().to_string(),
            iteration,
            source,
        })?;

        let mut chained = ChainedReader::new(reads);
        let mut records = Vec::with_capacity(due.len());

        for (position, &index) in due.iter().enumerate() {
            let engine = &mut self.engines[index];
            let name = engine.name().to_string();
            let fail = |source| ScheduleError {
                engine: name.clone(),
                iteration,
                source,
            };

            engine.set_constants(constants);
            trace!("filter '{name}': constants uploaded for iteration {iteration}");

            let outcome = FilterContext::new(&chained, &mut *writes, &*constants, params)
                .and_then(|mut ctx| engine.process(&mut ctx));

            engine.get_constants(&*constants);
            trace!("filter '{name}': constants downloaded");

            let report = outcome.map_err(&fail)?;
            debug!(
                "filter '{name}' at iteration {iteration}: {} filtered, {} fallbacks",
                report.filtered, report.fallbacks
            );
            if report.fallback_ratio() > 0.5 {
                warn!(
                    "filter '{name}' fell back on {} of {} particles at iteration {iteration}",
                    report.fallbacks,
                    report.visited()
                );
            }

            let downstream = due[position + 1..]
                .iter()
                .fold(FieldSet::empty(), |acc, &later| {
                    acc.union(&self.engines[later].reads())
                });
            let handed_on = self.engines[index].writes().intersection(&downstream);
            for field in handed_on.iter() {
                chained.stage(field, &mut *writes, params.particle_range_end);
            }

            records.push(PassRecord {
                engine: name,
                report,
            });
        }

        Ok(records)
    }
}

// ── Chaining ───────────────────────────────────────────────────────

/// Read view of one iteration: fields staged from earlier passes, then
/// the caller's source buffers.
struct ChainedReader<'r> {
    base: &'r dyn BufferReader,
    staged: IndexMap<ParticleField, Vec<f32>>,
}

impl<'r> ChainedReader<'r> {
    fn new(base: &'r dyn BufferReader) -> Self {
        Self {
            base,
            staged: IndexMap::new(),
        }
    }

    /// Overlay the first `range_end` particles of `field` from `writes`.
    ///
    /// Particles past the range keep their current read value. A field
    /// missing from either side is left alone; the next pass reports it.
    fn stage(&mut self, field: ParticleField, writes: &mut dyn BufferWriter, range_end: usize) {
        let Some(current) = self.read(field).map(<[f32]>::to_vec) else {
            return;
        };
        let Some(written) = writes.write(field) else {
            return;
        };
        let mut merged = current;
        let n = (range_end * field.components())
            .min(merged.len())
            .min(written.len());
        merged[..n].copy_from_slice(&written[..n]);
        self.staged.insert(field, merged);
    }
}

impl BufferReader for ChainedReader<'_> {
    fn read(&self, field: ParticleField) -> Option<&[f32]> {
        match self.staged.get(&field) {
            Some(data) => Some(data),
            None => self.base.read(field),
        }
    }

    fn neighbors(&self) -> Option<&NeighborList> {
        self.base.neighbors()
    }
}
