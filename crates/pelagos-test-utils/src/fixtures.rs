//! Reusable particle fixtures and filter engines for tests.
//!
//! - [`lattice_block`]: a cubic lattice of particles at rest.
//! - [`brute_force_neighbors`]: an O(n²) reference neighbor search.
//! - [`RecordingFilter`]: an engine that logs its lifecycle calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pelagos_core::{
    BufferList, BufferReader, ConstantBank, FieldSet, FilterError, NeighborList, ParticleField,
};
use pelagos_filter::{Cadence, FilterContext, FilterEngine, FilterReport};

/// An `nx × ny × nz` block of particles on a cubic lattice.
///
/// Positions start at the origin with the given spacing. Every particle
/// has zero velocity, the given rest density, and mass
/// `density * spacing³`. No neighbor list is attached.
pub fn lattice_block(nx: usize, ny: usize, nz: usize, spacing: f32, density: f32) -> BufferList {
    let n = nx * ny * nz;
    let mut positions = Vec::with_capacity(n * 3);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                positions.extend_from_slice(&[
                    i as f32 * spacing,
                    j as f32 * spacing,
                    k as f32 * spacing,
                ]);
            }
        }
    }
    let mass = density * spacing * spacing * spacing;

    let mut list = BufferList::new();
    list.set(ParticleField::Position, positions);
    list.allocate(ParticleField::Velocity, n);
    list.set(ParticleField::Density, vec![density; n]);
    list.set(ParticleField::Mass, vec![mass; n]);
    list
}

/// Interleaved positions of a buffer list, empty if absent.
pub fn positions_of(list: &BufferList) -> &[f32] {
    list.read(ParticleField::Position).unwrap_or(&[])
}

/// Every pair closer than `radius`, excluding self, by exhaustive search.
pub fn brute_force_neighbors(positions: &[f32], radius: f32) -> NeighborList {
    let n = positions.len() / 3;
    let r2 = radius * radius;
    let lists = (0..n).map(|i| {
        let pi = &positions[i * 3..i * 3 + 3];
        (0..n as u32)
            .filter(move |&j| {
                let pj = &positions[j as usize * 3..j as usize * 3 + 3];
                let d2: f32 = pi.iter().zip(pj).map(|(a, b)| (a - b) * (a - b)).sum();
                d2 < r2
            })
            .collect::<Vec<u32>>()
    });
    NeighborList::from_lists(lists)
}

/// A lifecycle call observed by [`RecordingFilter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterEvent {
    /// `set_constants()` was called.
    SetConstants,
    /// `process()` ran over this many particles.
    Process { particles: usize },
    /// `get_constants()` was called.
    GetConstants,
}

/// Shared handle to a [`RecordingFilter`]'s event log.
pub type EventLog = Arc<Mutex<Vec<FilterEvent>>>;

/// Records every lifecycle call in a shared log.
///
/// Uploads its call counter as a constant and requires it back in
/// `process()`, so a driver that skips `set_constants()` fails the pass.
/// If constructed with [`writing`](RecordingFilter::writing), fills that
/// field over the processed range with the call index.
pub struct RecordingFilter {
    name: String,
    cadence: Cadence,
    output: Option<ParticleField>,
    calls: AtomicUsize,
    log: EventLog,
}

impl RecordingFilter {
    /// Symbol of the uploaded call counter.
    pub const COUNTER_SYMBOL: &'static str = "d_recording_calls";

    pub fn new(name: impl Into<String>, frequency: u32) -> Self {
        Self {
            name: name.into(),
            cadence: Cadence::every(frequency),
            output: None,
            calls: AtomicUsize::new(0),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Also write `field` on every pass.
    pub fn writing(mut self, field: ParticleField) -> Self {
        self.output = Some(field);
        self
    }

    /// A handle to the event log, usable after the engine is boxed.
    pub fn log(&self) -> EventLog {
        Arc::clone(&self.log)
    }

    /// How many times `process()` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn record(&self, event: FilterEvent) {
        if let Ok(mut log) = self.log.lock() {
            log.push(event);
        }
    }
}

impl FilterEngine for RecordingFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
    }

    fn writes(&self) -> FieldSet {
        self.output.into_iter().collect()
    }

    fn frequency(&self) -> u32 {
        self.cadence.frequency()
    }

    fn set_frequency(&mut self, frequency: u32) {
        self.cadence = Cadence::every(frequency);
    }

    fn set_constants(&self, bank: &mut dyn ConstantBank) {
        bank.upload(Self::COUNTER_SYMBOL, &[self.calls() as f32]);
        self.record(FilterEvent::SetConstants);
    }

    fn get_constants(&mut self, _bank: &dyn ConstantBank) {
        self.record(FilterEvent::GetConstants);
    }

    fn process(&self, ctx: &mut FilterContext<'_>) -> Result<FilterReport, FilterError> {
        ctx.scalar_constant(&self.name, Self::COUNTER_SYMBOL)?;
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        let end = ctx.particle_range_end();
        if let Some(field) = self.output {
            ctx.write_field(&self.name, field)?.fill(n as f32);
        }
        self.record(FilterEvent::Process { particles: end });
        Ok(FilterReport::new(end, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_has_expected_layout() {
        let list = lattice_block(2, 3, 4, 0.5, 1000.0);
        let pos = positions_of(&list);
        assert_eq!(pos.len(), 24 * 3);
        assert_eq!(&pos[3..6], &[0.5, 0.0, 0.0]);
        assert_eq!(&pos[69..72], &[0.5, 1.0, 1.5]);
        let mass = list.read(ParticleField::Mass).unwrap();
        assert!((mass[0] - 125.0).abs() < 1e-3);
    }

    #[test]
    fn brute_force_finds_axis_neighbors_only() {
        let list = lattice_block(3, 1, 1, 1.0, 1.0);
        let nl = brute_force_neighbors(positions_of(&list), 1.5);
        assert_eq!(nl.neighbors_of(0), &[1]);
        assert_eq!(nl.neighbors_of(1), &[0, 2]);
        assert_eq!(nl.neighbors_of(2), &[1]);
    }
}
