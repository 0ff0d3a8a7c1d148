//! Host-side buffer list and constant bank.
//!
//! These are the in-memory implementations of [`BufferReader`],
//! [`BufferWriter`] and [`ConstantBank`] used when filter passes run on
//! the host. Device-backed storage implements the same traits elsewhere.

use indexmap::IndexMap;

use crate::field::ParticleField;
use crate::neighbors::NeighborList;
use crate::traits::{BufferReader, BufferWriter, ConstantBank};

/// A named collection of per-particle arrays plus the neighbor list.
///
/// A simulation keeps two of these (read and write) and swaps them
/// between iterations.
#[derive(Clone, Debug, Default)]
pub struct BufferList {
    fields: IndexMap<ParticleField, Vec<f32>>,
    neighbors: Option<NeighborList>,
}

impl BufferList {
    /// Create an empty buffer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a zeroed buffer for `field` sized for `particles`.
    pub fn allocate(&mut self, field: ParticleField, particles: usize) {
        self.fields
            .insert(field, vec![0.0; particles * field.components()]);
    }

    /// Replace the contents of `field`.
    pub fn set(&mut self, field: ParticleField, data: Vec<f32>) {
        self.fields.insert(field, data);
    }

    /// Attach the neighbor list for the current iteration.
    pub fn set_neighbors(&mut self, neighbors: NeighborList) {
        self.neighbors = Some(neighbors);
    }

    /// Copy every buffer of `other` that this list also holds.
    ///
    /// Used to seed the write list from the read list before a pass so
    /// that fields a filter does not own carry over unchanged.
    pub fn copy_from(&mut self, other: &BufferList) {
        for (field, dst) in self.fields.iter_mut() {
            if let Some(src) = other.fields.get(field) {
                dst.clear();
                dst.extend_from_slice(src);
            }
        }
    }
}

impl BufferReader for BufferList {
    fn read(&self, field: ParticleField) -> Option<&[f32]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }

    fn neighbors(&self) -> Option<&NeighborList> {
        self.neighbors.as_ref()
    }
}

impl BufferWriter for BufferList {
    fn write(&mut self, field: ParticleField) -> Option<&mut [f32]> {
        self.fields.get_mut(&field).map(|v| v.as_mut_slice())
    }
}

/// Host-memory [`ConstantBank`].
#[derive(Clone, Debug, Default)]
pub struct HostConstantBank {
    symbols: IndexMap<&'static str, Vec<f32>>,
}

impl HostConstantBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a symbol in place, as a backend-side update would.
    ///
    /// Returns `false` if the symbol was never uploaded.
    pub fn overwrite(&mut self, symbol: &str, values: &[f32]) -> bool {
        match self.symbols.get_mut(symbol) {
            Some(slot) => {
                slot.clear();
                slot.extend_from_slice(values);
                true
            }
            None => false,
        }
    }

    /// Number of symbols uploaded so far.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether nothing has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl ConstantBank for HostConstantBank {
    fn upload(&mut self, symbol: &'static str, values: &[f32]) {
        let slot = self.symbols.entry(symbol).or_default();
        slot.clear();
        slot.extend_from_slice(values);
    }

    fn download(&self, symbol: &str) -> Option<&[f32]> {
        self.symbols.get(symbol).map(|v| v.as_slice())
    }
}
