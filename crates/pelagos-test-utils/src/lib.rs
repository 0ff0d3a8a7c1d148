//! Test utilities and mock types for Pelagos development.
//!
//! Provides mock implementations of the core access traits
//! ([`BufferReader`], [`BufferWriter`], [`ConstantBank`]) plus particle
//! fixtures and a recording filter engine in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use pelagos_core::{BufferReader, BufferWriter, ConstantBank, NeighborList, ParticleField};

pub use fixtures::{
    brute_force_neighbors, lattice_block, positions_of, FilterEvent, RecordingFilter,
};

/// Mock implementation of [`BufferReader`].
///
/// Backed by a `HashMap<ParticleField, Vec<f32>>`. Pre-populate with
/// [`set_field`](MockBufferReader::set_field) and
/// [`set_neighbors`](MockBufferReader::set_neighbors) before passing to
/// code under test.
#[derive(Default)]
pub struct MockBufferReader {
    fields: HashMap<ParticleField, Vec<f32>>,
    neighbors: Option<NeighborList>,
}

impl MockBufferReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a field with interleaved data.
    pub fn set_field(&mut self, field: ParticleField, data: Vec<f32>) {
        self.fields.insert(field, data);
    }

    /// Attach a neighbor list.
    pub fn set_neighbors(&mut self, neighbors: NeighborList) {
        self.neighbors = Some(neighbors);
    }
}

impl BufferReader for MockBufferReader {
    fn read(&self, field: ParticleField) -> Option<&[f32]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }

    fn neighbors(&self) -> Option<&NeighborList> {
        self.neighbors.as_ref()
    }
}

/// Mock implementation of [`BufferWriter`].
///
/// Pre-allocate buffers with [`add_field`](MockBufferWriter::add_field)
/// or [`set_field`](MockBufferWriter::set_field), then inspect results
/// with [`get_field`](MockBufferWriter::get_field).
#[derive(Default)]
pub struct MockBufferWriter {
    fields: HashMap<ParticleField, Vec<f32>>,
}

impl MockBufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate a zeroed buffer for `particles` particles.
    pub fn add_field(&mut self, field: ParticleField, particles: usize) {
        self.fields
            .insert(field, vec![0.0; particles * field.components()]);
    }

    /// Pre-fill a buffer, e.g. with sentinel values.
    pub fn set_field(&mut self, field: ParticleField, data: Vec<f32>) {
        self.fields.insert(field, data);
    }

    /// Read back the current buffer for assertions.
    pub fn get_field(&self, field: ParticleField) -> Option<&[f32]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }
}

impl BufferWriter for MockBufferWriter {
    fn write(&mut self, field: ParticleField) -> Option<&mut [f32]> {
        self.fields.get_mut(&field).map(|v| v.as_mut_slice())
    }
}

/// Mock [`ConstantBank`] that counts uploads per symbol.
#[derive(Default)]
pub struct MockConstantBank {
    symbols: HashMap<String, Vec<f32>>,
    uploads: HashMap<String, usize>,
}

impl MockConstantBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `symbol` was uploaded.
    pub fn upload_count(&self, symbol: &str) -> usize {
        self.uploads.get(symbol).copied().unwrap_or(0)
    }
}

impl ConstantBank for MockConstantBank {
    fn upload(&mut self, symbol: &'static str, values: &[f32]) {
        self.symbols.insert(symbol.to_string(), values.to_vec());
        *self.uploads.entry(symbol.to_string()).or_insert(0) += 1;
    }

    fn download(&self, symbol: &str) -> Option<&[f32]> {
        self.symbols.get(symbol).map(|v| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sizes_by_components() {
        let mut w = MockBufferWriter::new();
        w.add_field(ParticleField::Position, 4);
        w.add_field(ParticleField::Density, 4);
        assert_eq!(w.get_field(ParticleField::Position).unwrap().len(), 12);
        assert_eq!(w.get_field(ParticleField::Density).unwrap().len(), 4);
    }

    #[test]
    fn bank_counts_uploads() {
        let mut bank = MockConstantBank::new();
        bank.upload("d_a", &[1.0]);
        bank.upload("d_a", &[2.0]);
        assert_eq!(bank.upload_count("d_a"), 2);
        assert_eq!(bank.upload_count("d_b"), 0);
        assert_eq!(bank.download("d_a"), Some(&[2.0f32][..]));
    }
}
