//! Core abstraction traits for particle buffer and device-constant access.

use crate::field::ParticleField;
use crate::neighbors::NeighborList;

/// Read-only access to the current particle buffers.
///
/// Implemented by the buffer subsystem to give filter engines a view of
/// the fields they consume. Returns `None` if the field is not present.
pub trait BufferReader {
    /// Read the data for a field as a flat, interleaved f32 slice.
    fn read(&self, field: ParticleField) -> Option<&[f32]>;

    /// The neighbor list built for the current iteration, if any.
    fn neighbors(&self) -> Option<&NeighborList>;
}

/// Mutable access to destination particle buffers.
///
/// Returns `None` if the field is not writable in the current context.
pub trait BufferWriter {
    /// Get a mutable slice for writing field data.
    fn write(&mut self, field: ParticleField) -> Option<&mut [f32]>;
}

/// Symbol table of algorithm constants on the compute backend.
///
/// Filter engines push their constants before a pass and may pull them
/// back afterwards. The pass itself reads constants from the bank, so a
/// missing upload is detected instead of silently using stale values.
pub trait ConstantBank {
    /// Store `values` under `symbol`, replacing any previous upload.
    fn upload(&mut self, symbol: &'static str, values: &[f32]);

    /// Fetch the values last uploaded under `symbol`.
    fn download(&self, symbol: &str) -> Option<&[f32]>;
}
