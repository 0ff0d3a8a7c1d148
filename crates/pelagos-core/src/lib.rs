//! Core types and traits for the Pelagos SPH model layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the particle buffer keys, the buffer and constant-bank access traits,
//! the neighbor list boundary type, and the error types shared by the
//! model and filter crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod error;
pub mod field;
pub mod neighbors;
pub mod traits;

pub use buffers::{BufferList, HostConstantBank};
pub use error::{FilterError, ModelError};
pub use field::{FieldSet, ParticleField};
pub use neighbors::NeighborList;
pub use traits::{BufferReader, BufferWriter, ConstantBank};
