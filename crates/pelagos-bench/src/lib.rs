//! Benchmark profiles and utilities for the Pelagos SPH model layer.
//!
//! - [`FilterProfile`]: a cubic lattice with neighbor lists, ready for a
//!   filter pass
//! - [`perturbed_lattice`]: the same lattice with a deterministic density
//!   ripple so filters have work to do
//! - [`sample_pairs`]: deterministic positive sample pairs for averaging

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pelagos_core::{BufferList, ParticleField};
use pelagos_filter::PassParams;
use pelagos_model::KernelType;
use pelagos_test_utils::{brute_force_neighbors, lattice_block, positions_of};

/// Lattice spacing used by every profile.
pub const SPACING: f32 = 0.1;

/// Smoothing length used by every profile (1.3 × spacing).
pub const SLENGTH: f32 = 0.13;

/// Reference density.
pub const REST_DENSITY: f32 = 1000.0;

/// Source and destination buffers for one filter pass.
pub struct FilterProfile {
    /// Read buffers: position, density, mass, neighbors.
    pub src: BufferList,
    /// Write buffers, pre-filled from `src`.
    pub dst: BufferList,
    /// Pass parameters covering every particle.
    pub params: PassParams,
}

/// Build an `n × n × n` lattice profile with the given kernel.
///
/// Neighbor lists are built once with a brute-force search, so keep `n`
/// modest (a 20³ lattice is 8000 particles).
pub fn perturbed_lattice(n: usize, kernel: KernelType) -> FilterProfile {
    let mut src = lattice_block(n, n, n, SPACING, REST_DENSITY);
    let radius = kernel.influence_radius(SLENGTH);
    let neighbors = brute_force_neighbors(positions_of(&src), radius);
    src.set_neighbors(neighbors);

    let density: Vec<f32> = (0..n * n * n)
        .map(|i| REST_DENSITY * (1.0 + 0.01 * ((i % 7) as f32 - 3.0)))
        .collect();
    src.set(ParticleField::Density, density);

    let mut dst = lattice_block(n, n, n, SPACING, 0.0);
    dst.copy_from(&src);

    FilterProfile {
        src,
        dst,
        params: PassParams::full(n * n * n, SLENGTH, radius),
    }
}

/// `len` deterministic positive sample pairs in `[0.5, 2.5)`.
pub fn sample_pairs(len: usize) -> Vec<(f32, f32)> {
    // Weyl sequence; fixed so runs compare.
    let step = 0.618_034_f32;
    (0..len)
        .map(|i| {
            let a = (i as f32 * step).fract();
            let b = ((i as f32 + 0.5) * step * 1.7).fract();
            (0.5 + 2.0 * a, 0.5 + 2.0 * b)
        })
        .collect()
}
