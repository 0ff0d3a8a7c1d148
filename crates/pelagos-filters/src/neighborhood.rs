//! Shared machinery of the density filters: gathering the read-side
//! particle data and running a data-parallel per-particle correction.

use glam::Vec3;
use rayon::prelude::*;

use pelagos_core::{FilterError, NeighborList, ParticleField};
use pelagos_filter::{FilterContext, FilterReport};
use pelagos_model::KernelType;

/// One neighbor's contribution to particle `i`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Interaction {
    /// `x_j - x_i`.
    pub relative: Vec3,
    /// Kernel value `W_ij`.
    pub weight: f32,
    /// `m_j`.
    pub mass: f32,
    /// `m_j / ρ_j`.
    pub volume: f32,
}

/// Read-only particle state of one pass.
pub(crate) struct Neighborhood<'a> {
    positions: &'a [f32],
    density: &'a [f32],
    mass: &'a [f32],
    neighbors: &'a NeighborList,
    num_particles: usize,
    kernel: KernelType,
    normalization: f32,
    slength: f32,
    radius_sq: f32,
}

impl<'a> Neighborhood<'a> {
    pub fn gather(
        ctx: &FilterContext<'a>,
        filter: &str,
        kernel: KernelType,
        normalization: f32,
    ) -> Result<Self, FilterError> {
        let radius = ctx.influence_radius();
        Ok(Self {
            positions: ctx.read_field(filter, ParticleField::Position)?,
            density: ctx.read_field(filter, ParticleField::Density)?,
            mass: ctx.read_field(filter, ParticleField::Mass)?,
            neighbors: ctx.neighbors(filter)?,
            num_particles: ctx.num_particles(),
            kernel,
            normalization,
            slength: ctx.slength(),
            radius_sq: radius * radius,
        })
    }

    pub fn slength(&self) -> f32 {
        self.slength
    }

    /// Densities before the pass.
    pub fn densities(&self) -> &'a [f32] {
        self.density
    }

    fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    fn interaction(&self, j: usize, relative: Vec3) -> Interaction {
        let weight =
            self.kernel
                .evaluate_with(self.normalization, relative.length(), self.slength);
        Interaction {
            relative,
            weight,
            mass: self.mass[j],
            volume: self.mass[j] / self.density[j],
        }
    }

    /// Visit particle `i` itself and then every active neighbor inside the
    /// influence radius. Returns the number of neighbors visited, not
    /// counting `i`.
    pub fn for_each_interaction(&self, i: usize, mut f: impl FnMut(Interaction)) -> usize {
        f(self.interaction(i, Vec3::ZERO));
        let xi = self.position(i);
        let mut count = 0;
        for &j in self.neighbors.neighbors_of(i) {
            let j = j as usize;
            if j >= self.num_particles {
                continue;
            }
            let relative = self.position(j) - xi;
            if relative.length_squared() >= self.radius_sq {
                continue;
            }
            f(self.interaction(j, relative));
            count += 1;
        }
        count
    }
}

/// Recompute density over `[0, particle_range_end)` in parallel.
///
/// `correct(i)` returns the new density of particle `i`, or `None` to
/// keep its previous value, which is counted as a fallback.
pub(crate) fn correct_density<F>(
    ctx: &mut FilterContext<'_>,
    filter: &str,
    previous: &[f32],
    correct: F,
) -> Result<FilterReport, FilterError>
where
    F: Fn(usize) -> Option<f32> + Sync,
{
    let out = ctx.write_field(filter, ParticleField::Density)?;
    let (filtered, fallbacks) = out
        .par_iter_mut()
        .enumerate()
        .map(|(i, rho)| match correct(i) {
            Some(value) => {
                *rho = value;
                (1, 0)
            }
            None => {
                *rho = previous[i];
                (0, 1)
            }
        })
        .reduce(|| (0usize, 0usize), |a, b| (a.0 + b.0, a.1 + b.1));
    Ok(FilterReport::new(filtered, fallbacks))
}
