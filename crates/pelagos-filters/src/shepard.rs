//! Zeroth-order (Shepard) density filter.
//!
//! ```text
//! ρ_i' = Σ_j m_j W_ij / Σ_j (m_j / ρ_j) W_ij
//! ```
//!
//! with `j` over particle `i` and its neighbors inside the influence
//! radius. A uniform-density configuration is a fixed point of the
//! filter regardless of how many neighbors a particle has.

use pelagos_core::{ConstantBank, FieldSet, FilterError, ParticleField};
use pelagos_filter::{Cadence, FilterContext, FilterEngine, FilterReport};
use pelagos_model::KernelType;

use crate::neighborhood::{correct_density, Neighborhood};

/// Kernel normalization coefficient symbol.
pub const SHEPARD_KERNEL_NORM: &str = "d_shepard_wcoeff";

/// Shepard density filter.
#[derive(Clone, Debug)]
pub struct ShepardFilter {
    cadence: Cadence,
    kernel: KernelType,
}

impl ShepardFilter {
    /// Engine name.
    pub const NAME: &'static str = "Shepard";

    /// A filter running every `frequency` iterations with `kernel`.
    pub fn new(frequency: u32, kernel: KernelType) -> Self {
        Self {
            cadence: Cadence::every(frequency),
            kernel,
        }
    }

    /// Smoothing kernel.
    pub fn kernel(&self) -> KernelType {
        self.kernel
    }
}

impl FilterEngine for ShepardFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
            .with(ParticleField::Position)
            .with(ParticleField::Density)
            .with(ParticleField::Mass)
    }

    fn writes(&self) -> FieldSet {
        FieldSet::empty().with(ParticleField::Density)
    }

    fn frequency(&self) -> u32 {
        self.cadence.frequency()
    }

    fn set_frequency(&mut self, frequency: u32) {
        self.cadence = Cadence::every(frequency);
    }

    fn set_constants(&self, bank: &mut dyn ConstantBank) {
        bank.upload(SHEPARD_KERNEL_NORM, &[self.kernel.normalization()]);
    }

    fn process(&self, ctx: &mut FilterContext<'_>) -> Result<FilterReport, FilterError> {
        let norm = ctx.scalar_constant(Self::NAME, SHEPARD_KERNEL_NORM)?;
        let view = Neighborhood::gather(ctx, Self::NAME, self.kernel, norm)?;

        correct_density(ctx, Self::NAME, view.densities(), |i| {
            let mut num = 0.0f32;
            let mut den = 0.0f32;
            view.for_each_interaction(i, |n| {
                num += n.mass * n.weight;
                den += n.volume * n.weight;
            });
            let rho = num / den;
            (den > 0.0 && rho.is_finite()).then_some(rho)
        })
    }
}
