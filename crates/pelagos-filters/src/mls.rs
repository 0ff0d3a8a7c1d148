//! First-order moving-least-squares (MLS) density filter.
//!
//! For each particle the moment matrix
//!
//! ```text
//! A = Σ_j V_j W_ij p_ij p_ijᵀ,   p_ij = (1, x_ij / h, y_ij / h, z_ij / h)
//! ```
//!
//! is accumulated over the particle and its neighbors, `β = A⁻¹ e₀` is
//! solved, and the corrected density is `ρ_i' = Σ_j m_j (β · p_ij) W_ij`.
//! The correction reproduces uniform and linear density fields exactly.
//!
//! The pass falls back to the previous density when the particle has too
//! few neighbors or when `A` is ill-conditioned, measured by the
//! scale-free ratio `det(A) / Π diag(A)`.

use glam::{Mat4, Vec4};

use pelagos_core::{ConstantBank, FieldSet, FilterError, ParticleField};
use pelagos_filter::{Cadence, FilterContext, FilterEngine, FilterReport};
use pelagos_model::KernelType;

use crate::neighborhood::{correct_density, Neighborhood};

/// Kernel normalization coefficient symbol.
pub const MLS_KERNEL_NORM: &str = "d_mls_wcoeff";
/// Conditioning threshold symbol.
pub const MLS_DET_EPSILON: &str = "d_mls_epsdet";
/// Minimum neighbor count symbol.
pub const MLS_MIN_NEIGHBORS: &str = "d_mls_min_neibs";

/// Default conditioning threshold.
pub const DEFAULT_DET_EPSILON: f32 = 0.05;
/// Default minimum neighbor count.
pub const DEFAULT_MIN_NEIGHBORS: u32 = 4;

/// MLS density filter.
///
/// Use [`MlsFilter::new`] for the default thresholds or
/// [`MlsFilter::builder`] to tune them:
///
/// ```
/// use pelagos_filters::MlsFilter;
/// use pelagos_model::KernelType;
///
/// let filter = MlsFilter::builder()
///     .frequency(20)
///     .kernel(KernelType::CubicSpline)
///     .min_neighbors(8)
///     .build()
///     .unwrap();
/// assert_eq!(filter.min_neighbors(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct MlsFilter {
    cadence: Cadence,
    kernel: KernelType,
    det_epsilon: f32,
    min_neighbors: u32,
}

/// Builder for [`MlsFilter`].
pub struct MlsFilterBuilder {
    frequency: u32,
    kernel: KernelType,
    det_epsilon: f32,
    min_neighbors: u32,
}

impl MlsFilter {
    /// Engine name.
    pub const NAME: &'static str = "MLS";

    /// A filter with default thresholds.
    pub fn new(frequency: u32, kernel: KernelType) -> Self {
        Self {
            cadence: Cadence::every(frequency),
            kernel,
            det_epsilon: DEFAULT_DET_EPSILON,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
        }
    }

    /// Create a new builder.
    pub fn builder() -> MlsFilterBuilder {
        MlsFilterBuilder {
            frequency: 1,
            kernel: KernelType::Wendland,
            det_epsilon: DEFAULT_DET_EPSILON,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
        }
    }

    /// Smoothing kernel.
    pub fn kernel(&self) -> KernelType {
        self.kernel
    }

    /// Conditioning threshold.
    pub fn det_epsilon(&self) -> f32 {
        self.det_epsilon
    }

    /// Minimum neighbor count.
    pub fn min_neighbors(&self) -> u32 {
        self.min_neighbors
    }

    fn correct(
        view: &Neighborhood<'_>,
        i: usize,
        det_epsilon: f32,
        min_neighbors: u32,
    ) -> Option<f32> {
        let h = view.slength();
        let mut moments = Mat4::ZERO;
        let count = view.for_each_interaction(i, |n| {
            let p = Vec4::new(1.0, n.relative.x / h, n.relative.y / h, n.relative.z / h);
            let s = n.volume * n.weight;
            moments += Mat4::from_cols(p * p.x, p * p.y, p * p.z, p * p.w) * s;
        });
        if count < min_neighbors as usize {
            return None;
        }

        let diagonal = moments.x_axis.x * moments.y_axis.y * moments.z_axis.z * moments.w_axis.w;
        let det = moments.determinant();
        if !(diagonal > 0.0) || !(det / diagonal > det_epsilon) {
            return None;
        }

        let beta = moments.inverse().x_axis;
        let mut rho = 0.0f32;
        view.for_each_interaction(i, |n| {
            let p = Vec4::new(1.0, n.relative.x / h, n.relative.y / h, n.relative.z / h);
            rho += n.mass * beta.dot(p) * n.weight;
        });
        rho.is_finite().then_some(rho)
    }
}

impl MlsFilterBuilder {
    /// Iterations between activations (0 disables). Default: 1.
    pub fn frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Smoothing kernel. Default: Wendland.
    pub fn kernel(mut self, kernel: KernelType) -> Self {
        self.kernel = kernel;
        self
    }

    /// Conditioning threshold. Default: 0.05.
    pub fn det_epsilon(mut self, det_epsilon: f32) -> Self {
        self.det_epsilon = det_epsilon;
        self
    }

    /// Minimum neighbor count. Default: 4.
    pub fn min_neighbors(mut self, min_neighbors: u32) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    /// Build the filter.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the conditioning threshold is not in `[0, 1)`.
    pub fn build(self) -> Result<MlsFilter, String> {
        if !(0.0..1.0).contains(&self.det_epsilon) {
            return Err(format!(
                "det_epsilon must be in [0, 1), got {}",
                self.det_epsilon
            ));
        }
        Ok(MlsFilter {
            cadence: Cadence::every(self.frequency),
            kernel: self.kernel,
            det_epsilon: self.det_epsilon,
            min_neighbors: self.min_neighbors,
        })
    }
}

impl FilterEngine for MlsFilter {
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
        bank.upload(MLS_KERNEL_NORM, &[self.kernel.normalization()]);
        bank.upload(MLS_DET_EPSILON, &[self.det_epsilon]);
        bank.upload(MLS_MIN_NEIGHBORS, &[self.min_neighbors as f32]);
    }

    /// Adopt thresholds the backend may have retuned during the pass.
    fn get_constants(&mut self, bank: &dyn ConstantBank) {
        if let Some(&[eps, ..]) = bank.download(MLS_DET_EPSILON) {
            self.det_epsilon = eps;
        }
        if let Some(&[min, ..]) = bank.download(MLS_MIN_NEIGHBORS) {
            self.min_neighbors = min as u32;
        }
    }

    fn process(&self, ctx: &mut FilterContext<'_>) -> Result<FilterReport, FilterError> {
        let norm = ctx.scalar_constant(Self::NAME, MLS_KERNEL_NORM)?;
        let det_epsilon = ctx.scalar_constant(Self::NAME, MLS_DET_EPSILON)?;
        let min_neighbors = ctx.scalar_constant(Self::NAME, MLS_MIN_NEIGHBORS)? as u32;
        let view = Neighborhood::gather(ctx, Self::NAME, self.kernel, norm)?;

        correct_density(ctx, Self::NAME, view.densities(), |i| {
            Self::correct(&view, i, det_epsilon, min_neighbors)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pelagos_core::{BufferReader, HostConstantBank, NeighborList};
    use pelagos_filter::PassParams;
    use pelagos_test_utils::{
        brute_force_neighbors, lattice_block, positions_of, MockBufferReader, MockBufferWriter,
    };

    const H: f32 = 0.13;

    fn radius() -> f32 {
        KernelType::Wendland.influence_radius(H)
    }

    fn reader_with_density(
        nx: usize,
        ny: usize,
        nz: usize,
        density: Vec<f32>,
    ) -> MockBufferReader {
        let list = lattice_block(nx, ny, nz, 0.1, 1000.0);
        let mut reader = MockBufferReader::new();
        reader.set_field(ParticleField::Position, positions_of(&list).to_vec());
        reader.set_field(
            ParticleField::Mass,
            list.read(ParticleField::Mass).unwrap().to_vec(),
        );
        reader.set_field(ParticleField::Density, density);
        reader.set_neighbors(brute_force_neighbors(positions_of(&list), radius()));
        reader
    }

    fn run(filter: &MlsFilter, reader: &MockBufferReader, n: usize) -> (Vec<f32>, FilterReport) {
        let mut writer = MockBufferWriter::new();
        writer.add_field(ParticleField::Density, n);
        let mut bank = HostConstantBank::new();
        filter.set_constants(&mut bank);
        let params = PassParams::full(n, H, radius());
        let mut ctx = FilterContext::new(reader, &mut writer, &bank, params).unwrap();
        let report = filter.process(&mut ctx).unwrap();
        (writer.get_field(ParticleField::Density).unwrap().to_vec(), report)
    }

    #[test]
    fn uniform_lattice_is_preserved_including_corners() {
        let reader = reader_with_density(4, 4, 4, vec![1000.0; 64]);
        let (out, report) = run(&MlsFilter::new(1, KernelType::Wendland), &reader, 64);
        assert_eq!(report.fallbacks, 0);
        for rho in out {
            assert!((rho - 1000.0).abs() < 0.5, "density drifted to {rho}");
        }
    }

    #[test]
    fn few_neighbors_fall_back() {
        let mut reader = MockBufferReader::new();
        reader.set_field(
            ParticleField::Position,
            vec![0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.1, 0.0],
        );
        reader.set_field(ParticleField::Density, vec![990.0, 1000.0, 1010.0]);
        reader.set_field(ParticleField::Mass, vec![1.0; 3]);
        reader.set_neighbors(NeighborList::from_lists(vec![
            vec![1u32, 2],
            vec![0, 2],
            vec![0, 1],
        ]));

        let (out, report) = run(&MlsFilter::new(1, KernelType::Wendland), &reader, 3);
        assert_eq!(report, FilterReport::new(0, 3));
        assert_eq!(out, vec![990.0, 1000.0, 1010.0]);
    }

    #[test]
    fn planar_layer_is_ill_conditioned() {
        let reader = reader_with_density(4, 4, 1, vec![1000.0; 16]);
        let (out, report) = run(&MlsFilter::new(1, KernelType::Wendland), &reader, 16);
        assert_eq!(report.fallbacks, 16);
        assert!(out.iter().all(|&rho| rho == 1000.0));
    }

    #[test]
    fn builder_rejects_bad_epsilon() {
        assert!(MlsFilter::builder().det_epsilon(1.5).build().is_err());
        assert!(MlsFilter::builder().det_epsilon(f32::NAN).build().is_err());
        let f = MlsFilter::builder().build().unwrap();
        assert_eq!(f.det_epsilon(), DEFAULT_DET_EPSILON);
        assert_eq!(f.min_neighbors(), DEFAULT_MIN_NEIGHBORS);
    }

    #[test]
    fn get_constants_adopts_backend_values() {
        let mut filter = MlsFilter::new(1, KernelType::Wendland);
        let mut bank = HostConstantBank::new();
        filter.set_constants(&mut bank);
        assert!(bank.overwrite(MLS_MIN_NEIGHBORS, &[6.0]));
        filter.get_constants(&bank);
        assert_eq!(filter.min_neighbors(), 6);
        assert_eq!(filter.det_epsilon(), DEFAULT_DET_EPSILON);
    }
}
