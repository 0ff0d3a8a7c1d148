//! Execution context passed to filter engines during a pass.
//!
//! [`FilterContext`] bundles the read view, the write view, the constant
//! bank and the [`PassParams`] of one `process()` call. It validates the
//! parameters once on construction and offers checked accessors so that
//! engines fail with a [`FilterError`] instead of indexing out of bounds.

use pelagos_core::{
    BufferReader, BufferWriter, ConstantBank, FilterError, NeighborList, ParticleField,
};

/// Scalar parameters of one filter pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassParams {
    /// Number of active particles.
    pub num_particles: usize,
    /// End (exclusive) of the range to process. Particles beyond it are
    /// ghosts and are never written.
    pub particle_range_end: usize,
    /// Smoothing length `h`.
    pub slength: f32,
    /// Kernel support radius.
    pub influence_radius: f32,
}

impl PassParams {
    /// Parameters processing every active particle.
    pub fn full(num_particles: usize, slength: f32, influence_radius: f32) -> Self {
        Self {
            num_particles,
            particle_range_end: num_particles,
            slength,
            influence_radius,
        }
    }

    /// Check the range and smoothing parameters.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.particle_range_end > self.num_particles {
            return Err(FilterError::InvalidRange {
                particle_range_end: self.particle_range_end,
                num_particles: self.num_particles,
            });
        }
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.slength) || !valid(self.influence_radius) {
            return Err(FilterError::InvalidSmoothing {
                slength: self.slength,
                influence_radius: self.influence_radius,
            });
        }
        Ok(())
    }
}

/// Execution context passed to each engine's `process()` method.
///
/// Uses dynamic dispatch (`&dyn BufferReader`, `&mut dyn BufferWriter`)
/// to keep [`FilterEngine`](crate::FilterEngine) object-safe while
/// supporting mock-based testing. The read and write views are distinct
/// borrows, so a pass can never observe its own in-flight writes.
pub struct FilterContext<'a> {
    reads: &'a dyn BufferReader,
    writes: &'a mut dyn BufferWriter,
    constants: &'a dyn ConstantBank,
    params: PassParams,
}

impl<'a> FilterContext<'a> {
    /// Construct a new filter context.
    ///
    /// Typically called by the schedule, not by engines directly.
    /// For testing, construct with mocks from `pelagos-test-utils`.
    pub fn new(
        reads: &'a dyn BufferReader,
        writes: &'a mut dyn BufferWriter,
        constants: &'a dyn ConstantBank,
        params: PassParams,
    ) -> Result<Self, FilterError> {
        params.validate()?;
        Ok(Self {
            reads,
            writes,
            constants,
            params,
        })
    }

    /// Number of active particles.
    pub fn num_particles(&self) -> usize {
        self.params.num_particles
    }

    /// End (exclusive) of the range to process.
    pub fn particle_range_end(&self) -> usize {
        self.params.particle_range_end
    }

    /// Smoothing length.
    pub fn slength(&self) -> f32 {
        self.params.slength
    }

    /// Kernel support radius.
    pub fn influence_radius(&self) -> f32 {
        self.params.influence_radius
    }

    /// Read `field` for every active particle.
    ///
    /// The slice covers at least `num_particles` entries, since neighbors
    /// of in-range particles may lie anywhere in the active set.
    pub fn read_field(&self, filter: &str, field: ParticleField) -> Result<&'a [f32], FilterError> {
        let data = self
            .reads
            .read(field)
            .ok_or_else(|| FilterError::MissingBuffer {
                filter: filter.to_string(),
                field,
            })?;
        let required = self.params.num_particles * field.components();
        if data.len() < required {
            return Err(FilterError::BufferTooShort {
                filter: filter.to_string(),
                field,
                len: data.len(),
                required,
            });
        }
        Ok(data)
    }

    /// Destination slice of `field`, truncated to `[0, particle_range_end)`.
    pub fn write_field(
        &mut self,
        filter: &str,
        field: ParticleField,
    ) -> Result<&mut [f32], FilterError> {
        let required = self.params.particle_range_end * field.components();
        let data = self
            .writes
            .write(field)
            .ok_or_else(|| FilterError::MissingBuffer {
                filter: filter.to_string(),
                field,
            })?;
        if data.len() < required {
            return Err(FilterError::BufferTooShort {
                filter: filter.to_string(),
                field,
                len: data.len(),
                required,
            });
        }
        Ok(&mut data[..required])
    }

    /// The neighbor list, which must cover every active particle.
    pub fn neighbors(&self, filter: &str) -> Result<&'a NeighborList, FilterError> {
        match self.reads.neighbors() {
            Some(list) if list.particle_count() >= self.params.num_particles => Ok(list),
            _ => Err(FilterError::MissingNeighbors {
                filter: filter.to_string(),
            }),
        }
    }

    /// Values uploaded under `symbol`.
    pub fn constant(&self, filter: &str, symbol: &str) -> Result<&'a [f32], FilterError> {
        match self.constants.download(symbol) {
            Some(values) if !values.is_empty() => Ok(values),
            _ => Err(FilterError::MissingConstant {
                filter: filter.to_string(),
                symbol: symbol.to_string(),
            }),
        }
    }

    /// First value uploaded under `symbol`.
    pub fn scalar_constant(&self, filter: &str, symbol: &str) -> Result<f32, FilterError> {
        self.constant(filter, symbol).map(|values| values[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pelagos_core::{BufferList, HostConstantBank};

    fn params(num: usize, end: usize) -> PassParams {
        PassParams {
            num_particles: num,
            particle_range_end: end,
            slength: 0.1,
            influence_radius: 0.2,
        }
    }

    #[test]
    fn context_provides_reads_and_writes() {
        let mut src = BufferList::new();
        src.set(ParticleField::Density, vec![1.0, 2.0, 3.0]);
        let mut dst = BufferList::new();
        dst.allocate(ParticleField::Density, 3);
        let bank = HostConstantBank::new();

        let mut ctx = FilterContext::new(&src, &mut dst, &bank, params(3, 2)).unwrap();
        let data = ctx.read_field("t", ParticleField::Density).unwrap();
        assert_eq!(data, &[1.0, 2.0, 3.0]);

        let out = ctx.write_field("t", ParticleField::Density).unwrap();
        assert_eq!(out.len(), 2);
        out.copy_from_slice(&data[..2]);

        assert_eq!(dst.read(ParticleField::Density).unwrap(), &[1.0, 2.0, 0.0]);
    }

    #[test]
    fn range_past_active_particles_rejected() {
        let src = BufferList::new();
        let mut dst = BufferList::new();
        let bank = HostConstantBank::new();
        match FilterContext::new(&src, &mut dst, &bank, params(4, 5)) {
            Err(FilterError::InvalidRange {
                particle_range_end: 5,
                num_particles: 4,
            }) => {}
            Err(other) => panic!("expected InvalidRange, got {other:?}"),
            Ok(_) => panic!("expected InvalidRange, got a context"),
        }
    }

    #[test]
    fn non_positive_smoothing_rejected() {
        let src = BufferList::new();
        let mut dst = BufferList::new();
        let bank = HostConstantBank::new();
        let mut p = params(1, 1);
        p.slength = 0.0;
        assert!(matches!(
            FilterContext::new(&src, &mut dst, &bank, p),
            Err(FilterError::InvalidSmoothing { .. })
        ));
    }

    #[test]
    fn short_read_buffer_reports_required_length() {
        let mut src = BufferList::new();
        src.set(ParticleField::Position, vec![0.0; 6]);
        let mut dst = BufferList::new();
        let bank = HostConstantBank::new();
        let ctx = FilterContext::new(&src, &mut dst, &bank, params(3, 3)).unwrap();
        match ctx.read_field("t", ParticleField::Position) {
            Err(FilterError::BufferTooShort { len, required, .. }) => {
                assert_eq!(len, 6);
                assert_eq!(required, 9);
            }
            other => panic!("expected BufferTooShort, got {other:?}"),
        }
    }

    #[test]
    fn missing_write_buffer_names_field() {
        let src = BufferList::new();
        let mut dst = BufferList::new();
        let bank = HostConstantBank::new();
        let mut ctx = FilterContext::new(&src, &mut dst, &bank, params(1, 1)).unwrap();
        match ctx.write_field("t", ParticleField::Density) {
            Err(FilterError::MissingBuffer { field, .. }) => {
                assert_eq!(field, ParticleField::Density)
            }
            other => panic!("expected MissingBuffer, got {other:?}"),
        }
    }

    #[test]
    fn neighbor_list_must_cover_active_particles() {
        let mut src = BufferList::new();
        src.set_neighbors(NeighborList::from_lists(vec![vec![1u32], vec![0]]));
        let mut dst = BufferList::new();
        let bank = HostConstantBank::new();

        let ctx = FilterContext::new(&src, &mut dst, &bank, params(2, 2)).unwrap();
        assert_eq!(ctx.neighbors("t").unwrap().particle_count(), 2);

        let mut dst = BufferList::new();
        let ctx = FilterContext::new(&src, &mut dst, &bank, params(3, 3)).unwrap();
        assert!(matches!(
            ctx.neighbors("t"),
            Err(FilterError::MissingNeighbors { .. })
        ));
    }

    #[test]
    fn constants_come_from_the_bank() {
        let src = BufferList::new();
        let mut dst = BufferList::new();
        let mut bank = HostConstantBank::new();
        bank.upload("d_norm", &[0.25]);
        let ctx = FilterContext::new(&src, &mut dst, &bank, params(0, 0)).unwrap();
        assert_eq!(ctx.scalar_constant("t", "d_norm").unwrap(), 0.25);
        match ctx.scalar_constant("t", "d_missing") {
            Err(FilterError::MissingConstant { symbol, .. }) => assert_eq!(symbol, "d_missing"),
            other => panic!("expected MissingConstant, got {other:?}"),
        }
    }
}
