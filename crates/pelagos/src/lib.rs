//! Pelagos: physical-model configuration and periodic density filtering
//! for SPH simulators.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Pelagos sub-crates. For most users, adding `pelagos` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use pelagos::prelude::*;
//! use pelagos::types::{BufferList, HostConstantBank, NeighborList};
//!
//! let model = ModelSetup::default().resolve().unwrap();
//! assert!(model.configuration.is_constant_viscosity());
//!
//! let mut schedule = build_schedule(&model, &[("shepard", 10)]).unwrap();
//!
//! // Two particles closer than the influence radius.
//! let mut src = BufferList::new();
//! let dx = 0.5 * model.smoothing_length;
//! src.set(ParticleField::Position, vec![0.0, 0.0, 0.0, dx, 0.0, 0.0]);
//! src.set(ParticleField::Density, vec![1000.0, 1000.0]);
//! src.set(ParticleField::Mass, vec![1.0, 1.0]);
//! src.set_neighbors(NeighborList::from_lists(vec![vec![1u32], vec![0]]));
//! let mut dst = BufferList::new();
//! dst.allocate(ParticleField::Density, 2);
//! dst.copy_from(&src);
//!
//! let mut bank = HostConstantBank::new();
//! let params = PassParams::full(2, model.smoothing_length, model.influence_radius);
//! let records = schedule.run_iteration(0, &src, &mut dst, &mut bank, params).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].report.visited(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pelagos-core` | Particle fields, buffer traits, neighbor lists, errors |
//! | [`model`] | `pelagos-model` | Viscous-model configuration, averaging laws, kernels |
//! | [`filter`] | `pelagos-filter` | Filter engine trait and schedule |
//! | [`filters`] | `pelagos-filters` | Shepard and MLS density filters |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and errors (`pelagos-core`).
///
/// Contains [`types::ParticleField`], the access traits
/// ([`types::BufferReader`], [`types::BufferWriter`],
/// [`types::ConstantBank`]) and [`types::NeighborList`].
pub use pelagos_core as types;

/// Physical-model configuration (`pelagos-model`).
///
/// [`model::ModelConfiguration`] and its axes, the averaging laws, the
/// legacy selector and startup validation through [`model::ModelSetup`].
pub use pelagos_model as model;

/// Filter engine contract and scheduling (`pelagos-filter`).
///
/// The [`filter::FilterEngine`] trait is the extension point for
/// user-defined filters.
pub use pelagos_filter as filter;

/// Density filter implementations (`pelagos-filters`).
pub use pelagos_filters as filters;

/// Common imports for typical Pelagos usage.
///
/// ```rust
/// use pelagos::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use pelagos_core::{
        BufferReader, BufferWriter, ConstantBank, FieldSet, NeighborList, ParticleField,
    };

    // Errors
    pub use pelagos_core::{FilterError, ModelError};

    // Model
    pub use pelagos_model::{
        AverageLaw, AveragingKernel, AveragingOperator, KernelType, LegacyViscositySelector,
        ModelConfiguration, ModelSetup, ResolvedModel, Rheology, TurbulenceModel,
        ViscosityUnits, ViscousModel,
    };

    // Filter
    pub use pelagos_filter::{
        ConfigError, FilterContext, FilterEngine, FilterReport, FilterSchedule, PassParams,
        ScheduleError,
    };

    // Filters
    pub use pelagos_filters::{build_schedule, FilterType, MlsFilter, ShepardFilter};
}
