//! Physical-model configuration for Pelagos.
//!
//! Everything here is resolved once at startup and then read by every
//! worker without synchronization:
//!
//! - [`ModelConfiguration`]: the viscous-model algebra and its derived
//!   constant-viscosity flag.
//! - [`AverageLaw`] and [`AveragingOperator`]: pairwise averaging laws,
//!   selected at runtime and monomorphized per kernel.
//! - [`LegacyViscositySelector`]: the historical single-enum selector.
//! - [`KernelType`]: smoothing kernels and their normalization.
//! - [`ModelSetup`]: startup validation of the whole bundle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod average;
pub mod kernel;
pub mod legacy;
pub mod names;
pub mod setup;
pub mod viscosity;

pub use average::{
    average, Arithmetic, AverageLaw, AveragingKernel, AveragingOperator, Geometric, Harmonic,
};
pub use kernel::KernelType;
pub use legacy::LegacyViscositySelector;
pub use setup::{ModelSetup, ResolvedModel, ViscositySelection, MAX_FLUID_TYPES};
pub use viscosity::{ModelConfiguration, Rheology, TurbulenceModel, ViscosityUnits, ViscousModel};
