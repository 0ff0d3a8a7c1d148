//! Density filter engines for Pelagos.
//!
//! - [`ShepardFilter`]: zeroth-order kernel normalization.
//! - [`MlsFilter`]: first-order moving-least-squares correction.
//!
//! Both own the density field and run data-parallel over the particle
//! range with rayon. Kernel coefficient and thresholds are read from the
//! constant bank; a pass without a prior upload fails with
//! [`FilterError::MissingConstant`](pelagos_core::FilterError::MissingConstant).
//!
//! ```
//! use pelagos_filter::FilterEngine;
//! use pelagos_filters::{build_schedule, FilterType};
//! use pelagos_model::ModelSetup;
//!
//! let model = ModelSetup::default().resolve().unwrap();
//! let schedule = build_schedule(&model, &[("shepard", 10)]).unwrap();
//! assert_eq!(schedule.due_engines(20).len(), 1);
//! assert_eq!(schedule.engines()[0].name(), FilterType::Shepard.name());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod filter_type;
pub mod mls;
mod neighborhood;
pub mod shepard;

pub use filter_type::FilterType;
pub use mls::{MlsFilter, MlsFilterBuilder};
pub use shepard::ShepardFilter;

use pelagos_filter::{ConfigError, FilterSchedule};
use pelagos_model::ResolvedModel;

/// Build a validated schedule from `(filter name, frequency)` pairs.
///
/// Every engine uses the model's kernel.
///
/// # Errors
///
/// [`ConfigError::Model`] for an unknown filter name, or
/// [`ConfigError::DuplicateName`] when a filter is listed twice. Both
/// filters may be listed together; on iterations where both are due the
/// later one filters the earlier one's output.
pub fn build_schedule(
    model: &ResolvedModel,
    filters: &[(&str, u32)],
) -> Result<FilterSchedule, ConfigError> {
    let mut schedule = FilterSchedule::new();
    for &(name, frequency) in filters {
        let ty: FilterType = name.parse()?;
        schedule.register(ty.build(frequency, model.kernel));
    }
    schedule.validate()?;
    Ok(schedule)
}
