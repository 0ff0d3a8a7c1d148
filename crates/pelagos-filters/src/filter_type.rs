//! Filter selection by name.

use std::fmt;
use std::str::FromStr;

use pelagos_core::ModelError;
use pelagos_filter::FilterEngine;
use pelagos_model::names::{parse_named, NameEntry};
use pelagos_model::KernelType;

use crate::mls::MlsFilter;
use crate::shepard::ShepardFilter;

/// The available density filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterType {
    /// Zeroth-order Shepard normalization.
    Shepard,
    /// First-order moving least squares.
    Mls,
}

impl FilterType {
    /// Every filter type.
    pub const ALL: [Self; 2] = [Self::Shepard, Self::Mls];

    const NAMES: [NameEntry<Self>; 2] = [
        (Self::Shepard, ShepardFilter::NAME, "shepard"),
        (Self::Mls, MlsFilter::NAME, "mls"),
    ];

    /// Display name; also the engine name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }

    /// Construct the engine with default thresholds.
    pub fn build(self, frequency: u32, kernel: KernelType) -> Box<dyn FilterEngine> {
        match self {
            Self::Shepard => Box::new(ShepardFilter::new(frequency, kernel)),
            Self::Mls => Box::new(MlsFilter::new(frequency, kernel)),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("filter", s, &Self::NAMES)
    }
}
