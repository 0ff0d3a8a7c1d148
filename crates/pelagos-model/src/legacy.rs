//! Mapping from the legacy single-enum viscosity selector.
//!
//! Older problem setups chose viscosity with one flat value. Each value
//! maps to a fixed [`ModelConfiguration`] so that those setups reproduce
//! the same physics. Only the kinematic family uses harmonic averaging
//! and forces the constant-viscosity assumption.

use std::fmt;
use std::str::FromStr;

use pelagos_core::ModelError;

use crate::average::AveragingOperator;
use crate::names::{parse_named, NameEntry};
use crate::viscosity::{ModelConfiguration, Rheology, TurbulenceModel};

/// Inviscid flow with artificial viscosity.
pub const ARTIFICIAL_ONLY: ModelConfiguration =
    LegacyViscositySelector::ArtificialOnly.configuration();
/// Morris with harmonic averaging and constant kinematic viscosity.
pub const KINEMATIC_MORRIS: ModelConfiguration =
    LegacyViscositySelector::KinematicMorris.configuration();
/// The default configuration.
pub const DYNAMIC_MORRIS: ModelConfiguration =
    LegacyViscositySelector::DynamicMorris.configuration();
/// [`KINEMATIC_MORRIS`] with the sub-particle scale model.
pub const KINEMATIC_MORRIS_SPS: ModelConfiguration =
    LegacyViscositySelector::KinematicMorrisPlusSPS.configuration();
/// [`DYNAMIC_MORRIS`] with the k-epsilon model.
pub const DYNAMIC_MORRIS_KEPSILON: ModelConfiguration =
    LegacyViscositySelector::DynamicMorrisPlusKEpsilon.configuration();

/// Legacy viscosity selector.
///
/// Integer ordinals start at 1, as in historical setup files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LegacyViscositySelector {
    /// Artificial viscosity only.
    ArtificialOnly = 1,
    /// Morris, simplified for constant kinematic viscosity, harmonic
    /// averaging of the density.
    KinematicMorris = 2,
    /// Morris with arithmetic averaging of the dynamic viscosity.
    DynamicMorris = 3,
    /// [`KinematicMorris`](Self::KinematicMorris) plus SPS.
    KinematicMorrisPlusSPS = 4,
    /// [`DynamicMorris`](Self::DynamicMorris) plus k-epsilon.
    DynamicMorrisPlusKEpsilon = 5,
}

impl LegacyViscositySelector {
    /// Every selector, in ordinal order.
    pub const ALL: [Self; 5] = [
        Self::ArtificialOnly,
        Self::KinematicMorris,
        Self::DynamicMorris,
        Self::KinematicMorrisPlusSPS,
        Self::DynamicMorrisPlusKEpsilon,
    ];

    const NAMES: [NameEntry<Self>; 5] = [
        (Self::ArtificialOnly, "Artificial", "artvisc"),
        (Self::KinematicMorris, "Kinematic", "kinematicvisc"),
        (Self::DynamicMorris, "Dynamic", "dynamicvisc"),
        (Self::KinematicMorrisPlusSPS, "SPS + kinematic", "spsvisc"),
        (Self::DynamicMorrisPlusKEpsilon, "k-e model", "kepsvisc"),
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize - 1].1
    }

    /// The historical integer ordinal.
    pub const fn ordinal(self) -> u32 {
        self as u32
    }

    /// The equivalent single-fluid configuration.
    pub const fn configuration(self) -> ModelConfiguration {
        self.configuration_for(false)
    }

    /// The equivalent configuration with the multi-fluid axis set first.
    ///
    /// Every other step of the mapping is applied on top, so the forced
    /// constant-viscosity assumption of the kinematic family survives in
    /// multi-fluid setups while the turbulent variants re-derive it.
    pub const fn configuration_for(self, multi_fluid: bool) -> ModelConfiguration {
        let base = ModelConfiguration::DEFAULT.with_multi_fluid(multi_fluid);
        match self {
            Self::ArtificialOnly => base
                .with_rheology(Rheology::Inviscid)
                .with_turbulence(TurbulenceModel::ArtificialViscosity),
            Self::KinematicMorris => kinematic(base),
            Self::DynamicMorris => base,
            Self::KinematicMorrisPlusSPS => {
                kinematic(base).with_turbulence(TurbulenceModel::SubParticleScale)
            }
            Self::DynamicMorrisPlusKEpsilon => base.with_turbulence(TurbulenceModel::KEpsilon),
        }
    }
}

const fn kinematic(base: ModelConfiguration) -> ModelConfiguration {
    base.with_averaging_operator(AveragingOperator::Harmonic)
        .assume_constant_viscosity(true)
}

impl From<LegacyViscositySelector> for ModelConfiguration {
    fn from(selector: LegacyViscositySelector) -> Self {
        selector.configuration()
    }
}

impl TryFrom<u32> for LegacyViscositySelector {
    type Error = ModelError;

    fn try_from(ordinal: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.ordinal() == ordinal)
            .ok_or(ModelError::OrdinalOutOfRange {
                axis: "legacy viscosity",
                ordinal,
            })
    }
}

impl fmt::Display for LegacyViscositySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LegacyViscositySelector {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("legacy viscosity", s, &Self::NAMES)
    }
}
