//! The physical-model configuration algebra.
//!
//! A [`ModelConfiguration`] bundles six orthogonal choices (rheology,
//! turbulence closure, viscosity units, viscous discretization, averaging
//! law, multi-fluid) and one derived flag telling kernels whether the
//! viscosity can be treated as a constant.
//!
//! Configurations are `Copy` values built with `const fn`s, so a
//! simulation's model can be a compile-time constant:
//!
//! ```
//! use pelagos_model::{AveragingOperator, ModelConfiguration, TurbulenceModel};
//!
//! const MODEL: ModelConfiguration = ModelConfiguration::DEFAULT
//!     .with_turbulence(TurbulenceModel::SubParticleScale)
//!     .with_averaging_operator(AveragingOperator::Harmonic);
//!
//! assert!(MODEL.is_constant_viscosity());
//! ```

use std::fmt;
use std::str::FromStr;

use pelagos_core::ModelError;

use crate::average::{AveragingKernel, AveragingOperator};
use crate::names::{parse_named, NameEntry};

// ── Axes ───────────────────────────────────────────────────────────

/// Rheology of the fluid(s).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rheology {
    /// No laminar viscosity.
    Inviscid,
    /// Viscosity independent of strain rate.
    Newtonian,
}

impl Rheology {
    const NAMES: [NameEntry<Self>; 2] = [
        (Self::Inviscid, "Inviscid", "inviscid"),
        (Self::Newtonian, "Newtonian", "newtonian"),
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }
}

/// Turbulence closure.
///
/// Artificial viscosity is listed here because it acts as an addition to
/// the viscous model rather than an alternative to it, even though it is
/// normally paired with inviscid flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurbulenceModel {
    /// No turbulence model.
    Laminar,
    /// Artificial viscosity.
    ArtificialViscosity,
    /// Sub-particle scale (LES) model.
    SubParticleScale,
    /// k-epsilon model.
    KEpsilon,
}

impl TurbulenceModel {
    const NAMES: [NameEntry<Self>; 4] = [
        (Self::Laminar, "Pure laminar flow", "laminar"),
        (Self::ArtificialViscosity, "Artificial viscosity", "artificial"),
        (Self::SubParticleScale, "Sub-particle scale", "sps"),
        (Self::KEpsilon, "k-epsilon", "kepsilon"),
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }
}

/// Which physical quantity the viscous terms are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViscosityUnits {
    /// Kinematic viscosity ν (m²/s).
    Kinematic,
    /// Dynamic viscosity µ = ρν (Pa·s).
    Dynamic,
}

impl ViscosityUnits {
    const NAMES: [NameEntry<Self>; 2] = [
        (Self::Kinematic, "Kinematic", "kinematic"),
        (Self::Dynamic, "Dynamic", "dynamic"),
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }
}

/// Discretization of the viscous operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViscousModel {
    /// Morris et al., JCP 1997.
    Morris,
}

impl ViscousModel {
    const NAMES: [NameEntry<Self>; 1] = [(Self::Morris, "Morris 1997", "morris")];

    /// Display name.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize].1
    }
}

impl fmt::Display for Rheology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TurbulenceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ViscosityUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ViscousModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rheology {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("rheology", s, &Self::NAMES)
    }
}

impl FromStr for TurbulenceModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("turbulence", s, &Self::NAMES)
    }
}

impl FromStr for ViscosityUnits {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("viscosity units", s, &Self::NAMES)
    }
}

impl FromStr for ViscousModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("viscous model", s, &Self::NAMES)
    }
}

// ── ModelConfiguration ─────────────────────────────────────────────

/// A complete, immutable physical-model description.
///
/// Every `with_*` method returns a new configuration and recomputes the
/// constant-viscosity flag from the primary axes. The flag can only be
/// forced through [`assume_constant_viscosity`](Self::assume_constant_viscosity),
/// and a later `with_*` call drops that override again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelConfiguration {
    rheology: Rheology,
    turbulence: TurbulenceModel,
    viscosity_units: ViscosityUnits,
    viscous_model: ViscousModel,
    averaging: AveragingOperator,
    multi_fluid: bool,
    constant_viscosity: bool,
}

impl ModelConfiguration {
    /// Laminar Newtonian single fluid, kinematic units, Morris operator,
    /// arithmetic averaging.
    pub const DEFAULT: Self = Self::new(
        Rheology::Newtonian,
        TurbulenceModel::Laminar,
        ViscosityUnits::Kinematic,
        ViscousModel::Morris,
        AveragingOperator::Arithmetic,
        false,
    );

    /// Build a configuration from its six primary axes.
    pub const fn new(
        rheology: Rheology,
        turbulence: TurbulenceModel,
        viscosity_units: ViscosityUnits,
        viscous_model: ViscousModel,
        averaging: AveragingOperator,
        multi_fluid: bool,
    ) -> Self {
        Self {
            rheology,
            turbulence,
            viscosity_units,
            viscous_model,
            averaging,
            multi_fluid,
            constant_viscosity: derive_constant_viscosity(rheology, turbulence, multi_fluid),
        }
    }

    /// Rheology axis.
    pub const fn rheology(&self) -> Rheology {
        self.rheology
    }

    /// Turbulence axis.
    pub const fn turbulence(&self) -> TurbulenceModel {
        self.turbulence
    }

    /// Viscosity units axis.
    pub const fn viscosity_units(&self) -> ViscosityUnits {
        self.viscosity_units
    }

    /// Viscous discretization axis.
    pub const fn viscous_model(&self) -> ViscousModel {
        self.viscous_model
    }

    /// Averaging law axis.
    pub const fn averaging_operator(&self) -> AveragingOperator {
        self.averaging
    }

    /// Whether more than one fluid phase is present.
    pub const fn is_multi_fluid(&self) -> bool {
        self.multi_fluid
    }

    /// Whether kernels may skip per-particle viscosity recomputation.
    pub const fn is_constant_viscosity(&self) -> bool {
        self.constant_viscosity
    }

    /// The flag value the primary axes imply.
    pub const fn derived_constant_viscosity(&self) -> bool {
        derive_constant_viscosity(self.rheology, self.turbulence, self.multi_fluid)
    }

    /// Whether the flag was forced away from its derived value.
    pub const fn overrides_constant_viscosity(&self) -> bool {
        self.constant_viscosity != self.derived_constant_viscosity()
    }

    /// Change the rheology.
    pub const fn with_rheology(self, rheology: Rheology) -> Self {
        Self::new(
            rheology,
            self.turbulence,
            self.viscosity_units,
            self.viscous_model,
            self.averaging,
            self.multi_fluid,
        )
    }

    /// Change the turbulence model.
    pub const fn with_turbulence(self, turbulence: TurbulenceModel) -> Self {
        Self::new(
            self.rheology,
            turbulence,
            self.viscosity_units,
            self.viscous_model,
            self.averaging,
            self.multi_fluid,
        )
    }

    /// Change the viscosity units.
    pub const fn with_viscosity_units(self, viscosity_units: ViscosityUnits) -> Self {
        Self::new(
            self.rheology,
            self.turbulence,
            viscosity_units,
            self.viscous_model,
            self.averaging,
            self.multi_fluid,
        )
    }

    /// Change the viscous discretization.
    pub const fn with_viscous_model(self, viscous_model: ViscousModel) -> Self {
        Self::new(
            self.rheology,
            self.turbulence,
            self.viscosity_units,
            viscous_model,
            self.averaging,
            self.multi_fluid,
        )
    }

    /// Change the averaging law.
    pub const fn with_averaging_operator(self, averaging: AveragingOperator) -> Self {
        Self::new(
            self.rheology,
            self.turbulence,
            self.viscosity_units,
            self.viscous_model,
            averaging,
            self.multi_fluid,
        )
    }

    /// Declare whether more than one fluid phase is present.
    pub const fn with_multi_fluid(self, multi_fluid: bool) -> Self {
        Self::new(
            self.rheology,
            self.turbulence,
            self.viscosity_units,
            self.viscous_model,
            self.averaging,
            multi_fluid,
        )
    }

    /// Force the constant-viscosity assumption, leaving every axis as is.
    ///
    /// This is the only way to make the flag disagree with
    /// [`derived_constant_viscosity`](Self::derived_constant_viscosity).
    pub const fn assume_constant_viscosity(self, assume: bool) -> Self {
        Self {
            constant_viscosity: assume,
            ..self
        }
    }

    /// Run `kernel` with this configuration's averaging law as a type.
    pub fn specialize_averaging<K: AveragingKernel>(&self, kernel: K) -> K::Output {
        self.averaging.specialize(kernel)
    }
}

impl Default for ModelConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ModelConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rheology, {}, {} viscosity, {} operator, {} averaging, {}",
            self.rheology,
            self.turbulence,
            self.viscosity_units,
            self.viscous_model,
            self.averaging,
            if self.multi_fluid {
                "multi-fluid"
            } else {
                "single fluid"
            },
        )?;
        if self.constant_viscosity {
            write!(f, ", constant viscosity")?;
        }
        if self.overrides_constant_viscosity() {
            write!(f, " (assumed)")?;
        }
        Ok(())
    }
}

const fn derive_constant_viscosity(
    rheology: Rheology,
    turbulence: TurbulenceModel,
    multi_fluid: bool,
) -> bool {
    !multi_fluid
        && matches!(rheology, Rheology::Newtonian)
        && !matches!(turbulence, TurbulenceModel::KEpsilon)
}
