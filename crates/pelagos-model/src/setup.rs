//! Model setup: the builder-input for resolving a simulation's physics.
//!
//! [`ModelSetup`] collects what a problem definition chooses (viscosity,
//! number of fluids, kernel, smoothing length). [`validate()`](ModelSetup::validate)
//! checks it once at startup and [`resolve()`](ModelSetup::resolve)
//! produces the read-only [`ResolvedModel`] shared by every worker.

use pelagos_core::ModelError;

use crate::kernel::KernelType;
use crate::legacy::LegacyViscositySelector;
use crate::viscosity::ModelConfiguration;

/// Maximum number of fluid phases a simulation may declare.
pub const MAX_FLUID_TYPES: usize = 4;

/// How the viscous model was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViscositySelection {
    /// A legacy single-enum selector, mapped through the fixed table.
    Legacy(LegacyViscositySelector),
    /// An explicit configuration. Its multi-fluid axis must agree with
    /// the fluid count.
    Explicit(ModelConfiguration),
}

/// Complete physics choices of a problem definition.
#[derive(Clone, Debug)]
pub struct ModelSetup {
    /// Viscous model selection.
    pub viscosity: ViscositySelection,
    /// Number of fluid phases. Must be in `1..=MAX_FLUID_TYPES`.
    pub fluid_count: usize,
    /// Smoothing kernel.
    pub kernel: KernelType,
    /// Smoothing length `h`.
    pub smoothing_length: f32,
}

impl Default for ModelSetup {
    fn default() -> Self {
        Self {
            viscosity: ViscositySelection::Explicit(ModelConfiguration::DEFAULT),
            fluid_count: 1,
            kernel: KernelType::Wendland,
            smoothing_length: 1.0,
        }
    }
}

/// The startup product of a [`ModelSetup`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedModel {
    /// The final physical-model configuration.
    pub configuration: ModelConfiguration,
    /// Smoothing kernel.
    pub kernel: KernelType,
    /// Smoothing length `h`.
    pub smoothing_length: f32,
    /// Kernel support radius for `h`.
    pub influence_radius: f32,
}

impl ModelSetup {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.resolve().map(|_| ())
    }

    /// Validate and produce the final model.
    pub fn resolve(&self) -> Result<ResolvedModel, ModelError> {
        // 1. Fluid count within 1..=MAX_FLUID_TYPES.
        if self.fluid_count == 0 || self.fluid_count > MAX_FLUID_TYPES {
            return Err(ModelError::FluidCount {
                count: self.fluid_count,
                max: MAX_FLUID_TYPES,
            });
        }
        let multi_fluid = self.fluid_count > 1;

        // 2. Smoothing length finite and positive.
        let h = self.smoothing_length;
        if !h.is_finite() || h <= 0.0 {
            return Err(ModelError::InvalidSmoothingLength { value: h });
        }

        // 3. Viscous model, with the multi-fluid axis from the fluid count.
        let configuration = match self.viscosity {
            ViscositySelection::Legacy(selector) => selector.configuration_for(multi_fluid),
            ViscositySelection::Explicit(config) => {
                if config.is_multi_fluid() != multi_fluid {
                    return Err(ModelError::MultiFluidMismatch {
                        fluid_count: self.fluid_count,
                        multi_fluid: config.is_multi_fluid(),
                    });
                }
                config
            }
        };

        log::info!(
            "model: {configuration}; kernel {} with h = {h}",
            self.kernel
        );

        Ok(ResolvedModel {
            configuration,
            kernel: self.kernel,
            smoothing_length: h,
            influence_radius: self.kernel.influence_radius(h),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::average::AveragingOperator;
    use crate::viscosity::TurbulenceModel;

    #[test]
    fn default_setup_resolves_to_default_model() {
        let resolved = ModelSetup::default().resolve().unwrap();
        assert_eq!(resolved.configuration, ModelConfiguration::DEFAULT);
        assert_eq!(resolved.influence_radius, 2.0);
    }

    #[test]
    fn legacy_selection_applies_fluid_count() {
        let setup = ModelSetup {
            viscosity: ViscositySelection::Legacy(LegacyViscositySelector::DynamicMorris),
            fluid_count: 2,
            ..ModelSetup::default()
        };
        let c = setup.resolve().unwrap().configuration;
        assert!(c.is_multi_fluid());
        assert!(!c.is_constant_viscosity());
    }

    #[test]
    fn legacy_kinematic_single_fluid_matches_table() {
        let setup = ModelSetup {
            viscosity: ViscositySelection::Legacy(LegacyViscositySelector::KinematicMorris),
            ..ModelSetup::default()
        };
        let c = setup.resolve().unwrap().configuration;
        assert_eq!(c, LegacyViscositySelector::KinematicMorris.configuration());
        assert_eq!(c.averaging_operator(), AveragingOperator::Harmonic);
    }

    #[test]
    fn zero_and_excess_fluids_rejected() {
        for count in [0, MAX_FLUID_TYPES + 1] {
            let setup = ModelSetup {
                fluid_count: count,
                ..ModelSetup::default()
            };
            match setup.validate() {
                Err(ModelError::FluidCount { count: c, .. }) => assert_eq!(c, count),
                other => panic!("expected FluidCount, got {other:?}"),
            }
        }
    }

    #[test]
    fn explicit_multi_fluid_mismatch_rejected() {
        let setup = ModelSetup {
            viscosity: ViscositySelection::Explicit(
                ModelConfiguration::DEFAULT.with_turbulence(TurbulenceModel::KEpsilon),
            ),
            fluid_count: 3,
            ..ModelSetup::default()
        };
        match setup.validate() {
            Err(ModelError::MultiFluidMismatch {
                fluid_count: 3,
                multi_fluid: false,
            }) => {}
            other => panic!("expected MultiFluidMismatch, got {other:?}"),
        }

        let consistent = ModelSetup {
            viscosity: ViscositySelection::Explicit(
                ModelConfiguration::DEFAULT.with_multi_fluid(true),
            ),
            fluid_count: 3,
            ..ModelSetup::default()
        };
        assert!(consistent.validate().is_ok());
    }

    #[test]
    fn invalid_smoothing_length_rejected() {
        for h in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let setup = ModelSetup {
                smoothing_length: h,
                ..ModelSetup::default()
            };
            assert!(matches!(
                setup.validate(),
                Err(ModelError::InvalidSmoothingLength { .. })
            ));
        }
    }

    #[test]
    fn gaussian_influence_radius_is_three_h() {
        let setup = ModelSetup {
            kernel: KernelType::Gaussian,
            smoothing_length: 0.5,
            ..ModelSetup::default()
        };
        assert_eq!(setup.resolve().unwrap().influence_radius, 1.5);
    }
}
