use std::sync::Arc;

use crate::parameter::Parameter;

/// Shared handle to an adjacent layer or material.
pub type Neighbor = Arc<dyn Sld + Send + Sync>;

/// Measurement context passed through to SLD queries.
///
/// Freeform layers never inspect it; materials may use it for
/// wavelength-dependent scattering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Probe {
    /// Wavelength in Å, zero when unknown.
    pub wavelength: f64,
}

impl Probe {
    pub fn new(wavelength: f64) -> Self {
        Probe { wavelength }
    }
}

/// Anything that can report a scattering length density at its boundary.
pub trait Sld {
    /// Returns `(rho, irho)` in units of 10⁻⁶ Å⁻².
    fn sld(&self, probe: &Probe) -> (f64, f64);

    /// Fittable parameters behind the SLD.
    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }
}

/// A material with constant real and imaginary SLD.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    rho: Parameter,
    irho: Parameter,
}

impl Material {
    pub fn new(name: impl Into<String>, rho: f64, irho: f64) -> Self {
        let name = name.into();
        Material {
            rho: Parameter::free(format!("{name} rho"), rho),
            irho: Parameter::free(format!("{name} irho"), irho),
            name,
        }
    }

    /// Build from existing parameters, keeping their names and bounds.
    pub fn from_parameters(name: impl Into<String>, rho: Parameter, irho: Parameter) -> Self {
        Material {
            name: name.into(),
            rho,
            irho,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rho(&self) -> &Parameter {
        &self.rho
    }

    pub fn irho(&self) -> &Parameter {
        &self.irho
    }

    pub fn rho_mut(&mut self) -> &mut Parameter {
        &mut self.rho
    }

    pub fn irho_mut(&mut self) -> &mut Parameter {
        &mut self.irho
    }
}

impl Sld for Material {
    fn sld(&self, _probe: &Probe) -> (f64, f64) {
        (self.rho.value(), self.irho.value())
    }

    fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.rho, &self.irho]
    }
}
