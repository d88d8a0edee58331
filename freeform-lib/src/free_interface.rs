//! Interfaces between two materials described by a monotone volume-fraction
//! profile.
//!
//! Both variants build cumulative knots from step parameters `dz` (depth) and
//! `dp` (fraction), normalize the fraction to end at 1, and blend the SLD of
//! the material below into the one above. Rendering writes three pieces: a
//! flat slab at the lower SLD up to the 1% crossing, the blended microslabs
//! up to the 99% crossing, and a flat slab at the upper SLD for the rest,
//! carrying the interfacial roughness.

use tracing::{debug, trace};

use crate::error::{FreeformError, Result};
use crate::inflection::{cumulative, inflections};
use crate::layer::Layer;
use crate::material::{Neighbor, Probe};
use crate::monospline::fit;
use crate::parameter::{self, ParamInit, Parameter};
use crate::slabs::SlabBuffer;

const DEFAULT_SEGMENTS: usize = 5;
const LOWER_CROSSING: f64 = 0.01;
const UPPER_CROSSING: f64 = 0.99;

/// Step parameters shared by both interface variants.
struct Steps {
    dz: Vec<Parameter>,
    dp: Vec<Parameter>,
}

impl Steps {
    /// Fill in defaults in a fixed order: five unit `dp` steps when neither
    /// list is given, unit `dp` per `dz` when only `dz` is given, and
    /// `default_dz(len(dp))` per `dp` when only `dp` is given.
    fn new(
        name: &str,
        dz: Option<Vec<ParamInit>>,
        dp: Option<Vec<ParamInit>>,
        default_dz: impl Fn(usize) -> f64,
    ) -> Result<Self> {
        let dp = match (&dz, dp) {
            (_, Some(dp)) => dp,
            (None, None) => vec![ParamInit::Value(1.0); DEFAULT_SEGMENTS],
            (Some(dz), None) => vec![ParamInit::Value(1.0); dz.len()],
        };
        let dz = dz.unwrap_or_else(|| vec![ParamInit::Value(default_dz(dp.len())); dp.len()]);
        if dz.len() != dp.len() {
            return Err(FreeformError::LengthMismatch {
                what: "dz (one per dp)",
                expected: dp.len(),
                found: dz.len(),
            });
        }
        let limits = (0.0, f64::INFINITY);
        Ok(Steps {
            dz: parameter::sequence(dz, limits, name, "dz"),
            dp: parameter::sequence(dp, limits, name, "dp"),
        })
    }

    /// Cumulative depth knots starting at 0.
    fn z(&self) -> Vec<f64> {
        cumulative(&parameter::values(&self.dz))
    }

    /// Cumulative fraction knots from 0 to 1. An all-zero `dp` leaves the
    /// fraction at zero.
    fn p(&self, layer: &str) -> Vec<f64> {
        let mut p = cumulative(&parameter::values(&self.dp));
        let mut total = p[p.len() - 1];
        if total == 0.0 {
            trace!(layer, "dp sums to zero; fraction profile is flat");
            total = 1.0;
        }
        p.iter_mut().for_each(|v| *v /= total);
        p
    }

    fn inflections(&self) -> usize {
        inflections(&parameter::values(&self.dz), &parameter::values(&self.dp))
    }
}

/// Blend `below` into `above` over `[0, thickness]` and write the three
/// pieces to `slabs`.
#[allow(clippy::too_many_arguments)]
fn render_blend(
    layer: &str,
    probe: &Probe,
    slabs: &mut dyn SlabBuffer,
    below: &Neighbor,
    above: &Neighbor,
    z: &[f64],
    p: &[f64],
    thickness: f64,
    interface: f64,
) {
    let (w, zt) = slabs.microslabs(thickness);
    debug!(layer, thickness, microslabs = w.len(), "render freeform interface");
    if zt.is_empty() {
        trace!(layer, "no microslabs; interface skipped");
        return;
    }

    let (below_rho, below_irho) = below.sld(probe);
    let (above_rho, above_irho) = above.sld(probe);
    let profile = fit(z, p).eval(&zt);

    let last = profile.len() - 1;
    let lidx = profile.partition_point(|&f| f < LOWER_CROSSING).min(last);
    let ridx = profile
        .partition_point(|&f| f < UPPER_CROSSING)
        .min(last)
        .max(lidx);

    let rho: Vec<f64> = profile[lidx..ridx]
        .iter()
        .map(|&f| (1.0 - f) * below_rho + f * above_rho)
        .collect();
    let irho: Vec<f64> = profile[lidx..ridx]
        .iter()
        .map(|&f| (1.0 - f) * below_irho + f * above_irho)
        .collect();

    slabs.extend(&[below_rho], &[below_irho], &[zt[lidx]], 0.0);
    slabs.extend(&rho, &irho, &w[lidx..ridx], 0.0);
    slabs.extend(
        &[above_rho],
        &[above_irho],
        &[thickness - zt[ridx]],
        interface,
    );
}

/// A freeform interface whose thickness is the sum of its `dz` steps.
pub struct FreeInterfaceW {
    name: String,
    interface: Parameter,
    below: Neighbor,
    above: Neighbor,
    steps: Steps,
}

impl FreeInterfaceW {
    /// Missing `dz` defaults to a 10 Å interface split evenly over the `dp`
    /// steps.
    pub fn new(
        name: impl Into<String>,
        interface: impl Into<ParamInit>,
        below: Neighbor,
        above: Neighbor,
        dz: Option<Vec<ParamInit>>,
        dp: Option<Vec<ParamInit>>,
    ) -> Result<Self> {
        let name = name.into();
        let steps = Steps::new(&name, dz, dp, |n| 10.0 / n as f64)?;
        Ok(FreeInterfaceW {
            interface: Parameter::default_from(
                interface,
                (0.0, f64::INFINITY),
                format!("{name} interface"),
            ),
            name,
            below,
            above,
            steps,
        })
    }

    /// Derived thickness, `sum(dz)`.
    pub fn thickness_parameter(&self) -> Parameter {
        let w = parameter::values(&self.steps.dz).iter().sum();
        Parameter::new(format!("{} thickness", self.name), w, 0.0, f64::INFINITY)
    }

    /// The thickness is derived, so only zero is accepted, and ignored.
    pub fn set_thickness(&mut self, value: f64) -> Result<()> {
        if value != 0.0 {
            return Err(FreeformError::DerivedThickness {
                layer: self.name.clone(),
                value,
            });
        }
        Ok(())
    }

    pub fn interface(&self) -> &Parameter {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut Parameter {
        &mut self.interface
    }

    pub fn dz(&self) -> &[Parameter] {
        &self.steps.dz
    }

    pub fn dp(&self) -> &[Parameter] {
        &self.steps.dp
    }

    pub fn dz_mut(&mut self) -> &mut [Parameter] {
        &mut self.steps.dz
    }

    pub fn dp_mut(&mut self) -> &mut [Parameter] {
        &mut self.steps.dp
    }

    pub fn below(&self) -> &Neighbor {
        &self.below
    }

    pub fn above(&self) -> &Neighbor {
        &self.above
    }

    /// Volume fraction of the upper material at depths `zt`.
    pub fn fraction(&self, zt: &[f64]) -> Vec<f64> {
        fit(&self.steps.z(), &self.steps.p(&self.name)).eval(zt)
    }
}

impl Layer for FreeInterfaceW {
    fn name(&self) -> &str {
        &self.name
    }

    fn thickness(&self) -> f64 {
        self.thickness_parameter().value()
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params: Vec<&Parameter> = Vec::new();
        params.extend(&self.steps.dz);
        params.extend(&self.steps.dp);
        params.push(&self.interface);
        params.extend(self.below.parameters());
        params.extend(self.above.parameters());
        params
    }

    fn render(&self, probe: &Probe, slabs: &mut dyn SlabBuffer) {
        let z = self.steps.z();
        let p = self.steps.p(&self.name);
        let thickness = z[z.len() - 1];
        render_blend(
            &self.name,
            probe,
            slabs,
            &self.below,
            &self.above,
            &z,
            &p,
            thickness,
            self.interface.value(),
        );
    }
}

/// A freeform interface with an independent thickness. The `dz` steps only
/// set the relative spacing of the knots.
pub struct FreeInterface {
    name: String,
    thickness: Parameter,
    interface: Parameter,
    below: Neighbor,
    above: Neighbor,
    steps: Steps,
}

impl FreeInterface {
    /// Missing `dz` defaults to equal unit steps.
    pub fn new(
        name: impl Into<String>,
        thickness: impl Into<ParamInit>,
        interface: impl Into<ParamInit>,
        below: Neighbor,
        above: Neighbor,
        dz: Option<Vec<ParamInit>>,
        dp: Option<Vec<ParamInit>>,
    ) -> Result<Self> {
        let name = name.into();
        let steps = Steps::new(&name, dz, dp, |_| 1.0)?;
        let limits = (0.0, f64::INFINITY);
        Ok(FreeInterface {
            thickness: Parameter::default_from(thickness, limits, format!("{name} thickness")),
            interface: Parameter::default_from(interface, limits, format!("{name} interface")),
            name,
            below,
            above,
            steps,
        })
    }

    pub fn thickness_parameter(&self) -> &Parameter {
        &self.thickness
    }

    pub fn thickness_mut(&mut self) -> &mut Parameter {
        &mut self.thickness
    }

    pub fn interface(&self) -> &Parameter {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut Parameter {
        &mut self.interface
    }

    pub fn dz(&self) -> &[Parameter] {
        &self.steps.dz
    }

    pub fn dp(&self) -> &[Parameter] {
        &self.steps.dp
    }

    pub fn dz_mut(&mut self) -> &mut [Parameter] {
        &mut self.steps.dz
    }

    pub fn dp_mut(&mut self) -> &mut [Parameter] {
        &mut self.steps.dp
    }

    pub fn below(&self) -> &Neighbor {
        &self.below
    }

    pub fn above(&self) -> &Neighbor {
        &self.above
    }

    /// Number of inflections in the `(dz, dp)` control polyline, for use as
    /// a fit penalty.
    pub fn inflections(&self) -> usize {
        self.steps.inflections()
    }

    /// Depth knots rescaled to end at the layer thickness.
    fn z(&self) -> Vec<f64> {
        let mut z = self.steps.z();
        let mut total = z[z.len() - 1];
        if total == 0.0 {
            total = 1.0;
        }
        let scale = self.thickness.value() / total;
        z.iter_mut().for_each(|v| *v *= scale);
        z
    }

    /// Volume fraction of the upper material at depths `zt`.
    pub fn fraction(&self, zt: &[f64]) -> Vec<f64> {
        fit(&self.z(), &self.steps.p(&self.name)).eval(zt)
    }
}

impl Layer for FreeInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn thickness(&self) -> f64 {
        self.thickness.value()
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = vec![&self.thickness, &self.interface];
        params.extend(&self.steps.dz);
        params.extend(&self.steps.dp);
        params.extend(self.below.parameters());
        params.extend(self.above.parameters());
        params
    }

    fn render(&self, probe: &Probe, slabs: &mut dyn SlabBuffer) {
        render_blend(
            &self.name,
            probe,
            slabs,
            &self.below,
            &self.above,
            &self.z(),
            &self.steps.p(&self.name),
            self.thickness.value(),
            self.interface.value(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::slabs::Microslabs;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn silicon() -> Neighbor {
        Arc::new(Material::new("Si", 2.07, 0.0))
    }

    fn water() -> Neighbor {
        Arc::new(Material::new("D2O", 6.35, 0.01))
    }

    #[test]
    fn test_default_steps() {
        let layer = FreeInterfaceW::new("iface", 0.0, silicon(), water(), None, None).unwrap();
        assert_eq!(layer.dp().len(), 5);
        assert_eq!(layer.dz().len(), 5);
        assert!(layer.dz().iter().all(|p| p.value() == 2.0));
        assert_eq!(layer.thickness(), 10.0);
    }

    #[test]
    fn test_defaults_follow_given_list() {
        let dz = ParamInit::values(&[1.0, 2.0, 3.0]);
        let layer = FreeInterfaceW::new("iface", 0.0, silicon(), water(), Some(dz), None).unwrap();
        assert_eq!(layer.dp().len(), 3);
        assert!(layer.dp().iter().all(|p| p.value() == 1.0));
        assert_eq!(layer.thickness(), 6.0);

        let dp = ParamInit::values(&[1.0, 1.0, 1.0, 1.0]);
        let layer = FreeInterfaceW::new("iface", 0.0, silicon(), water(), None, Some(dp)).unwrap();
        assert!(layer.dz().iter().all(|p| p.value() == 2.5));

        let dp = ParamInit::values(&[1.0, 1.0]);
        let layer =
            FreeInterface::new("iface", 50.0, 0.0, silicon(), water(), None, Some(dp)).unwrap();
        assert!(layer.dz().iter().all(|p| p.value() == 1.0));
    }

    #[test]
    fn test_mismatched_steps() {
        let result = FreeInterface::new(
            "iface",
            10.0,
            0.0,
            silicon(),
            water(),
            Some(ParamInit::values(&[1.0, 1.0])),
            Some(ParamInit::values(&[1.0])),
        );
        assert!(matches!(
            result.err(),
            Some(FreeformError::LengthMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_thickness_is_derived() {
        let mut layer = FreeInterfaceW::new("iface", 0.0, silicon(), water(), None, None).unwrap();
        assert!(layer.set_thickness(0.0).is_ok());
        assert_eq!(layer.thickness(), 10.0);
        let err = layer.set_thickness(3.0).unwrap_err();
        assert!(matches!(err, FreeformError::DerivedThickness { .. }));
        assert_eq!(layer.thickness_parameter().name(), "iface thickness");
        layer.dz_mut()[0].set_value(7.0);
        assert_eq!(layer.thickness(), 15.0);
    }

    #[test]
    fn test_zero_dp_gives_flat_fraction() {
        let dp = ParamInit::values(&[0.0; 4]);
        let layer = FreeInterfaceW::new("iface", 0.0, silicon(), water(), None, Some(dp)).unwrap();
        let fraction = layer.fraction(&[0.0, 2.5, 5.0, 10.0]);
        assert!(fraction.iter().all(|&f| f == 0.0));

        let mut slabs = Microslabs::new(1.0);
        layer.render(&Probe::default(), &mut slabs);
        let s = slabs.slabs();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].rho, 2.07);
        assert_abs_diff_eq!(s[0].w, 9.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s[1].w, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_fraction_monotone() {
        let dp = ParamInit::values(&[1.0, 3.0, 0.5, 2.0]);
        let layer =
            FreeInterface::new("iface", 40.0, 0.0, silicon(), water(), None, Some(dp)).unwrap();
        let zt: Vec<f64> = (0..=400).map(|i| i as f64 * 0.1).collect();
        let f = layer.fraction(&zt);
        assert_abs_diff_eq!(f[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[400], 1.0, epsilon = 1e-12);
        assert!(f.windows(2).all(|w| w[1] >= w[0] - 1e-12));
    }

    #[test]
    fn test_render_three_pieces() {
        let layer = FreeInterface::new("iface", 20.0, 3.0, silicon(), water(), None, None).unwrap();
        let mut slabs = Microslabs::new(1.0);
        layer.render(&Probe::default(), &mut slabs);
        let s = slabs.slabs();
        assert!(s.len() >= 3);

        let first = s[0];
        let last = s[s.len() - 1];
        assert_eq!((first.rho, first.irho), (2.07, 0.0));
        assert_eq!((last.rho, last.irho), (6.35, 0.01));
        assert_eq!(last.sigma, 3.0);
        assert!(s[..s.len() - 1].iter().all(|x| x.sigma == 0.0));

        let middle = &s[1..s.len() - 1];
        assert!(middle.iter().all(|x| x.rho > 2.07 && x.rho < 6.35));
        assert!(middle.windows(2).all(|w| w[1].rho >= w[0].rho));
    }

    #[test]
    fn test_zero_dz_step_still_blends() {
        // The zero step puts two knots at 15 Å: a jump in the middle.
        let layer = FreeInterface::new(
            "iface",
            30.0,
            0.0,
            silicon(),
            water(),
            Some(ParamInit::values(&[1.0, 0.0, 1.0])),
            Some(ParamInit::values(&[1.0, 1.0, 1.0])),
        )
        .unwrap();
        let f = layer.fraction(&[0.0, 14.5, 15.5, 30.0]);
        assert!(f.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(f.windows(2).all(|w| w[1] >= w[0]));

        let mut slabs = Microslabs::new(1.0);
        layer.render(&Probe::default(), &mut slabs);
        let s = slabs.slabs();
        assert_eq!(s.len(), 28);
        assert_abs_diff_eq!(slabs.total_thickness(), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s[0].w, 2.5, epsilon = 1e-12);
        let middle = &s[1..s.len() - 1];
        assert!(middle.iter().all(|x| x.rho > 2.07 && x.rho < 6.35));
        assert!(middle.windows(2).all(|w| w[1].rho >= w[0].rho));
    }

    #[test]
    fn test_inflection_diagnostic() {
        let layer = FreeInterface::new(
            "iface",
            10.0,
            0.0,
            silicon(),
            water(),
            Some(ParamInit::values(&[1.0, 1.0, 1.0, 1.0])),
            Some(ParamInit::values(&[1.0, 0.0, 1.0, 0.0])),
        )
        .unwrap();
        assert!(layer.inflections() > 0);

        let smooth =
            FreeInterface::new("iface", 10.0, 0.0, silicon(), water(), None, None).unwrap();
        assert_eq!(smooth.inflections(), 0);
    }

    #[test]
    fn test_zero_thickness_renders_nothing() {
        let layer = FreeInterface::new("iface", 0.0, 1.0, silicon(), water(), None, None).unwrap();
        let mut slabs = Microslabs::new(1.0);
        layer.render(&Probe::default(), &mut slabs);
        assert!(slabs.is_empty());
    }

    #[test]
    fn test_parameters() {
        let layer = FreeInterface::new("iface", 10.0, 1.0, silicon(), water(), None, None).unwrap();
        let params = layer.parameters();
        assert_eq!(params.len(), 2 + 5 + 5 + 4);
        assert_eq!(params[0].name(), "iface thickness");
        assert_eq!(params[1].name(), "iface interface");
        assert_eq!(params[2].name(), "iface dz[0]");
        assert_eq!(params[7].name(), "iface dp[0]");
    }
}
