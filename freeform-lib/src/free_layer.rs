//! Freeform sections modeled with splines through SLD control points.

use tracing::debug;

use crate::error::{FreeformError, Result};
use crate::layer::Layer;
use crate::material::{Neighbor, Probe};
use crate::monospline::fit;
use crate::parameter::{self, ParamInit, Parameter};
use crate::slabs::SlabBuffer;

/// A freeform section of the sample modeled with splines.
///
/// Real and imaginary SLD have independent control points. The points are
/// equally spaced through the layer unless explicit z values are given, in
/// which case they are fractions of the thickness in `[0, 1]`, one per
/// control point. The ends are anchored to the SLD of the neighbouring
/// materials with zero slope, so the layer blends smoothly into slabs.
pub struct FreeLayer {
    name: String,
    thickness: Parameter,
    left: Neighbor,
    right: Neighbor,
    rho: Vec<Parameter>,
    irho: Vec<Parameter>,
    rhoz: Vec<Parameter>,
    irhoz: Vec<Parameter>,
}

impl FreeLayer {
    /// A layer with no interior control points, i.e. a smooth step from
    /// `left` to `right`.
    pub fn new(
        name: impl Into<String>,
        thickness: impl Into<ParamInit>,
        left: Neighbor,
        right: Neighbor,
    ) -> Self {
        let name = name.into();
        FreeLayer {
            thickness: Parameter::default_from(
                thickness,
                (0.0, f64::INFINITY),
                format!("{name} thickness"),
            ),
            name,
            left,
            right,
            rho: Vec::new(),
            irho: Vec::new(),
            rhoz: Vec::new(),
            irhoz: Vec::new(),
        }
    }

    /// Set the real SLD control points. `rhoz` is either empty or has one
    /// entry per value.
    pub fn with_rho(mut self, rho: Vec<ParamInit>, rhoz: Vec<ParamInit>) -> Result<Self> {
        (self.rho, self.rhoz) = self.control_points(rho, rhoz, "rho")?;
        Ok(self)
    }

    /// Set the imaginary SLD control points. `irhoz` is either empty or has
    /// one entry per value.
    pub fn with_irho(mut self, irho: Vec<ParamInit>, irhoz: Vec<ParamInit>) -> Result<Self> {
        (self.irho, self.irhoz) = self.control_points(irho, irhoz, "irho")?;
        Ok(self)
    }

    fn control_points(
        &self,
        values: Vec<ParamInit>,
        z: Vec<ParamInit>,
        part: &'static str,
    ) -> Result<(Vec<Parameter>, Vec<Parameter>)> {
        if !z.is_empty() && z.len() != values.len() {
            return Err(FreeformError::LengthMismatch {
                what: if part == "rho" { "rhoz" } else { "irhoz" },
                expected: values.len(),
                found: z.len(),
            });
        }
        let unbounded = (f64::NEG_INFINITY, f64::INFINITY);
        let values = parameter::sequence(values, unbounded, &self.name, part);
        let z = parameter::sequence(z, (0.0, 1.0), &self.name, &format!("{part}z"));
        Ok((values, z))
    }

    pub fn thickness_parameter(&self) -> &Parameter {
        &self.thickness
    }

    pub fn thickness_mut(&mut self) -> &mut Parameter {
        &mut self.thickness
    }

    pub fn rho(&self) -> &[Parameter] {
        &self.rho
    }

    pub fn irho(&self) -> &[Parameter] {
        &self.irho
    }

    pub fn rhoz(&self) -> &[Parameter] {
        &self.rhoz
    }

    pub fn irhoz(&self) -> &[Parameter] {
        &self.irhoz
    }

    pub fn rho_mut(&mut self) -> &mut [Parameter] {
        &mut self.rho
    }

    pub fn irho_mut(&mut self) -> &mut [Parameter] {
        &mut self.irho
    }

    pub fn rhoz_mut(&mut self) -> &mut [Parameter] {
        &mut self.rhoz
    }

    pub fn irhoz_mut(&mut self) -> &mut [Parameter] {
        &mut self.irhoz
    }

    pub fn left(&self) -> &Neighbor {
        &self.left
    }

    pub fn right(&self) -> &Neighbor {
        &self.right
    }

    /// Real and imaginary SLD at depths `z` (Å from the left edge).
    pub fn profile(&self, probe: &Probe, z: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let thickness = self.thickness.value();
        let (left_rho, left_irho) = self.left.sld(probe);
        let (right_rho, right_irho) = self.right.sld(probe);

        let (x, y) = knots(&self.rho, &self.rhoz, left_rho, right_rho, thickness);
        let rho = fit(&x, &y).eval(z);
        let (x, y) = knots(&self.irho, &self.irhoz, left_irho, right_irho, thickness);
        let irho = fit(&x, &y).eval(z);
        (rho, irho)
    }
}

/// Control points bookended by the neighbour values at 0 and `thickness`.
fn knots(
    values: &[Parameter],
    z: &[Parameter],
    left: f64,
    right: f64,
    thickness: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = values.len();
    let positions: Vec<f64> = if z.is_empty() {
        (0..n + 2)
            .map(|i| thickness * i as f64 / (n + 1) as f64)
            .collect()
    } else {
        std::iter::once(0.0)
            .chain(z.iter().map(|p| p.value() * thickness))
            .chain(std::iter::once(thickness))
            .collect()
    };
    let levels = std::iter::once(left)
        .chain(values.iter().map(Parameter::value))
        .chain(std::iter::once(right))
        .collect();
    (positions, levels)
}

impl Layer for FreeLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn thickness(&self) -> f64 {
        self.thickness.value()
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = vec![&self.thickness];
        params.extend(&self.rho);
        params.extend(&self.rhoz);
        params.extend(&self.irho);
        params.extend(&self.irhoz);
        params.extend(self.left.parameters());
        params.extend(self.right.parameters());
        params
    }

    fn render(&self, probe: &Probe, slabs: &mut dyn SlabBuffer) {
        let (w, z) = slabs.microslabs(self.thickness.value());
        debug!(
            layer = %self.name,
            thickness = self.thickness.value(),
            microslabs = w.len(),
            "render freeform layer"
        );
        let (rho, irho) = self.profile(probe, &z);
        slabs.extend(&rho, &irho, &w, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::slabs::Microslabs;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn between(rho_left: f64, rho_right: f64, thickness: f64) -> FreeLayer {
        FreeLayer::new(
            "Freeform",
            thickness,
            Arc::new(Material::new("left", rho_left, 0.0)),
            Arc::new(Material::new("right", rho_right, 0.5)),
        )
    }

    #[test]
    fn test_control_points_through_thickness() {
        let layer = between(0.0, 6.0, 100.0)
            .with_rho(ParamInit::values(&[2.0, 4.0]), ParamInit::values(&[0.25, 0.75]))
            .unwrap();
        let (rho, _) = layer.profile(&Probe::default(), &[0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_abs_diff_eq!(rho[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rho[1], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rho[2], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rho[3], 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rho[4], 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_spacing() {
        // Equally spaced points at 1/3 and 2/3 of the thickness.
        let layer = between(0.0, 3.0, 30.0)
            .with_rho(ParamInit::values(&[1.0, 2.0]), Vec::new())
            .unwrap();
        let (rho, _) = layer.profile(&Probe::default(), &[10.0, 20.0]);
        assert_abs_diff_eq!(rho[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rho[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_irho_independent_of_rho() {
        let layer = between(1.0, 1.0, 10.0)
            .with_irho(ParamInit::values(&[0.25]), ParamInit::values(&[0.5]))
            .unwrap();
        let (rho, irho) = layer.profile(&Probe::default(), &[0.0, 5.0, 10.0]);
        assert!(rho.iter().all(|&r| (r - 1.0).abs() < 1e-12));
        assert_abs_diff_eq!(irho[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(irho[1], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(irho[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_z() {
        let err = between(0.0, 1.0, 10.0)
            .with_rho(ParamInit::values(&[1.0, 2.0]), ParamInit::values(&[0.5]))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            FreeformError::LengthMismatch { what: "rhoz", expected: 2, found: 1 }
        ));
        let err = between(0.0, 1.0, 10.0)
            .with_irho(ParamInit::values(&[1.0]), ParamInit::values(&[0.2, 0.5]))
            .err()
            .unwrap();
        assert!(matches!(err, FreeformError::LengthMismatch { what: "irhoz", .. }));
    }

    #[test]
    fn test_render_spans_thickness() {
        let layer = between(0.0, 6.0, 20.0)
            .with_rho(ParamInit::values(&[3.0]), Vec::new())
            .unwrap();
        let mut slabs = Microslabs::new(1.0);
        layer.render(&Probe::default(), &mut slabs);
        assert_eq!(slabs.len(), 20);
        assert_abs_diff_eq!(slabs.total_thickness(), 20.0, epsilon = 1e-9);
        assert!(slabs.slabs().iter().all(|s| s.sigma == 0.0));
        let rho: Vec<f64> = slabs.slabs().iter().map(|s| s.rho).collect();
        assert!(rho.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_unbounded_thickness_renders_nothing() {
        let layer = between(0.0, 6.0, f64::INFINITY);
        let mut slabs = Microslabs::new(1.0);
        layer.render(&Probe::default(), &mut slabs);
        assert!(slabs.is_empty());
    }

    #[test]
    fn test_render_reads_current_values() {
        let mut layer = between(0.0, 2.0, 10.0)
            .with_rho(ParamInit::values(&[1.0]), Vec::new())
            .unwrap();
        layer.rho_mut()[0].set_value(1.5);
        let (rho, _) = layer.profile(&Probe::default(), &[5.0]);
        assert_abs_diff_eq!(rho[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_parameter_names() {
        let layer = between(0.0, 1.0, 10.0)
            .with_rho(ParamInit::values(&[0.5]), ParamInit::values(&[0.5]))
            .unwrap();
        let names: Vec<&str> = layer.parameters().into_iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            [
                "Freeform thickness",
                "Freeform rho[0]",
                "Freeform rhoz[0]",
                "left rho",
                "left irho",
                "right rho",
                "right irho",
            ]
        );
    }
}
