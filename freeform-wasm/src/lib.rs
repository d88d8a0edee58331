//! WASM bindings for freeform profiles.
//!
//! Build with:
//! ```sh
//! wasm-pack build -p freeform-wasm
//! ```

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use freeform::{FreeInterface, FreeLayer, Layer, Material, Microslabs, ParamInit, Probe};

fn to_js(e: freeform::FreeformError) -> JsError {
    JsError::new(&e.to_string())
}

// ── Interpolation ──

/// Monotone cubic interpolation of `(x, y)` at `xt`.
#[wasm_bindgen]
pub fn monospline(x: &[f64], y: &[f64], xt: &[f64]) -> Result<Vec<f64>, JsError> {
    freeform::monospline(x, y, xt).map_err(to_js)
}

/// Inflection count of the curve built from steps `dx`, `dy`.
#[wasm_bindgen]
pub fn inflections(dx: &[f64], dy: &[f64]) -> usize {
    freeform::inflections(dx, dy)
}

// ── Layer rendering ──

/// Flattened microslabs: `[w0, rho0, irho0, sigma0, w1, ...]`.
fn flatten(slabs: &Microslabs) -> Vec<f64> {
    slabs
        .slabs()
        .iter()
        .flat_map(|s| [s.w, s.rho, s.irho, s.sigma])
        .collect()
}

/// Render a control-point layer between two real SLDs.
///
/// `rhoz` may be empty for equally spaced control points.
#[wasm_bindgen]
pub fn render_free_layer(
    thickness: f64,
    left_rho: f64,
    right_rho: f64,
    rho: &[f64],
    rhoz: &[f64],
    dz: f64,
) -> Result<Vec<f64>, JsError> {
    let layer = FreeLayer::new(
        "Freeform",
        thickness,
        Arc::new(Material::new("left", left_rho, 0.0)),
        Arc::new(Material::new("right", right_rho, 0.0)),
    )
    .with_rho(ParamInit::values(rho), ParamInit::values(rhoz))
    .map_err(to_js)?;
    let mut slabs = Microslabs::new(dz);
    layer.render(&Probe::default(), &mut slabs);
    Ok(flatten(&slabs))
}

/// Render an interface of fixed thickness blending `below_rho` into
/// `above_rho` through the `dz`/`dp` steps.
#[wasm_bindgen]
pub fn render_free_interface(
    thickness: f64,
    interface: f64,
    below_rho: f64,
    above_rho: f64,
    dz: &[f64],
    dp: &[f64],
    step: f64,
) -> Result<Vec<f64>, JsError> {
    let steps = |v: &[f64]| (!v.is_empty()).then(|| ParamInit::values(v));
    let layer = FreeInterface::new(
        "Interface",
        thickness,
        interface,
        Arc::new(Material::new("below", below_rho, 0.0)),
        Arc::new(Material::new("above", above_rho, 0.0)),
        steps(dz),
        steps(dp),
    )
    .map_err(to_js)?;
    let mut slabs = Microslabs::new(step);
    layer.render(&Probe::default(), &mut slabs);
    Ok(flatten(&slabs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_layout() {
        let mut slabs = Microslabs::new(1.0);
        freeform::SlabBuffer::extend(&mut slabs, &[2.0, 3.0], &[0.0, 0.1], &[1.0, 1.0], 5.0);
        assert_eq!(flatten(&slabs), vec![1.0, 2.0, 0.0, 0.0, 1.0, 3.0, 0.1, 5.0]);
    }

    #[test]
    fn test_inflections_passthrough() {
        assert_eq!(inflections(&[1.0; 4], &[1.0, -1.0, 1.0, -1.0]), 2);
    }
}
