//! Microslab discretization of a depth profile.

use tracing::trace;

/// Upper bound on the number of microslabs a single layer is cut into.
pub const MAX_MICROSLABS: usize = 1 << 20;

/// Destination for rendered layers.
///
/// Slabs accumulate in call order, which is depth order, so layers must be
/// rendered into a buffer one at a time from the substrate outward (or the
/// reverse, consistently).
pub trait SlabBuffer {
    /// Split `thickness` into microslabs, returning `(widths, positions)`.
    fn microslabs(&self, thickness: f64) -> (Vec<f64>, Vec<f64>);

    /// Append one slab per entry of `w`. `sigma` is the roughness of the
    /// interface after the last appended slab.
    fn extend(&mut self, rho: &[f64], irho: &[f64], w: &[f64], sigma: f64);
}

/// One constant-density slice of the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Microslab {
    pub w: f64,
    pub rho: f64,
    pub irho: f64,
    /// Roughness of the interface on the far side of this slab.
    pub sigma: f64,
}

/// Fixed-step microslab accumulator.
#[derive(Debug, Clone)]
pub struct Microslabs {
    dz: f64,
    slabs: Vec<Microslab>,
}

impl Microslabs {
    /// Buffer that cuts layers into slabs no wider than `dz`.
    pub fn new(dz: f64) -> Self {
        Microslabs {
            dz,
            slabs: Vec::new(),
        }
    }

    pub fn dz(&self) -> f64 {
        self.dz
    }

    pub fn slabs(&self) -> &[Microslab] {
        &self.slabs
    }

    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    pub fn total_thickness(&self) -> f64 {
        self.slabs.iter().map(|s| s.w).sum()
    }

    pub fn clear(&mut self) {
        self.slabs.clear();
    }

    /// Complex SLD `rho + i·irho` of every slab, ready for a reflectivity
    /// kernel.
    #[cfg(feature = "complex")]
    pub fn complex_sld(&self) -> Vec<num_complex::Complex64> {
        self.slabs
            .iter()
            .map(|s| num_complex::Complex64::new(s.rho, s.irho))
            .collect()
    }
}

impl SlabBuffer for Microslabs {
    /// Equal slabs of width `thickness / ceil(thickness / dz)`, positioned at
    /// their centres. Empty for non-positive or non-finite thickness; at most
    /// [`MAX_MICROSLABS`] slabs, widened as needed.
    fn microslabs(&self, thickness: f64) -> (Vec<f64>, Vec<f64>) {
        if !thickness.is_finite() || thickness <= 0.0 || self.dz.is_nan() || self.dz <= 0.0 {
            trace!(thickness, dz = self.dz, "no microslabs");
            return (Vec::new(), Vec::new());
        }
        let n = (thickness / self.dz).ceil();
        if n > MAX_MICROSLABS as f64 {
            trace!(thickness, dz = self.dz, "microslab count capped");
        }
        let n = n.clamp(1.0, MAX_MICROSLABS as f64) as usize;
        let w = thickness / n as f64;
        let z = (0..n).map(|i| (i as f64 + 0.5) * w).collect();
        (vec![w; n], z)
    }

    fn extend(&mut self, rho: &[f64], irho: &[f64], w: &[f64], sigma: f64) {
        debug_assert!(rho.len() == w.len() && irho.len() == w.len());
        if w.is_empty() {
            return;
        }
        self.slabs.extend(
            w.iter()
                .zip(rho)
                .zip(irho)
                .map(|((&w, &rho), &irho)| Microslab {
                    w,
                    rho,
                    irho,
                    sigma: 0.0,
                }),
        );
        if let Some(last) = self.slabs.last_mut() {
            last.sigma = sigma;
        }
    }
}
