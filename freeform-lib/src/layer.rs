use crate::material::Probe;
use crate::parameter::Parameter;
use crate::slabs::SlabBuffer;

/// A section of the sample that can be rendered into microslabs.
pub trait Layer {
    fn name(&self) -> &str;

    /// Current thickness in Å.
    fn thickness(&self) -> f64;

    /// Every fittable parameter, including those of the neighbours.
    fn parameters(&self) -> Vec<&Parameter>;

    /// Append this layer's slabs to `slabs`.
    ///
    /// Reads the current parameter values and neighbour SLDs; never changes
    /// the layer itself.
    fn render(&self, probe: &Probe, slabs: &mut dyn SlabBuffer);
}
