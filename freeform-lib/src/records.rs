//! Building layers from serialized model descriptions.

use std::sync::Arc;

use freeform_data::{
    FreeInterfaceRecord, FreeLayerRecord, LayerRecord, MaterialRecord, ParameterRecord,
};

use crate::error::{FreeformError, Result};
use crate::free_interface::{FreeInterface, FreeInterfaceW};
use crate::free_layer::FreeLayer;
use crate::layer::Layer;
use crate::material::{Material, Neighbor, Probe};
use crate::parameter::{ParamInit, Parameter};
use crate::slabs::SlabBuffer;

/// Any of the freeform layers.
pub enum FreeformLayer {
    Free(FreeLayer),
    InterfaceW(FreeInterfaceW),
    Interface(FreeInterface),
}

impl FreeformLayer {
    /// Build a layer from its record. Stored bounds are kept as is.
    pub fn from_record(record: &LayerRecord) -> Result<Self> {
        match record {
            LayerRecord::Free(r) => free_layer(r).map(FreeformLayer::Free),
            LayerRecord::Interface(r) => interface(r),
        }
    }

    fn as_layer(&self) -> &dyn Layer {
        match self {
            FreeformLayer::Free(l) => l as &dyn Layer,
            FreeformLayer::InterfaceW(l) => l,
            FreeformLayer::Interface(l) => l,
        }
    }
}

impl Layer for FreeformLayer {
    fn name(&self) -> &str {
        self.as_layer().name()
    }

    fn thickness(&self) -> f64 {
        self.as_layer().thickness()
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.as_layer().parameters()
    }

    fn render(&self, probe: &Probe, slabs: &mut dyn SlabBuffer) {
        self.as_layer().render(probe, slabs)
    }
}

pub fn parameter_from_record(r: &ParameterRecord) -> Parameter {
    Parameter::new(r.name.clone(), r.value, r.lower, r.upper)
}

pub fn parameter_record(p: &Parameter) -> ParameterRecord {
    let (lower, upper) = p.bounds();
    ParameterRecord {
        name: p.name().to_string(),
        value: p.value(),
        lower,
        upper,
    }
}

pub fn material_from_record(r: &MaterialRecord) -> Material {
    Material::from_parameters(
        r.name.clone(),
        parameter_from_record(&r.rho),
        parameter_from_record(&r.irho),
    )
}

pub fn material_record(m: &Material) -> MaterialRecord {
    MaterialRecord {
        name: m.name().to_string(),
        rho: parameter_record(m.rho()),
        irho: parameter_record(m.irho()),
    }
}

/// Serialize a layer description with postcard.
pub fn encode_layer(record: &LayerRecord) -> Result<Vec<u8>> {
    postcard::to_allocvec(record).map_err(|e| FreeformError::Record(e.to_string()))
}

/// Deserialize a layer description written by [`encode_layer`].
pub fn decode_layer(bytes: &[u8]) -> Result<LayerRecord> {
    postcard::from_bytes(bytes).map_err(|e| FreeformError::Record(e.to_string()))
}

fn inits(records: &[ParameterRecord]) -> Vec<ParamInit> {
    records
        .iter()
        .map(|r| ParamInit::Parameter(parameter_from_record(r)))
        .collect()
}

fn neighbor(r: &MaterialRecord) -> Neighbor {
    Arc::new(material_from_record(r))
}

fn free_layer(r: &FreeLayerRecord) -> Result<FreeLayer> {
    FreeLayer::new(
        r.name.clone(),
        parameter_from_record(&r.thickness),
        neighbor(&r.left),
        neighbor(&r.right),
    )
    .with_rho(inits(&r.rho), inits(&r.rhoz))?
    .with_irho(inits(&r.irho), inits(&r.irhoz))
}

fn interface(r: &FreeInterfaceRecord) -> Result<FreeformLayer> {
    let interface = parameter_from_record(&r.interface);
    let (below, above) = (neighbor(&r.below), neighbor(&r.above));
    let (dz, dp) = (Some(inits(&r.dz)), Some(inits(&r.dp)));
    Ok(match &r.thickness {
        Some(t) => FreeformLayer::Interface(FreeInterface::new(
            r.name.clone(),
            parameter_from_record(t),
            interface,
            below,
            above,
            dz,
            dp,
        )?),
        None => FreeformLayer::InterfaceW(FreeInterfaceW::new(
            r.name.clone(),
            interface,
            below,
            above,
            dz,
            dp,
        )?),
    })
}
