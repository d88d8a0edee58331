#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A fittable scalar as stored in a model description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A material with a constant scattering length density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    pub rho: ParameterRecord,
    pub irho: ParameterRecord,
}

/// Spline control-point layer between two materials.
///
/// Empty `rhoz`/`irhoz` mean equally spaced control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeLayerRecord {
    pub name: String,
    pub thickness: ParameterRecord,
    pub left: MaterialRecord,
    pub right: MaterialRecord,
    pub rho: Vec<ParameterRecord>,
    pub irho: Vec<ParameterRecord>,
    pub rhoz: Vec<ParameterRecord>,
    pub irhoz: Vec<ParameterRecord>,
}

/// Interface layer blending `below` into `above` through a monotone
/// volume-fraction profile.
///
/// `thickness` is `None` when the thickness is derived from the `dz` steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeInterfaceRecord {
    pub name: String,
    pub thickness: Option<ParameterRecord>,
    pub interface: ParameterRecord,
    pub below: MaterialRecord,
    pub above: MaterialRecord,
    pub dz: Vec<ParameterRecord>,
    pub dp: Vec<ParameterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerRecord {
    Free(FreeLayerRecord),
    Interface(FreeInterfaceRecord),
}
