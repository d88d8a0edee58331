//! Freeform sections of a reflectometry sample.
//!
//! Smoothly varying regions between slabs are described by a handful of
//! control points, interpolated with a monotone cubic spline and cut into
//! microslabs for the reflectivity calculation.

pub mod error;
pub mod free_interface;
pub mod free_layer;
pub mod inflection;
pub mod layer;
pub mod material;
pub mod monospline;
pub mod parameter;
pub mod records;
pub mod slabs;

pub use error::{FreeformError, Result};
pub use free_interface::{FreeInterface, FreeInterfaceW};
pub use free_layer::FreeLayer;
pub use inflection::{count_inflections, inflections};
pub use layer::Layer;
pub use material::{Material, Neighbor, Probe, Sld};
pub use monospline::{MonoSpline, hermite, monospline};
pub use parameter::{ParamInit, Parameter};
pub use records::{FreeformLayer, decode_layer, encode_layer};
pub use slabs::{MAX_MICROSLABS, Microslab, Microslabs, SlabBuffer};
pub use freeform_data;
