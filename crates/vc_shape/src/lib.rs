#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod impls;
mod macros;
mod shape;

pub mod info;

// -----------------------------------------------------------------------------
// Top-level exports

pub use descriptor::TypeDescriptor;
pub use info::{ShapeInfo, Typed};
pub use shape::{List, Map, ScalarRef, Shape, ShapeRef};
