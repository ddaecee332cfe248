//! Static shape metadata.
//!
//! Every type that can be written has one [`ShapeInfo`], created on first
//! access through [`Typed::shape_info`] and stored in a [`ShapeInfoCell`]
//! or [`GenericShapeInfoCell`] for the rest of the process.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod container_info;
mod leaf_info;
mod shape_info;
mod struct_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericShapeInfoCell, ShapeInfoCell};
pub use container_info::{ListInfo, MapInfo, OptionInfo};
pub use leaf_info::{DynamicInfo, OpaqueInfo, ScalarInfo, ScalarKind};
pub use shape_info::{ShapeInfo, ShapeKind, ShapeKindError};
pub use struct_info::{FieldAccess, FieldInfo, StructInfo};
pub use typed::Typed;
