use crate::info::ShapeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to the declared shape of a type.
///
/// Implemented for the built-in types by this crate and for user structs
/// by [`impl_shape_struct!`](crate::impl_shape_struct).
///
/// # Manually Impl
///
/// Use [`ShapeInfoCell`](crate::info::ShapeInfoCell) for non-generic types
/// and [`GenericShapeInfoCell`](crate::info::GenericShapeInfoCell) when the
/// `static` would be shared by several instantiations.
///
/// ```
/// use core::any::Any;
/// use vc_shape::{Shape, ShapeRef, Typed};
/// use vc_shape::info::{FieldInfo, ShapeInfo, ShapeInfoCell, StructInfo};
///
/// struct Meters {
///     value: f64,
/// }
///
/// fn value(owner: &dyn Shape) -> Option<&dyn Shape> {
///     let this = owner.as_any().downcast_ref::<Meters>()?;
///     Some(&this.value)
/// }
///
/// impl Typed for Meters {
///     fn shape_info() -> &'static ShapeInfo {
///         static CELL: ShapeInfoCell = ShapeInfoCell::new();
///         CELL.get_or_init(|| {
///             ShapeInfo::Struct(StructInfo::new::<Self>(&[
///                 FieldInfo::new::<f64>("value", value).rename("m"),
///             ]))
///         })
///     }
/// }
///
/// impl Shape for Meters {
///     fn runtime_shape(&self) -> &'static ShapeInfo {
///         Self::shape_info()
///     }
///     fn shape_ref(&self) -> ShapeRef<'_> {
///         ShapeRef::Struct
///     }
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let field = Meters::shape_info().as_struct().unwrap().field("value").unwrap();
/// assert_eq!(field.serial_name(), "m");
/// ```
pub trait Typed: 'static {
    fn shape_info() -> &'static ShapeInfo;
}
