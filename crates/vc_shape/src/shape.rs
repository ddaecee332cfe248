use core::any::Any;
use core::fmt;

use crate::TypeDescriptor;
use crate::info::{ScalarKind, ShapeInfo};

// -----------------------------------------------------------------------------
// Shape

/// Object-safe access to a value's concrete shape and content.
///
/// [`Typed`](crate::Typed) describes what a type declares,
/// `Shape` describes what a value actually is. They differ for
/// `Box<dyn Shape>`, whose declared shape is "any" while the value
/// reports the shape of whatever it holds.
///
/// # Examples
///
/// ```
/// use vc_shape::{Shape, ShapeRef, ScalarRef};
///
/// let boxed: Box<dyn Shape> = Box::new(7_u8);
///
/// assert!(boxed.descriptor().is::<u8>());
/// assert!(matches!(boxed.shape_ref(), ShapeRef::Scalar(ScalarRef::UInt(7))));
/// assert_eq!(boxed.as_any().downcast_ref::<u8>(), Some(&7));
/// ```
pub trait Shape: Any + Send + Sync {
    /// Returns the static metadata of the concrete type behind `self`.
    fn runtime_shape(&self) -> &'static ShapeInfo;

    /// Returns runtime access to the value content.
    fn shape_ref(&self) -> ShapeRef<'_>;

    /// Casts to `&dyn Any`, looking through transparent wrappers.
    fn as_any(&self) -> &dyn Any;

    /// Returns the descriptor of the concrete type.
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        self.runtime_shape().descriptor()
    }
}

// -----------------------------------------------------------------------------
// ShapeRef

/// Borrowed view of a value, split by shape.
///
/// Struct members are not listed here, they are read through the
/// accessors stored in [`FieldInfo`](crate::info::FieldInfo).
pub enum ShapeRef<'a> {
    Struct,
    List(&'a dyn List),
    Map(&'a dyn Map),
    Scalar(ScalarRef<'a>),
    /// An optional value, `None` when absent.
    Option(Option<&'a dyn Shape>),
    Opaque,
}

impl fmt::Debug for ShapeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.write_str("Struct"),
            Self::List(list) => write!(f, "List(len = {})", list.len()),
            Self::Map(map) => write!(f, "Map(len = {})", map.len()),
            Self::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Self::Option(value) => write!(f, "Option(is_some = {})", value.is_some()),
            Self::Opaque => f.write_str("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarRef

/// A leaf value.
///
/// Integers are widened to 64 bits, 128-bit integers keep their own variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Int128(i128),
    UInt128(u128),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
}

impl ScalarRef<'_> {
    /// Returns the JSON token class of this scalar.
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Null => ScalarKind::Null,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Char(_) | Self::Str(_) => ScalarKind::String,
            _ => ScalarKind::Number,
        }
    }
}

// -----------------------------------------------------------------------------
// Containers

/// Runtime access to a sequence.
pub trait List {
    fn len(&self) -> usize;

    /// Iterates the elements in order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Shape> + '_>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runtime access to a key-value collection.
pub trait Map {
    fn len(&self) -> usize;

    /// Iterates the entries in the collection's own order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Shape, &dyn Shape)> + '_>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
