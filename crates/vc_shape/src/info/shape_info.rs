use core::{error, fmt};

use crate::TypeDescriptor;
use crate::info::{DynamicInfo, OpaqueInfo, ScalarInfo};
use crate::info::{ListInfo, MapInfo, OptionInfo, StructInfo};

// -----------------------------------------------------------------------------
// ShapeKind

/// The "kind" of a [`ShapeInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Struct,
    List,
    Map,
    Scalar,
    Option,
    Dynamic,
    Opaque,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.pad("Struct"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Scalar => f.pad("Scalar"),
            Self::Option => f.pad("Option"),
            Self::Dynamic => f.pad("Dynamic"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a [`ShapeInfo`] is not the expected [`ShapeKind`].
#[derive(Debug)]
pub struct ShapeKindError {
    pub expected: ShapeKind,
    pub received: ShapeKind,
}

impl fmt::Display for ShapeKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ShapeKindError {}

// -----------------------------------------------------------------------------
// ShapeInfo

/// Static metadata of one type.
///
/// Nested types are referenced through function pointers and resolved on
/// demand, which keeps self-referential types finite.
///
/// Two infos compare equal when they describe the same type.
///
/// # Examples
///
/// ```
/// use vc_shape::Typed;
/// use vc_shape::info::{ShapeKind, ScalarKind};
///
/// let info = <Vec<Option<u32>> as Typed>::shape_info();
/// assert_eq!(info.kind(), ShapeKind::List);
///
/// let item = info.as_list().unwrap().item_info();
/// assert_eq!(item.kind(), ShapeKind::Option);
///
/// let inner = item.as_option().unwrap().inner_info();
/// assert_eq!(inner.as_scalar().unwrap().scalar_kind(), ScalarKind::Number);
/// ```
#[derive(Debug, Clone)]
pub enum ShapeInfo {
    Struct(StructInfo),
    List(ListInfo),
    Map(MapInfo),
    Scalar(ScalarInfo),
    Option(OptionInfo),
    /// A declared type open to any shape, such as `Box<dyn Shape>`.
    Dynamic(DynamicInfo),
    /// A type without a JSON representation.
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Converts to the specific info, failing on any other kind.
        pub const fn $name(&self) -> Result<&$info, ShapeKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ShapeKindError {
                    expected: ShapeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl ShapeInfo {
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_option: Option => OptionInfo);
    impl_cast_method!(as_dynamic: Dynamic => DynamicInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);

    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Struct(_) => ShapeKind::Struct,
            Self::List(_) => ShapeKind::List,
            Self::Map(_) => ShapeKind::Map,
            Self::Scalar(_) => ShapeKind::Scalar,
            Self::Option(_) => ShapeKind::Option,
            Self::Dynamic(_) => ShapeKind::Dynamic,
            Self::Opaque(_) => ShapeKind::Opaque,
        }
    }

    pub const fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Struct(info) => info.descriptor(),
            Self::List(info) => info.descriptor(),
            Self::Map(info) => info.descriptor(),
            Self::Scalar(info) => info.descriptor(),
            Self::Option(info) => info.descriptor(),
            Self::Dynamic(info) => info.descriptor(),
            Self::Opaque(info) => info.descriptor(),
        }
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.descriptor().path()
    }

    /// Returns `true` for declared types that accept any shape.
    #[inline]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl PartialEq for ShapeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.descriptor() == other.descriptor()
    }
}

impl Eq for ShapeInfo {}
