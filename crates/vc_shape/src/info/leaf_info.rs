use core::fmt;

use crate::TypeDescriptor;
use crate::info::Typed;

// -----------------------------------------------------------------------------
// ScalarKind

/// The JSON token class a scalar is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Bool,
    Null,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.pad("String"),
            Self::Number => f.pad("Number"),
            Self::Bool => f.pad("Bool"),
            Self::Null => f.pad("Null"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarInfo

/// Info of a leaf type.
#[derive(Clone, Debug)]
pub struct ScalarInfo {
    descriptor: TypeDescriptor,
    kind: ScalarKind,
}

impl ScalarInfo {
    #[inline]
    pub fn new<T: Typed + ?Sized>(kind: ScalarKind) -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            kind,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[inline]
    pub const fn scalar_kind(&self) -> ScalarKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// Info of a declared type that can hold a value of any shape.
///
/// Values declared this way are always written with the shape of the
/// value they actually hold.
#[derive(Clone, Debug)]
pub struct DynamicInfo {
    descriptor: TypeDescriptor,
}

impl DynamicInfo {
    #[inline]
    pub fn new<T: Typed + ?Sized>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Info of a type that has no JSON representation.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    descriptor: TypeDescriptor,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: Typed + ?Sized>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }
}
