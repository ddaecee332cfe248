use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Shape;

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Identity of a type: its [`TypeId`] plus a readable path for messages.
///
/// Equality and hashing only look at the id.
///
/// # Examples
///
/// ```
/// use vc_shape::TypeDescriptor;
///
/// let desc = TypeDescriptor::of::<Vec<u8>>();
/// assert!(desc.is::<Vec<u8>>());
/// assert!(TypeDescriptor::any().is_any());
/// ```
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    path: &'static str,
}

impl TypeDescriptor {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    /// The descriptor of the open "any" type, `dyn Shape`.
    #[inline]
    pub fn any() -> Self {
        Self::of::<dyn Shape>()
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        self.is::<dyn Shape>()
    }
}

impl PartialEq for TypeDescriptor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.path)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path)
    }
}
