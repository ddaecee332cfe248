use crate::info::{ShapeInfo, Typed};
use crate::{Shape, TypeDescriptor};

// -----------------------------------------------------------------------------
// FieldInfo

/// Reads a field out of its owner, `None` if the owner has another type.
pub type FieldAccess = fn(&dyn Shape) -> Option<&dyn Shape>;

/// Information for a named struct field.
///
/// Besides the declared type it carries the accessor used at runtime and
/// the per-field serialization flags.
///
/// # Examples
///
/// ```
/// use vc_shape::{impl_shape_struct, Typed};
///
/// struct User {
///     id: u64,
///     nick: Option<String>,
///     cache: Vec<u8>,
/// }
///
/// impl_shape_struct!(User {
///     #[rename("userId")] id: u64,
///     #[omit_null] nick: Option<String>,
///     #[skip] cache: Vec<u8>,
/// });
///
/// let info = User::shape_info().as_struct().unwrap();
///
/// assert_eq!(info.field_at(0).unwrap().serial_name(), "userId");
/// assert!(info.field("nick").unwrap().is_omit_null());
/// assert!(info.field("cache").unwrap().is_skipped());
/// ```
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    rename: Option<&'static str>,
    // `ShapeInfo` is created on first access; using a function pointer delays it.
    declared: fn() -> &'static ShapeInfo,
    access: FieldAccess,
    skip: bool,
    omit_null: bool,
}

impl FieldInfo {
    /// Creates a field of declared type `T`.
    #[inline]
    pub const fn new<T: Typed + ?Sized>(name: &'static str, access: FieldAccess) -> Self {
        Self {
            name,
            rename: None,
            declared: T::shape_info,
            access,
            skip: false,
            omit_null: false,
        }
    }

    /// Writes the field under `name` instead of its Rust name.
    #[inline]
    pub const fn rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    /// Never writes the field.
    #[inline]
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Leaves the field out when its value is null.
    #[inline]
    pub const fn omit_null(mut self) -> Self {
        self.omit_null = true;
        self
    }

    /// Returns the Rust field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the name the field is written under, before any naming policy.
    #[inline]
    pub const fn serial_name(&self) -> &'static str {
        match self.rename {
            Some(name) => name,
            None => self.name,
        }
    }

    /// Returns `true` if the field carries an explicit serial name.
    #[inline]
    pub const fn is_renamed(&self) -> bool {
        self.rename.is_some()
    }

    #[inline]
    pub fn declared_info(&self) -> &'static ShapeInfo {
        (self.declared)()
    }

    #[inline]
    pub const fn accessor(&self) -> FieldAccess {
        self.access
    }

    /// Reads the field from `owner`.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Shape) -> Option<&'a dyn Shape> {
        (self.access)(owner)
    }

    #[inline]
    pub const fn is_skipped(&self) -> bool {
        self.skip
    }

    #[inline]
    pub const fn is_omit_null(&self) -> bool {
        self.omit_null
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// A container for compile-time struct info.
#[derive(Clone, Debug)]
pub struct StructInfo {
    descriptor: TypeDescriptor,
    fields: Box<[FieldInfo]>,
}

impl StructInfo {
    /// Creates the info of struct `T`, fields in declaration order.
    pub fn new<T: Typed>(fields: &[FieldInfo]) -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}
