//! Containers for static storage of shape metadata.
//!
//! A `static CELL` inside a generic function is shared by every
//! instantiation, so [`GenericShapeInfoCell`] keys its entries by `TypeId`.
//! Non-generic types use the cheaper [`ShapeInfoCell`].

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::info::ShapeInfo;

// -----------------------------------------------------------------------------
// ShapeInfoCell

/// Static storage for the [`ShapeInfo`] of a non-generic type.
pub struct ShapeInfoCell(OnceLock<ShapeInfo>);

impl ShapeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, creating it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> ShapeInfo) -> &ShapeInfo {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericShapeInfoCell

/// Static storage for the [`ShapeInfo`] of every instantiation of a
/// generic type.
///
/// # Examples
///
/// ```
/// use vc_shape::Typed;
/// use vc_shape::info::{GenericShapeInfoCell, ShapeInfo, OpaqueInfo};
///
/// struct Handle<T>(T);
///
/// impl<T: 'static> Typed for Handle<T> {
///     fn shape_info() -> &'static ShapeInfo {
///         static CELL: GenericShapeInfoCell = GenericShapeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| ShapeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(Handle::<u8>::shape_info().descriptor().is::<Handle<u8>>());
/// assert!(Handle::<u16>::shape_info().descriptor().is::<Handle<u16>>());
/// ```
pub struct GenericShapeInfoCell(RwLock<TypeIdMap<&'static ShapeInfo>>);

impl GenericShapeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, creating it with `f` if missing.
    ///
    /// `f` runs without holding the lock, so it may query other cells.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> ShapeInfo) -> &ShapeInfo {
        let type_id = TypeId::of::<G>();
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static ShapeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, info: ShapeInfo) -> &'static ShapeInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(info)))
    }
}
