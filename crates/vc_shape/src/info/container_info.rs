use crate::TypeDescriptor;
use crate::info::{ShapeInfo, Typed};

// -----------------------------------------------------------------------------
// ListInfo

/// A container for compile-time list-like info.
///
/// # Examples
///
/// ```
/// use vc_shape::Typed;
///
/// let info = <Vec<i32> as Typed>::shape_info().as_list().unwrap();
/// assert!(info.item_info().descriptor().is::<i32>());
/// ```
#[derive(Clone, Debug)]
pub struct ListInfo {
    descriptor: TypeDescriptor,
    // `ShapeInfo` is created on the first visit, use function pointers to delay it.
    item_info: fn() -> &'static ShapeInfo,
}

impl ListInfo {
    #[inline]
    pub fn new<TList: Typed, TItem: Typed + ?Sized>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<TList>(),
            item_info: TItem::shape_info,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[inline]
    pub fn item_info(&self) -> &'static ShapeInfo {
        (self.item_info)()
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// A container for compile-time map-like info.
#[derive(Clone, Debug)]
pub struct MapInfo {
    descriptor: TypeDescriptor,
    key_info: fn() -> &'static ShapeInfo,
    value_info: fn() -> &'static ShapeInfo,
}

impl MapInfo {
    #[inline]
    pub fn new<TMap: Typed, TKey: Typed + ?Sized, TValue: Typed + ?Sized>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<TMap>(),
            key_info: TKey::shape_info,
            value_info: TValue::shape_info,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[inline]
    pub fn key_info(&self) -> &'static ShapeInfo {
        (self.key_info)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static ShapeInfo {
        (self.value_info)()
    }
}

// -----------------------------------------------------------------------------
// OptionInfo

/// Info of an optional value, `None` is written as `null`.
#[derive(Clone, Debug)]
pub struct OptionInfo {
    descriptor: TypeDescriptor,
    inner_info: fn() -> &'static ShapeInfo,
}

impl OptionInfo {
    #[inline]
    pub fn new<TOption: Typed, TInner: Typed + ?Sized>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<TOption>(),
            inner_info: TInner::shape_info,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[inline]
    pub fn inner_info(&self) -> &'static ShapeInfo {
        (self.inner_info)()
    }
}
