use alloc::sync::Arc;
use core::any::Any;

use crate::info::{DynamicInfo, GenericShapeInfoCell, OptionInfo, ShapeInfo, ShapeInfoCell, Typed};
use crate::{Shape, ShapeRef};

// -----------------------------------------------------------------------------
// Option

impl<T: Shape + Typed> Typed for Option<T> {
    fn shape_info() -> &'static ShapeInfo {
        static CELL: GenericShapeInfoCell = GenericShapeInfoCell::new();
        CELL.get_or_insert::<Self>(|| ShapeInfo::Option(OptionInfo::new::<Self, T>()))
    }
}

impl<T: Shape + Typed> Shape for Option<T> {
    #[inline]
    fn runtime_shape(&self) -> &'static ShapeInfo {
        <Self as Typed>::shape_info()
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::Option(self.as_ref().map(|value| value as &dyn Shape))
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// dyn Shape

/// `dyn Shape` is the open "any" type: it declares nothing and every value
/// stored behind it is written with its own shape.
impl Typed for dyn Shape {
    fn shape_info() -> &'static ShapeInfo {
        static CELL: ShapeInfoCell = ShapeInfoCell::new();
        CELL.get_or_init(|| ShapeInfo::Dynamic(DynamicInfo::new::<dyn Shape>()))
    }
}

// -----------------------------------------------------------------------------
// Pointers

// Owning pointers are transparent: same declared info, same runtime view,
// and `as_any` exposes the pointee.
macro_rules! impl_transparent {
    ($($ptr:ident),*) => {$(
        impl<T: Typed + ?Sized> Typed for $ptr<T> {
            #[inline]
            fn shape_info() -> &'static ShapeInfo {
                T::shape_info()
            }
        }

        impl<T: Shape + ?Sized> Shape for $ptr<T> {
            #[inline]
            fn runtime_shape(&self) -> &'static ShapeInfo {
                (**self).runtime_shape()
            }

            #[inline]
            fn shape_ref(&self) -> ShapeRef<'_> {
                (**self).shape_ref()
            }

            #[inline]
            fn as_any(&self) -> &dyn Any {
                (**self).as_any()
            }
        }
    )*};
}

impl_transparent!(Box, Arc);
