use alloc::collections::{BTreeSet, VecDeque};
use core::any::Any;
use std::collections::HashSet;

use crate::info::{GenericShapeInfoCell, ListInfo, ShapeInfo, Typed};
use crate::{List, Shape, ShapeRef};

// Element access goes through `IntoIterator for &Self`, inherent `len`/`iter`
// of slices would otherwise be shadowed by the `List` methods.
macro_rules! impl_list {
    ([$($generics:tt)*] $ty:ty, $item:ty) => {
        impl<$($generics)*> Typed for $ty {
            fn shape_info() -> &'static ShapeInfo {
                static CELL: GenericShapeInfoCell = GenericShapeInfoCell::new();
                CELL.get_or_insert::<Self>(|| ShapeInfo::List(ListInfo::new::<Self, $item>()))
            }
        }

        impl<$($generics)*> Shape for $ty {
            #[inline]
            fn runtime_shape(&self) -> &'static ShapeInfo {
                <Self as Typed>::shape_info()
            }

            #[inline]
            fn shape_ref(&self) -> ShapeRef<'_> {
                ShapeRef::List(self)
            }

            #[inline]
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl<$($generics)*> List for $ty {
            #[inline]
            fn len(&self) -> usize {
                IntoIterator::into_iter(self).len()
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Shape> + '_> {
                Box::new(IntoIterator::into_iter(self).map(|item| item as &dyn Shape))
            }
        }
    };
}

impl_list!([T: Shape + Typed] Vec<T>, T);
impl_list!([T: Shape + Typed] VecDeque<T>, T);
impl_list!([T: Shape + Typed, const N: usize] [T; N], T);
impl_list!([T: Shape + Typed + Ord] BTreeSet<T>, T);
impl_list!([T: Shape + Typed, S: Send + Sync + 'static] HashSet<T, S>, T);
