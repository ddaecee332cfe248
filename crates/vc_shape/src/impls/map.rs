use alloc::collections::BTreeMap;
use core::any::Any;
use std::collections::HashMap;

use vc_utils::hash::hashbrown;

use crate::info::{GenericShapeInfoCell, MapInfo, ShapeInfo, Typed};
use crate::{Map, Shape, ShapeRef};

macro_rules! impl_map {
    ([$($generics:tt)*] $ty:ty, $key:ty, $value:ty) => {
        impl<$($generics)*> Typed for $ty {
            fn shape_info() -> &'static ShapeInfo {
                static CELL: GenericShapeInfoCell = GenericShapeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    ShapeInfo::Map(MapInfo::new::<Self, $key, $value>())
                })
            }
        }

        impl<$($generics)*> Shape for $ty {
            #[inline]
            fn runtime_shape(&self) -> &'static ShapeInfo {
                <Self as Typed>::shape_info()
            }

            #[inline]
            fn shape_ref(&self) -> ShapeRef<'_> {
                ShapeRef::Map(self)
            }

            #[inline]
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl<$($generics)*> Map for $ty {
            #[inline]
            fn len(&self) -> usize {
                IntoIterator::into_iter(self).len()
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Shape, &dyn Shape)> + '_> {
                Box::new(
                    IntoIterator::into_iter(self)
                        .map(|(key, value)| (key as &dyn Shape, value as &dyn Shape)),
                )
            }
        }
    };
}

impl_map!([K: Shape + Typed + Ord, V: Shape + Typed] BTreeMap<K, V>, K, V);
impl_map!([K: Shape + Typed, V: Shape + Typed, S: Send + Sync + 'static] HashMap<K, V, S>, K, V);
impl_map!(
    [K: Shape + Typed, V: Shape + Typed, S: Send + Sync + 'static]
    hashbrown::HashMap<K, V, S>, K, V
);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use vc_utils::hash::{NoOpHashState, hashbrown};

    use crate::{ScalarRef, Shape, ShapeRef, Typed};

    #[test]
    fn btree_map_iterates_sorted() {
        let map = BTreeMap::from([("b", 2_i32), ("a", 1)]);
        let ShapeRef::Map(view) = map.shape_ref() else {
            panic!("not a map");
        };
        let keys: Vec<_> = view
            .iter()
            .map(|(key, _)| match key.shape_ref() {
                ShapeRef::Scalar(ScalarRef::Str(key)) => key.to_owned(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn hashbrown_map_info() {
        let info = <hashbrown::HashMap<u64, Vec<u8>, NoOpHashState> as Typed>::shape_info().as_map().unwrap();
        assert!(info.key_info().descriptor().is::<u64>());
        assert!(info.value_info().descriptor().is::<Vec<u8>>());
    }
}
