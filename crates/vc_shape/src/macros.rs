/// Implements [`Typed`](crate::Typed) and [`Shape`](crate::Shape) for a
/// struct with named fields.
///
/// List the fields to expose with their types, in the order they should be
/// written. Fields can carry flags:
///
/// - `#[rename("name")]`: written under `name`.
/// - `#[skip]`: never written.
/// - `#[omit_null]`: left out when null.
///
/// # Examples
///
/// ```
/// use vc_shape::{impl_shape_struct, Shape, Typed};
///
/// struct Node {
///     label: String,
///     next: Option<Box<Node>>,
/// }
///
/// impl_shape_struct!(Node {
///     label: String,
///     #[omit_null] next: Option<Box<Node>>,
/// });
///
/// let node = Node { label: "a".into(), next: None };
/// let field = Node::shape_info().as_struct().unwrap().field("label").unwrap();
///
/// let label = field.get(&node).unwrap();
/// assert_eq!(label.as_any().downcast_ref::<String>().unwrap(), "a");
/// ```
#[macro_export]
macro_rules! impl_shape_struct {
    (
        $name:ident {
            $( $(#[$flag:ident $(($arg:expr))?])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        impl $crate::Typed for $name {
            fn shape_info() -> &'static $crate::info::ShapeInfo {
                static CELL: $crate::info::ShapeInfoCell = $crate::info::ShapeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::ShapeInfo::Struct($crate::info::StructInfo::new::<Self>(&[$(
                        $crate::info::FieldInfo::new::<$ty>(::core::stringify!($field), {
                            fn access(owner: &dyn $crate::Shape) -> ::core::option::Option<&dyn $crate::Shape> {
                                let this = owner.as_any().downcast_ref::<$name>()?;
                                ::core::option::Option::Some(&this.$field)
                            }
                            access
                        })
                        $( .$flag($($arg)?) )*
                    ),*]))
                })
            }
        }

        impl $crate::Shape for $name {
            #[inline]
            fn runtime_shape(&self) -> &'static $crate::info::ShapeInfo {
                <Self as $crate::Typed>::shape_info()
            }

            #[inline]
            fn shape_ref(&self) -> $crate::ShapeRef<'_> {
                $crate::ShapeRef::Struct
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }
    };
}

/// Implements [`Typed`](crate::Typed) and [`Shape`](crate::Shape) for a
/// type that has no JSON form.
///
/// Writing such a value fails instead of producing output.
///
/// # Examples
///
/// ```
/// use vc_shape::{impl_shape_opaque, Typed};
/// use vc_shape::info::ShapeKind;
///
/// struct FileHandle(u32);
///
/// impl_shape_opaque!(FileHandle);
///
/// assert_eq!(FileHandle::shape_info().kind(), ShapeKind::Opaque);
/// ```
#[macro_export]
macro_rules! impl_shape_opaque {
    ($name:ty) => {
        impl $crate::Typed for $name {
            fn shape_info() -> &'static $crate::info::ShapeInfo {
                static CELL: $crate::info::ShapeInfoCell = $crate::info::ShapeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::ShapeInfo::Opaque($crate::info::OpaqueInfo::new::<Self>())
                })
            }
        }

        impl $crate::Shape for $name {
            #[inline]
            fn runtime_shape(&self) -> &'static $crate::info::ShapeInfo {
                <Self as $crate::Typed>::shape_info()
            }

            #[inline]
            fn shape_ref(&self) -> $crate::ShapeRef<'_> {
                $crate::ShapeRef::Opaque
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::info::ShapeKind;
    use crate::{Shape, ShapeRef, Typed};

    struct Empty {}

    impl_shape_struct!(Empty {});

    struct Pair {
        left: i32,
        right: Vec<String>,
        hidden: u8,
    }

    impl_shape_struct!(Pair {
        #[rename("l")]
        left: i32,
        right: Vec<String>,
        #[skip]
        hidden: u8,
    });

    #[test]
    fn empty_struct_has_no_fields() {
        let info = Empty::shape_info().as_struct().unwrap();
        assert_eq!(info.field_len(), 0);
        assert!(matches!(Empty {}.shape_ref(), ShapeRef::Struct));
    }

    #[test]
    fn fields_in_declaration_order() {
        let pair = Pair {
            left: 1,
            right: vec!["x".into()],
            hidden: 0,
        };
        let info = Pair::shape_info().as_struct().unwrap();
        let names: Vec<_> = info.fields().iter().map(|f| f.serial_name()).collect();
        assert_eq!(names, ["l", "right", "hidden"]);
        assert!(info.field_at(2).unwrap().is_skipped());

        let right = info.field("right").unwrap();
        assert_eq!(right.declared_info().kind(), ShapeKind::List);
        let value = right.get(&pair).unwrap();
        assert_eq!(value.as_any().downcast_ref::<Vec<String>>().unwrap().len(), 1);
        assert_eq!(pair.hidden, 0);
    }

    #[test]
    fn accessor_rejects_other_owner() {
        let info = Pair::shape_info().as_struct().unwrap();
        assert!(info.field_at(0).unwrap().get(&5_u8).is_none());
    }
}
