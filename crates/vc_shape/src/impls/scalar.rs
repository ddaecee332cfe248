use alloc::borrow::Cow;
use core::any::Any;

use crate::info::{ScalarInfo, ScalarKind, ShapeInfo, ShapeInfoCell, Typed};
use crate::{ScalarRef, Shape, ShapeRef};

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident, |$this:ident| $scalar:expr;)*) => {$(
        impl Typed for $ty {
            fn shape_info() -> &'static ShapeInfo {
                static CELL: ShapeInfoCell = ShapeInfoCell::new();
                CELL.get_or_init(|| ShapeInfo::Scalar(ScalarInfo::new::<$ty>(ScalarKind::$kind)))
            }
        }

        impl Shape for $ty {
            #[inline]
            fn runtime_shape(&self) -> &'static ShapeInfo {
                <Self as Typed>::shape_info()
            }

            #[inline]
            fn shape_ref(&self) -> ShapeRef<'_> {
                let $this = self;
                ShapeRef::Scalar($scalar)
            }

            #[inline]
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    )*};
}

impl_scalar! {
    () => Null, |_this| ScalarRef::Null;
    bool => Bool, |this| ScalarRef::Bool(*this);
    i8 => Number, |this| ScalarRef::Int(i64::from(*this));
    i16 => Number, |this| ScalarRef::Int(i64::from(*this));
    i32 => Number, |this| ScalarRef::Int(i64::from(*this));
    i64 => Number, |this| ScalarRef::Int(*this);
    isize => Number, |this| ScalarRef::Int(*this as i64);
    u8 => Number, |this| ScalarRef::UInt(u64::from(*this));
    u16 => Number, |this| ScalarRef::UInt(u64::from(*this));
    u32 => Number, |this| ScalarRef::UInt(u64::from(*this));
    u64 => Number, |this| ScalarRef::UInt(*this);
    usize => Number, |this| ScalarRef::UInt(*this as u64);
    i128 => Number, |this| ScalarRef::Int128(*this);
    u128 => Number, |this| ScalarRef::UInt128(*this);
    f32 => Number, |this| ScalarRef::F32(*this);
    f64 => Number, |this| ScalarRef::F64(*this);
    char => String, |this| ScalarRef::Char(*this);
    String => String, |this| ScalarRef::Str(this.as_str());
    &'static str => String, |this| ScalarRef::Str(this);
    Cow<'static, str> => String, |this| ScalarRef::Str(this.as_ref());
}

#[cfg(test)]
mod tests {
    use crate::info::{ScalarKind, ShapeKind};
    use crate::{ScalarRef, Shape, ShapeRef, Typed};

    #[test]
    fn integers_widen() {
        assert!(matches!((-3_i8).shape_ref(), ShapeRef::Scalar(ScalarRef::Int(-3))));
        assert!(matches!(300_u16.shape_ref(), ShapeRef::Scalar(ScalarRef::UInt(300))));
        assert!(matches!(
            u128::MAX.shape_ref(),
            ShapeRef::Scalar(ScalarRef::UInt128(u128::MAX))
        ));
    }

    #[test]
    fn text_kinds() {
        let info = <String as Typed>::shape_info();
        assert_eq!(info.kind(), ShapeKind::Scalar);
        assert_eq!(info.as_scalar().unwrap().scalar_kind(), ScalarKind::String);
        assert!(matches!("hi".shape_ref(), ShapeRef::Scalar(ScalarRef::Str("hi"))));
        assert_eq!(
            <() as Typed>::shape_info().as_scalar().unwrap().scalar_kind(),
            ScalarKind::Null
        );
    }
}
