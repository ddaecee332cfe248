//! Chooses the shape a value is written with.
//!
//! A member declared as `Box<dyn Shape>` (or any other dynamic type) is
//! written with the shape of the value it holds, never with its declared
//! shape. Optional values are unwrapped here as well, so the driver only
//! ever sees `null` or a present value.

use vc_shape::info::ShapeInfo;
use vc_shape::{ScalarRef, Shape, ShapeRef};

use crate::SerializeError;

// -----------------------------------------------------------------------------
// Resolved

/// Result of [`resolve`].
#[derive(Clone, Copy)]
pub enum Resolved<'a> {
    /// The value is absent and is written as `null`.
    Null,
    Value {
        value: &'a dyn Shape,
        info: &'static ShapeInfo,
    },
}

/// Resolves `value`, declared as `expected`, to the shape it is written with.
///
/// # Examples
///
/// ```
/// use vc_json::resolver::{resolve, Resolved};
/// use vc_shape::{Shape, Typed};
///
/// let any: Box<dyn Shape> = Box::new(vec![1_u8]);
/// let declared = <Box<dyn Shape> as Typed>::shape_info();
///
/// let Resolved::Value { info, .. } = resolve(declared, &any) else {
///     unreachable!()
/// };
/// assert!(info.descriptor().is::<Vec<u8>>());
///
/// let none: Option<u8> = None;
/// assert!(matches!(resolve(<Option<u8> as Typed>::shape_info(), &none), Resolved::Null));
/// ```
pub fn resolve<'a>(expected: &'static ShapeInfo, value: &'a dyn Shape) -> Resolved<'a> {
    let mut expected = expected;
    let mut value = value;

    loop {
        match value.shape_ref() {
            ShapeRef::Option(None) | ShapeRef::Scalar(ScalarRef::Null) => return Resolved::Null,
            ShapeRef::Option(Some(inner)) => {
                if let ShapeInfo::Option(info) = expected {
                    expected = info.inner_info();
                }
                value = inner;
            }
            _ => break,
        }
    }

    let concrete = value.runtime_shape();
    if concrete.descriptor() == expected.descriptor() {
        return Resolved::Value {
            value,
            info: expected,
        };
    }

    log::trace!(
        "dispatching `{}` declared as `{}`",
        concrete.type_path(),
        expected.type_path()
    );
    Resolved::Value {
        value,
        info: concrete,
    }
}

/// Returns `true` if `value` is written as `null`.
///
/// Looks through `Some` layers and pointers the same way [`resolve`] does,
/// so `Some(None)` counts as null.
pub fn is_null(value: &dyn Shape) -> bool {
    let mut value = value;
    loop {
        match value.shape_ref() {
            ShapeRef::Option(None) | ShapeRef::Scalar(ScalarRef::Null) => return true,
            ShapeRef::Option(Some(inner)) => value = inner,
            _ => return false,
        }
    }
}

/// Checks that `value` can be written where `expected` is declared.
///
/// Accepted are values of exactly the expected type, any value when the
/// expected type is dynamic, and values assignable to `T` when `Option<T>`
/// is expected.
pub fn verify_assignable(expected: &'static ShapeInfo, value: &dyn Shape) -> Result<(), SerializeError> {
    if expected.is_dynamic() || value.descriptor() == expected.descriptor() {
        return Ok(());
    }
    match expected {
        ShapeInfo::Option(info) => verify_assignable(info.inner_info(), value).map_err(|_| {
            SerializeError::TypeMismatch {
                expected: expected.type_path(),
                found: value.descriptor().path(),
            }
        }),
        _ => Err(SerializeError::TypeMismatch {
            expected: expected.type_path(),
            found: value.descriptor().path(),
        }),
    }
}
