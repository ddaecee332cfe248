//! `Typed` and `Shape` for std types.

mod list;
mod map;
mod scalar;
mod wrapper;
