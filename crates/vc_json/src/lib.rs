#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

use std::io;

use vc_shape::Shape;

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod driver;
mod error;
mod naming;
mod options;
mod plan;
mod sink;
mod stack;
mod writer;

pub mod resolver;

// -----------------------------------------------------------------------------
// Top-level exports

pub use cache::PlanCache;
pub use driver::{JsonSerializer, Progress, WriteSession};
pub use error::{SerializeError, SinkError};
pub use naming::NamingPolicy;
pub use options::{EscapePolicy, FloatPolicy, Indentation, SerializerOptions};
pub use plan::{MemberPlan, PlanKind, WritePlan};
pub use sink::{ByteSink, IoSink, SinkStatus, SliceSink};
pub use stack::{Frame, FrameState, Segment, WriteStack};
pub use writer::{TokenWriter, WriterOptions};

// -----------------------------------------------------------------------------
// Entry points

/// Writes `value` as compact JSON bytes with default options.
///
/// # Examples
///
/// ```
/// let value = vec![Some(1_u8), None];
/// assert_eq!(vc_json::to_vec(&value).unwrap(), b"[1,null]");
/// ```
#[inline]
pub fn to_vec(value: &dyn Shape) -> Result<Vec<u8>, SerializeError> {
    JsonSerializer::default().to_vec(value)
}

/// Writes `value` as compact JSON text with default options.
#[inline]
pub fn to_string(value: &dyn Shape) -> Result<String, SerializeError> {
    JsonSerializer::default().to_string(value)
}

/// Writes `value` as JSON text indented by two spaces.
///
/// ```
/// use std::collections::BTreeMap;
///
/// let value = BTreeMap::from([("a", vec![1, 2])]);
/// assert_eq!(
///     vc_json::to_string_pretty(&value).unwrap(),
///     "{\n  \"a\": [\n    1,\n    2\n  ]\n}",
/// );
/// ```
#[inline]
pub fn to_string_pretty(value: &dyn Shape) -> Result<String, SerializeError> {
    JsonSerializer::new(SerializerOptions::pretty()).to_string(value)
}

/// Writes `value` into `writer` with default options and returns it.
#[inline]
pub fn to_writer<W: io::Write>(writer: W, value: &dyn Shape) -> Result<W, SerializeError> {
    JsonSerializer::default().to_writer(writer, value)
}

/// Writes `value` into `sink` with default options and returns the sink.
///
/// ```
/// use vc_json::SliceSink;
///
/// let mut buf = [0_u8; 16];
/// let sink = vc_json::to_sink(&vec![1_u8, 2], SliceSink::new(&mut buf)).unwrap();
/// assert_eq!(sink.written(), b"[1,2]");
/// ```
#[inline]
pub fn to_sink<S: ByteSink>(value: &dyn Shape, sink: S) -> Result<S, SerializeError> {
    JsonSerializer::default().to_sink(value, sink)
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use serde::Serialize;
    use vc_shape::{Shape, impl_shape_struct};

    use crate::{JsonSerializer, NamingPolicy, SerializerOptions};

    // Each fixture has a serde twin to compare output against `serde_json`.

    #[derive(Serialize)]
    struct Order {
        id: u64,
        customer: String,
        lines: Vec<Line>,
        discount: Option<f64>,
        attributes: BTreeMap<String, String>,
        shipped: bool,
    }

    #[derive(Serialize)]
    struct Line {
        sku: String,
        quantity: u32,
        price: f64,
        notes: Vec<String>,
    }

    impl_shape_struct!(Order {
        id: u64,
        customer: String,
        lines: Vec<Line>,
        discount: Option<f64>,
        attributes: BTreeMap<String, String>,
        shipped: bool,
    });

    impl_shape_struct!(Line {
        sku: String,
        quantity: u32,
        price: f64,
        notes: Vec<String>,
    });

    fn order() -> Order {
        Order {
            id: 9_007_199_254_740_993,
            customer: "Zoë \"Z\" Smith\n\tVIP".into(),
            lines: vec![
                Line {
                    sku: "A-1".into(),
                    quantity: 3,
                    price: 19.99,
                    notes: vec![],
                },
                Line {
                    sku: "B/2".into(),
                    quantity: 0,
                    price: -1e-7,
                    notes: vec!["gift".into(), "fragile \\ handle".into()],
                },
            ],
            discount: None,
            attributes: BTreeMap::from([
                ("channel".into(), "web".into()),
                ("region".into(), "eu-west".into()),
            ]),
            shipped: false,
        }
    }

    #[test]
    fn compact_matches_serde_json() {
        let value = order();
        assert_eq!(
            crate::to_string(&value).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }

    #[test]
    fn pretty_matches_serde_json() {
        let value = order();
        assert_eq!(
            crate::to_string_pretty(&value).unwrap(),
            serde_json::to_string_pretty(&value).unwrap()
        );
        assert_eq!(crate::to_string_pretty(&Vec::<u8>::new()).unwrap(), "[]");
    }

    #[test]
    fn output_parses_back() {
        let value = order();
        let parsed: serde_json::Value = serde_json::from_slice(&crate::to_vec(&value).unwrap()).unwrap();

        assert_eq!(parsed["id"], 9_007_199_254_740_993_u64);
        assert_eq!(parsed["customer"], value.customer.as_str());
        assert_eq!(parsed["lines"][1]["notes"][1], "fragile \\ handle");
        assert_eq!(parsed["lines"][0]["price"], 19.99);
        assert!(parsed["discount"].is_null());
        assert_eq!(parsed["attributes"]["region"], "eu-west");
    }

    #[test]
    fn naming_policy_applies_to_members_only() {
        struct Config {
            max_retries: u8,
            env_vars: BTreeMap<String, String>,
        }

        impl_shape_struct!(Config {
            max_retries: u8,
            env_vars: BTreeMap<String, String>,
        });

        let value = Config {
            max_retries: 2,
            env_vars: BTreeMap::from([("HOME_DIR".into(), "/root".into())]),
        };
        let serializer = JsonSerializer::new(
            SerializerOptions::default().with_naming_policy(NamingPolicy::KebabCase),
        );
        assert_eq!(
            serializer.to_string(&value).unwrap(),
            r#"{"max-retries":2,"env-vars":{"HOME_DIR":"/root"}}"#
        );
    }

    #[test]
    fn dynamic_values_match_their_concrete_output() {
        let value = order();
        let any: Box<dyn Shape> = Box::new(order());
        assert_eq!(crate::to_vec(&any).unwrap(), crate::to_vec(&value).unwrap());
    }

    #[test]
    fn writer_entry_point() {
        let out = crate::to_writer(Vec::new(), &order()).unwrap();
        assert_eq!(out, serde_json::to_vec(&order()).unwrap());
    }
}
