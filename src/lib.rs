#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_json as json;
pub use vc_shape as shape;
pub use vc_utils as utils;
