#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use jd_codegen as codegen;
pub use jd_json as json;

pub use jd_json::derive::JsonData;
