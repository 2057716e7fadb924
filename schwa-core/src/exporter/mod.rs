//! Serialized output of parse and diff results.

pub mod json;
