//! Row structs and their conversions into core types.

pub mod photo;
