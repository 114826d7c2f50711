//! Columbus Model Format binary layout
//!
//! A CMF file is a fixed header followed by self-describing attribute
//! sub-blocks. All integers are little-endian.
//!
//! All headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

pub mod cmf;
mod serialization;
pub mod types;

pub use cmf::*;
pub use serialization::BinarySerializable;
pub use types::*;
