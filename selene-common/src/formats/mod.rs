//! SELENE Device binary model and animation formats
//!
//! Every file starts with an ASCII magic tag followed by fixed-width
//! little-endian counts. There is no padding anywhere; strings are stored as
//! a `u16` byte count followed by that many ASCII bytes.
//!
//! All format headers implement the [`BinarySerializable`] trait for
//! consistent serialization/deserialization.

pub mod bone;
mod io;
pub mod material;
pub mod sdaf;
pub mod sdmf;
mod serialization;
pub mod sle;

pub use bone::*;
pub use io::{write_f32s, write_string, ByteReader};
pub use material::*;
pub use sdaf::*;
pub use sdmf::*;
pub use serialization::BinarySerializable;
pub use sle::*;
