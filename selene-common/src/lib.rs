//! Shared on-disk formats for the SELENE Device engine
//!
//! Contains the header, record and string encodings for the static model
//! (`.sle`), skinned model (`.sdmf`) and animation (`.sdaf`) files, plus
//! decoders used by tooling and tests.

mod error;
pub mod formats;

pub use error::FormatError;
pub use formats::*;
