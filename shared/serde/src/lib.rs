//! # Cohort Serde
//! Bit-level serialization shared by every cohort crate. Packets and
//! invocation envelopes are written with a [`BitWriter`] and read back with a
//! [`BitReader`]; anything implementing [`Serde`] can ride along.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::{
    SerdeInteger, SignedInteger, SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};
pub use serde::Serde;

/// Upper bound on any length prefix read off the wire. Protects the reader
/// against allocating for a corrupt or hostile length.
pub const MAX_COLLECTION_LENGTH: usize = 1 << 20;

/// Upper bound on how deeply recursive values may nest on the wire
pub const MAX_NESTING_DEPTH: usize = 16;
