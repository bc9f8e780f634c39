use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr};

/// A type that can be written to and read back from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the stream
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Reads a value from the stream
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;
}
