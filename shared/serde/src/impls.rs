use crate::{
    bit_reader::BitReader,
    bit_writer::BitWrite,
    error::SerdeErr,
    integer::{SignedVariableInteger, UnsignedVariableInteger},
    serde::Serde,
    MAX_COLLECTION_LENGTH,
};

// Integers travel as 7-bit groups so small values stay small on the wire.

macro_rules! impl_serde_unsigned {
    ($($t:ty),*) => {$(
        impl Serde for $t {
            fn ser(&self, writer: &mut dyn BitWrite) {
                UnsignedVariableInteger::<7>::new(*self).ser(writer);
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                UnsignedVariableInteger::<7>::de(reader)?.try_to::<$t>()
            }
        }
    )*};
}

macro_rules! impl_serde_signed {
    ($($t:ty),*) => {$(
        impl Serde for $t {
            fn ser(&self, writer: &mut dyn BitWrite) {
                SignedVariableInteger::<7>::new(*self).ser(writer);
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                SignedVariableInteger::<7>::de(reader)?.try_to::<$t>()
            }
        }
    )*};
}

impl_serde_unsigned!(u16, u32, u64);
impl_serde_signed!(i16, i32, i64);

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }
}

impl Serde for i8 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(self.to_le_bytes()[0]);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(i8::from_le_bytes([reader.read_byte()?]))
    }
}

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for byte in self.to_le_bytes() {
            writer.write_byte(byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut bytes = [0u8; 4];
        for byte in bytes.iter_mut() {
            *byte = reader.read_byte()?;
        }
        Ok(f32::from_le_bytes(bytes))
    }
}

impl Serde for f64 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for byte in self.to_le_bytes() {
            writer.write_byte(byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut bytes = [0u8; 8];
        for byte in bytes.iter_mut() {
            *byte = reader.read_byte()?;
        }
        Ok(f64::from_le_bytes(bytes))
    }
}

fn write_length(length: usize, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<7>::new(length as u64).ser(writer);
}

fn read_length(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let length: usize = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
    if length > MAX_COLLECTION_LENGTH {
        return Err(SerdeErr::LengthLimitExceeded {
            length,
            limit: MAX_COLLECTION_LENGTH,
        });
    }
    Ok(length)
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(self.len(), writer);
        for byte in self.as_bytes() {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = read_length(reader)?;
        let mut bytes = Vec::with_capacity(length.min(reader.bytes_remaining()));
        for _ in 0..length {
            bytes.push(reader.read_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8)
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(self.len(), writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = read_length(reader)?;
        let mut output = Vec::with_capacity(length.min(reader.bytes_remaining()));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                writer.write_bit(true);
                value.ser(writer);
            }
            None => writer.write_bit(false),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}
