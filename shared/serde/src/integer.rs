use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

// Decoded values must stay representable as a positive i128.
const MAX_DECODED_BITS: usize = 127;

// This outer generic type wraps an inner type that is not generic, to reduce code bloat through monomorphization.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    inner: SerdeIntegerInner,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct SerdeIntegerInner {
    inner_value: i128,
    signed: bool,
    variable: bool,
    bits: u8,
}

impl SerdeIntegerInner {
    fn new(signed: bool, variable: bool, bits: u8, value: i128) -> Self {
        if bits == 0 {
            panic!("can't create an integer with 0 bits...");
        }
        if bits > 127 {
            panic!("can't create an integer with more than 127 bits...");
        }

        if !signed && value < 0 {
            panic!("can't encode a negative number with an Unsigned Integer!");
        }

        if !variable {
            let max_value: i128 = 2_i128.pow(bits as u32);
            if value >= max_value {
                panic!(
                    "with {} bits, can't encode number greater than {}",
                    bits, max_value
                );
            }
            if signed && value < 0 {
                let min_value: i128 = -(2_i128.pow(bits as u32));
                if value <= min_value {
                    panic!(
                        "with {} bits, can't encode number less than {}",
                        bits, min_value
                    );
                }
            }
        }

        Self {
            inner_value: value,
            signed,
            variable,
            bits,
        }
    }

    fn new_unchecked(signed: bool, variable: bool, bits: u8, value: i128) -> Self {
        Self {
            inner_value: value,
            signed,
            variable,
            bits,
        }
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value: u128;
        let negative = self.inner_value < 0;

        if self.signed {
            writer.write_bit(negative);
            value = self.inner_value.unsigned_abs();
        } else {
            value = self.inner_value as u128;
        }

        if self.variable {
            loop {
                let proceed = value >= 2_u128.pow(self.bits as u32);
                writer.write_bit(proceed);
                for _ in 0..self.bits {
                    writer.write_bit(value & 1 != 0);
                    value >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..self.bits {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
        }
    }

    fn de(
        reader: &mut BitReader,
        signed: bool,
        variable: bool,
        bits: u8,
    ) -> Result<Self, SerdeErr> {
        let mut negative = false;
        if signed {
            negative = reader.read_bit()?;
        }

        let mut total_bits: usize = 0;
        let mut output: u128 = 0;

        loop {
            let proceed = if variable { reader.read_bit()? } else { false };

            for _ in 0..bits {
                let bit = reader.read_bit()?;
                if total_bits >= MAX_DECODED_BITS {
                    if bit {
                        return Err(SerdeErr::IntegerTooLong);
                    }
                } else if bit {
                    output |= 1 << total_bits;
                }
                total_bits += 1;
            }

            if !proceed {
                break;
            }
            if total_bits >= MAX_DECODED_BITS + usize::from(bits) {
                return Err(SerdeErr::IntegerTooLong);
            }
        }

        let value = output as i128;
        let value = if negative { -value } else { value };
        Ok(Self::new_unchecked(signed, variable, bits, value))
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    pub fn new<T: Into<i128>>(value: T) -> Self {
        Self {
            inner: SerdeIntegerInner::new(SIGNED, VARIABLE, BITS, value.into()),
        }
    }

    pub fn get(&self) -> i128 {
        self.inner.inner_value
    }

    /// Narrows the decoded value, failing instead of panicking when the wire
    /// carried something out of range for `T`.
    pub fn try_to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.inner.inner_value).map_err(|_| SerdeErr::IntegerOutOfRange {
            value: self.inner.inner_value,
            target: std::any::type_name::<T>(),
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = SerdeIntegerInner::de(reader, SIGNED, VARIABLE, BITS)?;
        Ok(Self { inner })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, T: Into<i128>> From<T>
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
