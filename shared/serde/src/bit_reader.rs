use crate::{error::SerdeErr, MAX_NESTING_DEPTH};

/// Reads bits back out of a buffer produced by a `BitWriter`
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_index: usize,
    depth: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            bit_index: 0,
            depth: 0,
        }
    }

    /// Runs `read` one nesting level deeper. Recursive types read their
    /// children through this so that input nested past MAX_NESTING_DEPTH is
    /// an error instead of unbounded recursion.
    pub fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, SerdeErr>,
    ) -> Result<T, SerdeErr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SerdeErr::NestingLimitExceeded {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        let byte_index = self.bit_index / 8;
        let Some(byte) = self.buffer.get(byte_index) else {
            return Err(SerdeErr::UnexpectedEnd {
                bits_read: self.bit_index,
            });
        };
        let bit = (byte >> (self.bit_index % 8)) & 1 != 0;
        self.bit_index += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output: u8 = 0;
        for offset in 0..8 {
            if self.read_bit()? {
                output |= 1 << offset;
            }
        }
        Ok(output)
    }

    /// Number of whole bytes not yet touched by the reader
    pub fn bytes_remaining(&self) -> usize {
        let consumed = (self.bit_index + 7) / 8;
        self.buffer.len().saturating_sub(consumed)
    }
}
