use crate::serde::{BitWrite, BitWriter, SerdeErr};

/// A bounded bit-level reader over a borrowed byte buffer.
///
/// Mirrors [`BitWriter`](crate::serde::BitWriter)'s layout: bytes are
/// consumed low-bit-first. Every read is checked against the bit bound and
/// fails with [`SerdeErr`] rather than running off the end.
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_pos: u32,
    bit_length: u32,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        let bit_length = (buffer.len() as u32) * 8;
        Self {
            buffer,
            bit_pos: 0,
            bit_length,
        }
    }

    /// Reader over a buffer whose final byte is only partially meaningful,
    /// e.g. a stored replay buffer. A bit length larger than the buffer
    /// itself is clamped; the buffer stays the hard bound.
    pub fn with_bit_length(buffer: &'b [u8], bit_length: u32) -> Self {
        let bit_length = bit_length.min((buffer.len() as u32) * 8);
        Self {
            buffer,
            bit_pos: 0,
            bit_length,
        }
    }

    /// Current cursor position, in bits from the start of the buffer.
    pub fn bit_pos(&self) -> u32 {
        self.bit_pos
    }

    pub fn bits_remaining(&self) -> u32 {
        self.bit_length - self.bit_pos
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.bit_pos >= self.bit_length {
            return Err(SerdeErr);
        }
        let byte = self.buffer[(self.bit_pos / 8) as usize];
        let bit = (byte >> (self.bit_pos % 8)) & 1 != 0;
        self.bit_pos += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut byte = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    /// Copy the already-consumed range `[start_bit, end_bit)` out into an
    /// owned, zero-based buffer, for re-reading later.
    pub fn copy_bit_range(&self, start_bit: u32, end_bit: u32) -> (Vec<u8>, u32) {
        debug_assert!(start_bit <= end_bit && end_bit <= self.bit_length);
        let mut writer = BitWriter::new();
        for pos in start_bit..end_bit {
            let byte = self.buffer[(pos / 8) as usize];
            writer.write_bit((byte >> (pos % 8)) & 1 != 0);
        }
        (writer.to_bytes(), end_bit - start_bit)
    }
}
