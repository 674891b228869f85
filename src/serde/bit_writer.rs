/// Destination for individual bits, written in order.
pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);
    fn write_byte(&mut self, byte: u8);
}

/// A growable bit-level writer.
///
/// Bits accumulate in a scratch byte and are flushed once full; the first
/// bit written lands in the low bit of each output byte, so a matching
/// reader consumes bytes low-bit-first.
pub struct BitWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    bits_written: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::new(),
            bits_written: 0,
        }
    }

    fn flush_scratch(&mut self) {
        if self.scratch_index > 0 {
            let byte = (self.scratch << (8 - self.scratch_index)).reverse_bits();
            self.buffer.push(byte);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    pub fn bits_written(&self) -> u32 {
        self.bits_written
    }

    /// Finish writing, padding the final partial byte with zero bits.
    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush_scratch();
        self.buffer
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        self.scratch <<= 1;

        if bit {
            self.scratch |= 1;
        }

        self.scratch_index += 1;
        self.bits_written += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch.reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let mut temp = byte;
        for _ in 0..8 {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte() {
        let mut writer = BitWriter::new();
        writer.write_byte(0b1010_1010);

        let bytes = writer.to_bytes();
        assert_eq!(bytes.len(), 1);
        assert_eq!(bytes[0], 0b1010_1010);
    }

    #[test]
    fn partial_byte_is_zero_padded() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bit(false);
        writer.write_bit(true);
        assert_eq!(writer.bits_written(), 3);

        let bytes = writer.to_bytes();
        assert_eq!(bytes.len(), 1);
        // first bit in the low bit of the byte
        assert_eq!(bytes[0], 0b0000_0101);
    }

    #[test]
    fn grows_past_a_single_byte() {
        let mut writer = BitWriter::new();
        for _ in 0..1000 {
            writer.write_byte(0xFF);
        }
        assert_eq!(writer.bits_written(), 8000);
        assert_eq!(writer.to_bytes().len(), 1000);
    }
}
