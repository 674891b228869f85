use crate::serde::{BitReader, BitWrite, Serde, SerdeErr};

/// An unsigned integer encoded in chunks of `BITS` bits, each chunk
/// preceded by a continue bit. Small values cost `BITS + 1` bits on the
/// wire regardless of the host-side width.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct UnsignedVariableInteger<const BITS: u8> {
    value: u64,
}

impl<const BITS: u8> UnsignedVariableInteger<BITS> {
    pub fn new<T: Into<u64>>(value: T) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }
}

impl<const BITS: u8> Serde for UnsignedVariableInteger<BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value = self.value;
        loop {
            let proceed = value >= 1 << BITS;
            writer.write_bit(proceed);
            for _ in 0..BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let proceed = reader.read_bit()?;
            for _ in 0..BITS {
                if reader.read_bit()? {
                    value |= match 1u64.checked_shl(shift) {
                        Some(bit) => bit,
                        None => return Err(SerdeErr),
                    };
                }
                shift += 1;
            }
            if !proceed {
                return Ok(Self { value });
            }
        }
    }
}
