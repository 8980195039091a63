use num_bigint::BigUint;

use super::Bits;
use super::error::StreamError;

/// Consuming cursor over an immutable bit slice.
///
/// Reads only ever advance. Sub-readers created with [`BitReader::split`]
/// borrow the same buffer and keep absolute offsets, so positions reported
/// from nested reads still point into the original transmission.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a Bits,
    pos: usize,
    base: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a Bits) -> Self {
        Self {
            bits,
            pos: 0,
            base: 0,
        }
    }

    /// Bits left to read.
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Absolute bit offset of the cursor within the original buffer.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Unread bits, without consuming them.
    pub fn rest(&self) -> &'a Bits {
        let bits: &'a Bits = self.bits;
        &bits[self.pos..]
    }

    pub fn take(&mut self, n: usize) -> Result<&'a Bits, StreamError> {
        if n > self.remaining() {
            return Err(StreamError::Underflow {
                needed: n,
                available: self.remaining(),
                offset: self.offset(),
            });
        }
        Ok(self.advance(n))
    }

    /// Take up to `n` bits; the result is short when the stream runs out.
    pub fn take_available(&mut self, n: usize) -> &'a Bits {
        let n = n.min(self.remaining());
        self.advance(n)
    }

    /// Carve out the next `n` bits as a bounded reader.
    ///
    /// The parent cursor moves past all `n` bits immediately, whatever the
    /// child later reads.
    pub fn split(&mut self, n: usize) -> Result<BitReader<'a>, StreamError> {
        let base = self.offset();
        let bits = self.take(n)?;
        Ok(Self { bits, pos: 0, base })
    }

    pub fn split_available(&mut self, n: usize) -> BitReader<'a> {
        let base = self.offset();
        let bits = self.take_available(n);
        Self { bits, pos: 0, base }
    }

    pub fn read_u64(&mut self, n: usize) -> Result<u64, StreamError> {
        self.take(n).map(to_u64)
    }

    /// Consume and return everything left.
    pub fn drain(&mut self) -> &'a Bits {
        self.advance(self.remaining())
    }

    fn advance(&mut self, n: usize) -> &'a Bits {
        let bits: &'a Bits = self.bits;
        let out = &bits[self.pos..self.pos + n];
        self.pos += n;
        out
    }
}

/// Big-endian unsigned value of `bits`. Only meaningful up to 64 bits; wider
/// slices keep their low 64 bits.
pub fn to_u64(bits: &Bits) -> u64 {
    bits.iter()
        .by_vals()
        .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit))
}

/// Big-endian unsigned value of `bits`, any width. An empty slice is zero.
pub fn to_biguint(bits: &Bits) -> BigUint {
    let digits: Vec<u8> = bits.iter().by_vals().map(u8::from).collect();
    BigUint::from_radix_be(&digits, 2).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use bitvec::prelude::*;
    use num_bigint::BigUint;

    use super::{BitReader, to_biguint, to_u64};
    use crate::stream::error::StreamError;

    #[test]
    fn take_advances_cursor() {
        let bits = bits![u8, Msb0; 1, 1, 0, 1, 0, 0, 1];
        let mut reader = BitReader::new(bits);
        assert_eq!(to_u64(reader.take(3).unwrap()), 6);
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.offset(), 3);
        assert_eq!(reader.read_u64(4).unwrap(), 9);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn take_past_end_is_underflow() {
        let bits = bits![u8, Msb0; 1, 0, 1];
        let mut reader = BitReader::new(bits);
        reader.take(1).unwrap();
        let err = reader.take(5).unwrap_err();
        assert_eq!(
            err,
            StreamError::Underflow {
                needed: 5,
                available: 2,
                offset: 1,
            }
        );
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn take_available_returns_short_slice() {
        let bits = bits![u8, Msb0; 1, 0, 1];
        let mut reader = BitReader::new(bits);
        let got = reader.take_available(8);
        assert_eq!(got.len(), 3);
        assert_eq!(to_u64(got), 5);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn split_moves_parent_past_whole_width() {
        let bits = bits![u8, Msb0; 0, 1, 1, 1, 0, 0, 1, 0];
        let mut parent = BitReader::new(bits);
        parent.take(1).unwrap();
        let mut child = parent.split(4).unwrap();
        assert_eq!(parent.offset(), 5);
        assert_eq!(parent.remaining(), 3);
        assert_eq!(child.offset(), 1);
        assert_eq!(child.remaining(), 4);
        child.take(2).unwrap();
        assert_eq!(child.offset(), 3);
        assert_eq!(parent.offset(), 5);
    }

    #[test]
    fn drain_consumes_everything() {
        let bits = bits![u8, Msb0; 0, 0, 0, 1];
        let mut reader = BitReader::new(bits);
        reader.take(1).unwrap();
        assert_eq!(reader.rest().len(), 3);
        assert_eq!(reader.drain().len(), 3);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn biguint_exceeds_u64() {
        let mut bits = bitvec![u8, Msb0; 1];
        bits.extend_from_bitslice(bits![u8, Msb0; 0; 80]);
        let expected = BigUint::from(1u8) << 80usize;
        assert_eq!(to_biguint(&bits), expected);
    }

    #[test]
    fn empty_slice_is_zero() {
        let bits = BitVec::<u8, Msb0>::new();
        assert_eq!(to_u64(&bits), 0);
        assert_eq!(to_biguint(&bits), BigUint::default());
    }
}
