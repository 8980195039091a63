use bitvec::prelude::*;

use super::{BitBuf, NIBBLE_BITS};

/// Character that could not be read as a hex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedDigit {
    /// Character index in the input string.
    pub index: usize,
    pub digit: char,
}

/// Bits expanded from a hex string, with the digits that were zero-filled.
#[derive(Debug, Clone, Default)]
pub struct HexBits {
    pub bits: BitBuf,
    pub malformed: Vec<MalformedDigit>,
}

/// Expand a hex string into its bits, most significant bit of each digit first.
///
/// Digits are case-insensitive. Any other character expands to `0000` and is
/// listed in [`HexBits::malformed`]; callers decide whether that is fatal.
/// The result always holds exactly four bits per input character.
pub fn parse_hex(input: &str) -> HexBits {
    let mut bits = BitBuf::with_capacity(input.len() * NIBBLE_BITS);
    let mut malformed = Vec::new();

    for (index, digit) in input.chars().enumerate() {
        let nibble = match digit.to_digit(16) {
            Some(value) => value as u8,
            None => {
                malformed.push(MalformedDigit { index, digit });
                0
            }
        };
        bits.extend_from_bitslice(&nibble.view_bits::<Msb0>()[8 - NIBBLE_BITS..]);
    }

    HexBits { bits, malformed }
}
