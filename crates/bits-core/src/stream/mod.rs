//! Bit-level access to hex-encoded transmissions.
//!
//! `hex` expands the textual transmission into an owned bit buffer once;
//! `reader` walks that buffer with a forward-only cursor. Nothing here knows
//! about packets: fixed-width reads, bounded sub-readers and integer
//! conversion are the whole surface.
//!
//! Bits are stored `Msb0` in `u8` words so that a slice reads left to right
//! in transmission order.

use bitvec::prelude::{BitSlice, BitVec, Msb0};

pub mod error;
pub mod hex;
pub mod reader;

pub use error::StreamError;
pub use hex::{HexBits, MalformedDigit, parse_hex};
pub use reader::{BitReader, to_biguint, to_u64};

/// Borrowed view of transmission bits.
pub type Bits = BitSlice<u8, Msb0>;
/// Owned transmission bits.
pub type BitBuf = BitVec<u8, Msb0>;

/// Bits contributed by one hex digit.
pub const NIBBLE_BITS: usize = 4;
