pub const VERSION_BITS: usize = 3;
pub const TYPE_ID_BITS: usize = 3;
pub const HEADER_BITS: usize = VERSION_BITS + TYPE_ID_BITS;

pub const LITERAL_TYPE_ID: u8 = 4;
pub const GROUP_FLAG_BITS: usize = 1;
pub const GROUP_NIBBLE_BITS: usize = 4;

pub const LENGTH_MODE_BITS: usize = 1;
pub const TOTAL_BITS_FIELD_BITS: usize = 15;
pub const SUBPACKET_COUNT_FIELD_BITS: usize = 11;

pub const LENGTH_MODE_TOTAL_BITS: u64 = 0;
