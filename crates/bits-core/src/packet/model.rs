use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// One decoded packet: a literal value or an operator over nested packets.
///
/// # Examples
/// ```
/// use bits_core::{Literal, Packet};
///
/// let packet = Packet::Literal(Literal {
///     version: 6,
///     value: 2021u32.into(),
/// });
/// assert_eq!(packet.version(), 6);
/// assert!(packet.children().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Packet {
    Literal(Literal),
    Operator(Operator),
}

impl Packet {
    pub fn version(&self) -> u8 {
        match self {
            Packet::Literal(literal) => literal.version,
            Packet::Operator(operator) => operator.version,
        }
    }

    pub fn type_id(&self) -> u8 {
        match self {
            Packet::Literal(_) => super::layout::LITERAL_TYPE_ID,
            Packet::Operator(operator) => operator.type_id,
        }
    }

    /// Nested packets; always empty for literals.
    pub fn children(&self) -> &[Packet] {
        match self {
            Packet::Literal(_) => &[],
            Packet::Operator(operator) => &operator.children,
        }
    }
}

/// Literal packet (type 4) carrying an unsigned integer of any width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub version: u8,
    /// Serialized as a decimal string so wide values survive JSON.
    #[serde(with = "decimal")]
    pub value: BigUint,
}

/// Operator packet wrapping sub-packets in stream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub version: u8,
    pub type_id: u8,
    pub length_mode: LengthMode,
    pub children: Vec<Packet>,
}

/// How an operator bounds its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMode {
    /// A 15-bit field gives the exact width of the children in bits.
    TotalBits,
    /// An 11-bit field gives the number of direct children.
    SubpacketCount,
}

mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
