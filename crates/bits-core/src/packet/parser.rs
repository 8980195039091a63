use log::{debug, trace, warn};

use super::anomaly::Anomaly;
use super::error::DecodeError;
use super::layout;
use super::model::{LengthMode, Literal, Operator, Packet};
use super::options::{DecodeOptions, DecodePolicy};
use crate::stream::{BitBuf, BitReader, Bits, StreamError, parse_hex, to_biguint, to_u64};

/// Full result of decoding one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Top-level packets in stream order.
    pub packets: Vec<Packet>,
    /// Width of the expanded transmission.
    pub bits_total: usize,
    /// Trailing bits discarded after the last top-level packet.
    pub padding_bits: usize,
    /// Corrections applied under [`DecodePolicy::Lenient`].
    pub anomalies: Vec<Anomaly>,
}

/// Decode a hex transmission with the default lenient options.
///
/// # Examples
/// ```
/// use bits_core::{decode_transmission, sum_versions};
///
/// let packets = decode_transmission("8A004A801A8002F478")?;
/// assert_eq!(sum_versions(&packets), 16);
/// # Ok::<(), bits_core::DecodeError>(())
/// ```
pub fn decode_transmission(hex: &str) -> Result<Vec<Packet>, DecodeError> {
    decode_transmission_with(hex, &DecodeOptions::default()).map(|decoded| decoded.packets)
}

pub fn decode_transmission_with(hex: &str, options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    Decoder::new(*options).decode(hex)
}

/// Recursive-descent packet decoder.
///
/// Decoding walks `ReadHeader -> ReadLiteralBody | ReadOperatorLengthField ->
/// ReadOperatorChildrenByWidth | ReadOperatorChildrenByCount`, ending in a
/// packet or in end-of-stream (`Ok(None)`). Every transition is driven by
/// consumed bits only.
#[derive(Debug, Default)]
pub struct Decoder {
    options: DecodeOptions,
    anomalies: Vec<Anomaly>,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options: options.clamped(),
            anomalies: Vec::new(),
        }
    }

    /// Anomalies recorded so far.
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn decode(mut self, hex: &str) -> Result<Decoded, DecodeError> {
        let parsed = parse_hex(hex);
        for bad in &parsed.malformed {
            if self.options.is_strict() {
                return Err(StreamError::MalformedHexDigit {
                    index: bad.index,
                    digit: bad.digit,
                }
                .into());
            }
            warn!(
                "malformed hex digit {:?} at index {}, reading as 0",
                bad.digit, bad.index
            );
            self.anomalies.push(Anomaly::MalformedHexDigit {
                index: bad.index,
                digit: bad.digit,
            });
        }

        let bits_total = parsed.bits.len();
        let mut reader = BitReader::new(&parsed.bits);
        let mut packets = Vec::new();
        let padding_bits = loop {
            if reader.remaining() < layout::HEADER_BITS || reader.rest().not_any() {
                break reader.drain().len();
            }
            match self.read_packet(&mut reader, 0)? {
                Some(packet) => {
                    debug!(
                        "decoded top-level packet v{} type {} ending at bit {}",
                        packet.version(),
                        packet.type_id(),
                        reader.offset()
                    );
                    packets.push(packet);
                }
                None => break 0,
            }
        };

        Ok(Decoded {
            packets,
            bits_total,
            padding_bits,
            anomalies: self.anomalies,
        })
    }

    /// Read one packet, or `None` when fewer than a header's worth of bits
    /// remain. Those leftover bits are consumed.
    pub fn read_packet(
        &mut self,
        reader: &mut BitReader<'_>,
        depth: usize,
    ) -> Result<Option<Packet>, DecodeError> {
        if reader.remaining() < layout::HEADER_BITS {
            reader.drain();
            return Ok(None);
        }

        let start = reader.offset();
        if depth > self.options.max_depth {
            return Err(DecodeError::RecursionLimitExceeded {
                limit: self.options.max_depth,
                offset: start,
            });
        }

        let version = reader.read_u64(layout::VERSION_BITS)? as u8;
        let type_id = reader.read_u64(layout::TYPE_ID_BITS)? as u8;
        trace!("packet header at bit {start}: v{version} type {type_id} depth {depth}");

        let packet = if type_id == layout::LITERAL_TYPE_ID {
            Packet::Literal(self.read_literal(reader, version)?)
        } else {
            Packet::Operator(self.read_operator(reader, version, type_id, depth, start)?)
        };
        Ok(Some(packet))
    }

    fn read_literal(
        &mut self,
        reader: &mut BitReader<'_>,
        version: u8,
    ) -> Result<Literal, DecodeError> {
        let mut value_bits = BitBuf::new();
        loop {
            let flag = self.take(reader, layout::GROUP_FLAG_BITS)?;
            if flag.is_empty() {
                break;
            }
            let nibble = self.take(reader, layout::GROUP_NIBBLE_BITS)?;
            value_bits.extend_from_bitslice(nibble);
            if !flag[0] {
                break;
            }
        }

        Ok(Literal {
            version,
            value: to_biguint(&value_bits),
        })
    }

    fn read_operator(
        &mut self,
        reader: &mut BitReader<'_>,
        version: u8,
        type_id: u8,
        depth: usize,
        start: usize,
    ) -> Result<Operator, DecodeError> {
        let mode = to_u64(self.take(reader, layout::LENGTH_MODE_BITS)?);
        let (length_mode, children) = if mode == layout::LENGTH_MODE_TOTAL_BITS {
            let width = self.read_field(reader, layout::TOTAL_BITS_FIELD_BITS)?;
            let children = self.read_children_by_width(reader, width, depth)?;
            (LengthMode::TotalBits, children)
        } else {
            let count = self.read_field(reader, layout::SUBPACKET_COUNT_FIELD_BITS)?;
            let children = self.read_children_by_count(reader, count, depth, start)?;
            (LengthMode::SubpacketCount, children)
        };

        Ok(Operator {
            version,
            type_id,
            length_mode,
            children,
        })
    }

    fn read_children_by_width(
        &mut self,
        reader: &mut BitReader<'_>,
        width: usize,
        depth: usize,
    ) -> Result<Vec<Packet>, DecodeError> {
        let mut body = match self.options.policy {
            DecodePolicy::Strict => reader.split(width)?,
            DecodePolicy::Lenient => {
                self.note_truncation(reader, width);
                reader.split_available(width)
            }
        };

        let mut children = Vec::new();
        while let Some(child) = self.read_packet(&mut body, depth + 1)? {
            children.push(child);
        }
        Ok(children)
    }

    fn read_children_by_count(
        &mut self,
        reader: &mut BitReader<'_>,
        count: usize,
        depth: usize,
        start: usize,
    ) -> Result<Vec<Packet>, DecodeError> {
        let mut children = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            match self.read_packet(reader, depth + 1)? {
                Some(child) => children.push(child),
                None => {
                    if self.options.is_strict() {
                        return Err(DecodeError::TruncatedOperator {
                            offset: start,
                            expected: count,
                            found: children.len(),
                        });
                    }
                    warn!(
                        "operator at bit {start} announced {count} sub-packets, found {}",
                        children.len()
                    );
                    self.anomalies.push(Anomaly::TruncatedOperator {
                        bit_offset: start,
                        expected: count,
                        found: children.len(),
                    });
                    break;
                }
            }
        }
        Ok(children)
    }

    fn read_field(&mut self, reader: &mut BitReader<'_>, n: usize) -> Result<usize, DecodeError> {
        Ok(to_u64(self.take(reader, n)?) as usize)
    }

    fn take<'a>(&mut self, reader: &mut BitReader<'a>, n: usize) -> Result<&'a Bits, DecodeError> {
        match self.options.policy {
            DecodePolicy::Strict => Ok(reader.take(n)?),
            DecodePolicy::Lenient => {
                self.note_truncation(reader, n);
                Ok(reader.take_available(n))
            }
        }
    }

    fn note_truncation(&mut self, reader: &BitReader<'_>, requested: usize) {
        let available = reader.remaining();
        if available >= requested {
            return;
        }
        let bit_offset = reader.offset();
        warn!("read of {requested} bits at bit {bit_offset} truncated to {available}");
        self.anomalies.push(Anomaly::TruncatedRead {
            bit_offset,
            requested,
            available,
        });
    }
}
