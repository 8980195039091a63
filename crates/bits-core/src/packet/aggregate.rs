use super::model::Packet;

/// Sum of every packet's version across the whole tree, nested packets
/// included.
///
/// # Examples
/// ```
/// use bits_core::{decode_transmission, sum_versions};
///
/// let packets = decode_transmission("620080001611562C8802118E34")?;
/// assert_eq!(sum_versions(&packets), 12);
/// # Ok::<(), bits_core::DecodeError>(())
/// ```
pub fn sum_versions(packets: &[Packet]) -> u64 {
    packets
        .iter()
        .map(|packet| u64::from(packet.version()) + sum_versions(packet.children()))
        .sum()
}

/// Number of packets in the tree, nested packets included.
pub fn count_packets(packets: &[Packet]) -> u64 {
    packets
        .iter()
        .map(|packet| 1 + count_packets(packet.children()))
        .sum()
}

pub fn count_literals(packets: &[Packet]) -> u64 {
    packets
        .iter()
        .map(|packet| match packet {
            Packet::Literal(_) => 1,
            Packet::Operator(operator) => count_literals(&operator.children),
        })
        .sum()
}

pub fn count_operators(packets: &[Packet]) -> u64 {
    count_packets(packets) - count_literals(packets)
}

/// Deepest nesting level; a lone literal has depth 1, no packets depth 0.
pub fn max_depth(packets: &[Packet]) -> usize {
    packets
        .iter()
        .map(|packet| 1 + max_depth(packet.children()))
        .max()
        .unwrap_or(0)
}
