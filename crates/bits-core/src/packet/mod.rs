//! BITS packet decoding.
//!
//! Each packet starts with a 3-bit version and a 3-bit type id. Type 4 is a
//! literal whose value is spread over 5-bit groups (continuation flag plus a
//! nibble); every other type is an operator whose children are bounded
//! either by a 15-bit total width or by an 11-bit sub-packet count.
//!
//! The module follows the usual layering:
//! - `layout`: field widths and type ids (source of truth)
//! - `parser`: recursive-descent decoding over a `stream::BitReader`
//! - `aggregate`: folds over the decoded tree
//! - `error` / `anomaly`: strict failures and lenient corrections
//!
//! Version française (résumé):
//! Décodage récursif des paquets BITS (littéraux et opérateurs). Les largeurs
//! de champs sont dans `layout`; le mode tolérant consigne les anomalies au
//! lieu d'échouer, le mode strict échoue à la première.

pub mod aggregate;
pub mod anomaly;
pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod parser;

pub use aggregate::{count_literals, count_operators, count_packets, max_depth, sum_versions};
pub use anomaly::Anomaly;
pub use error::DecodeError;
pub use model::{LengthMode, Literal, Operator, Packet};
pub use options::{DEFAULT_MAX_DEPTH, DecodeOptions, DecodePolicy, MAX_DEPTH_CEILING};
pub use parser::{Decoded, Decoder, decode_transmission, decode_transmission_with};
