//! Interfaces the mapper expects from wire-format adapters.
//!
//! Adapters own everything byte-level (lexing, escaping, I/O); the mapper
//! only ever sees the [`GenericNode`] they produce or consume.

use crate::descriptor::Wrapping;
use crate::error::{DecodeError, EncodeError};
use crate::node::GenericNode;

/// Turns wire bytes into a generic tree.
pub trait Decoder {
    type Error: From<DecodeError>;

    /// Sequence layout this format produces, if it has a single one.
    fn sequence_layout(&self) -> Option<Wrapping> {
        None
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<GenericNode, Self::Error>;
}

/// Turns a generic tree into wire bytes.
pub trait Encoder {
    type Error: From<EncodeError>;

    /// Sequence layout this format expects, if it has a single one.
    fn sequence_layout(&self) -> Option<Wrapping> {
        None
    }

    fn encode_node(&self, node: &GenericNode) -> Result<Vec<u8>, Self::Error>;
}
