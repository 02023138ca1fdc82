//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// Options for [`decode_with`](crate::decode_with).
///
/// Deserializable with every field optional, so a host can embed it in its
/// own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Generate an identifier when the identity field decodes empty.
    pub assign_identity: bool,
    /// Reject list fields whose wire value is neither a list nor null,
    /// instead of decoding them as empty lists.
    pub strict_lists: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            assign_identity: true,
            strict_lists: false,
        }
    }
}
