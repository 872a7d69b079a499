//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
///
/// Encoding errors surface synchronously to the *sender* and are
/// fail-fast. Decoding errors happen on the *receiver* and are logged
/// and dropped further up the stack — a malformed payload must never
/// take down dispatch of unrelated messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed — the arguments are not representable in
    /// the chosen encoding shape.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed — malformed JSON, or a payload not shaped
    /// as the expected `[args, kwargs]` pair.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A peer id falls outside the range of integers an `f32` can carry
    /// exactly. Raised before any send attempt; ids are never silently
    /// truncated.
    #[error("peer id {0} is outside the float-safe wire range")]
    PeerIdOutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_the_id() {
        let err = ProtocolError::PeerIdOutOfRange(1 << 30);
        assert!(err.to_string().contains("1073741824"));
    }

    #[test]
    fn test_decode_wraps_serde_error() {
        let serde_err =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProtocolError::Decode(serde_err);
        assert!(err.to_string().starts_with("decode failed"));
    }
}
