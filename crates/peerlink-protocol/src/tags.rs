//! The reserved tag that marks Peerlink traffic.
//!
//! Both host primitives carry a free-form string field the host uses for
//! its own purposes. Peerlink claims a reserved prefix on that field so
//! its messages can share the primitives without colliding with the
//! host's traffic. The prefix also encodes whether the message is a
//! broadcast or targeted at one peer, followed by the message
//! identifier:
//!
//! ```text
//! !plink:b!my_mod:on_score        broadcast, identifier "my_mod:on_score"
//! !plink:t!my_mod:on_score        targeted, same identifier
//! ```

/// Prefix common to every Peerlink message. Since tags are transmitted
/// with every message and bandwidth is limited, this is kept short.
pub const PROTOCOL_TAG: &str = "!plink:";

const BROADCAST_TAG: &str = "!plink:b!";
const TARGETED_TAG: &str = "!plink:t!";

// Both sub-tags must be the same length so the identifier always starts
// at the same offset.
const SUB_TAG_LEN: usize = BROADCAST_TAG.len();

/// The two kinds of Peerlink traffic a tag can mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Deliver to every connected peer.
    Broadcast,
    /// Deliver to the one peer named in the primitive's integer field.
    Targeted,
}

impl TagKind {
    /// Builds the full wire tag for a message identifier.
    pub fn compose(self, identifier: &str) -> String {
        let sub_tag = match self {
            TagKind::Broadcast => BROADCAST_TAG,
            TagKind::Targeted => TARGETED_TAG,
        };
        format!("{sub_tag}{identifier}")
    }
}

/// Splits a wire tag back into its kind and message identifier.
///
/// Returns `None` for tags that don't belong to this protocol — the
/// caller must let those through untouched, they're the host's own
/// traffic.
pub fn parse_tag(tag: &str) -> Option<(TagKind, &str)> {
    if !tag.starts_with(PROTOCOL_TAG) {
        return None;
    }
    let kind = if tag.starts_with(BROADCAST_TAG) {
        TagKind::Broadcast
    } else if tag.starts_with(TARGETED_TAG) {
        TagKind::Targeted
    } else {
        return None;
    };
    Some((kind, &tag[SUB_TAG_LEN..]))
}
