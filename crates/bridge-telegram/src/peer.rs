//! Marked chat identifiers
//!
//! The HTTP/WebSocket surface identifies every conversation with a single
//! signed integer, Bot-API style: users keep their id, basic groups are
//! negated, and channels/supergroups live below `-1_000_000_000_000`. This
//! module converts between that convention and the library's `Peer` values.

use layer_tl_types as tl;

/// Offset applied to channel ids when marking them.
const ZERO_CHANNEL_ID: i64 = 1_000_000_000_000;

/// Convert a TL peer into its marked chat id.
#[must_use]
pub fn mark_peer(peer: &tl::enums::Peer) -> i64 {
    match peer {
        tl::enums::Peer::User(u) => u.user_id,
        tl::enums::Peer::Chat(c) => -c.chat_id,
        tl::enums::Peer::Channel(c) => -(ZERO_CHANNEL_ID + c.channel_id),
    }
}

/// Convert a marked channel id (the bare TL id) into its marked form.
#[must_use]
pub fn mark_channel(channel_id: i64) -> i64 {
    -(ZERO_CHANNEL_ID + channel_id)
}

/// Convert a marked chat id back into a TL peer.
#[must_use]
pub fn unmark(chat_id: i64) -> tl::enums::Peer {
    if chat_id <= -ZERO_CHANNEL_ID {
        tl::enums::Peer::Channel(tl::types::PeerChannel {
            channel_id: -chat_id - ZERO_CHANNEL_ID,
        })
    } else if chat_id < 0 {
        tl::enums::Peer::Chat(tl::types::PeerChat { chat_id: -chat_id })
    } else {
        tl::enums::Peer::User(tl::types::PeerUser { user_id: chat_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ids_are_unchanged() {
        assert_eq!(mark_peer(&unmark(777_000)), 777_000);
        match unmark(777_000) {
            tl::enums::Peer::User(u) => assert_eq!(u.user_id, 777_000),
            other => panic!("expected user peer, got {other:?}"),
        }
    }

    #[test]
    fn test_group_ids_are_negated() {
        match unmark(-123_456) {
            tl::enums::Peer::Chat(c) => assert_eq!(c.chat_id, 123_456),
            other => panic!("expected chat peer, got {other:?}"),
        }
        let peer = tl::enums::Peer::Chat(tl::types::PeerChat { chat_id: 123_456 });
        assert_eq!(mark_peer(&peer), -123_456);
    }

    #[test]
    fn test_channel_ids_carry_the_offset() {
        let peer = tl::enums::Peer::Channel(tl::types::PeerChannel {
            channel_id: 1_234_567,
        });
        let marked = mark_peer(&peer);
        assert_eq!(marked, -1_000_001_234_567);
        match unmark(marked) {
            tl::enums::Peer::Channel(c) => assert_eq!(c.channel_id, 1_234_567),
            other => panic!("expected channel peer, got {other:?}"),
        }
        assert_eq!(mark_channel(1_234_567), marked);
    }

    #[test]
    fn test_round_trip() {
        for id in [1, 42, 10_000_000_000, -1, -999_999_999_999, -1_000_000_000_001] {
            assert_eq!(mark_peer(&unmark(id)), id);
        }
    }
}
