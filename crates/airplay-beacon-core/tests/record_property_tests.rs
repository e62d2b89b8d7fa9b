//! Property-based tests for the state-file codec
//!
//! These tests verify that any well-formed record survives an encode/decode
//! cycle and that malformed name bytes are always reported, never panicked on.

use airplay_beacon_core::{DecodeError, StateRecord};
use proptest::prelude::*;

/// Generate an executable path without interior NULs
fn arb_executable() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>().prop_filter("NUL terminates the name", |c| *c != '\0'), 0..64)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generate a record as the AirPlay server would write it
fn arb_record() -> impl Strategy<Value = StateRecord> {
    (any::<u16>(), any::<u32>(), arb_executable())
        .prop_map(|(port, pid, exe)| StateRecord::new(port, pid, exe))
}

/// Generate NUL-free bytes that are never valid UTF-8 (0xFF can't appear in UTF-8)
fn arb_invalid_name() -> impl Strategy<Value = Vec<u8>> {
    let non_nul = prop::collection::vec(1u8..=255, 0..32);
    (non_nul.clone(), non_nul).prop_map(|(mut head, tail)| {
        head.push(0xFF);
        head.extend(tail);
        head
    })
}

proptest! {
    /// Property: decode(encode(r)) == r for every well-formed record
    #[test]
    fn encode_decode_roundtrip(record in arb_record()) {
        let decoded = StateRecord::decode(&record.encode());
        prop_assert_eq!(decoded, Ok(record));
    }

    /// Property: anything after the first NUL is ignored
    #[test]
    fn trailing_bytes_after_nul_ignored(
        record in arb_record(),
        trailer in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut bytes = record.encode();
        bytes.extend_from_slice(&trailer);
        prop_assert_eq!(StateRecord::decode(&bytes), Ok(record));
    }

    /// Property: an invalid UTF-8 name is always InvalidName
    #[test]
    fn invalid_utf8_name_rejected(header in any::<[u8; 6]>(), name in arb_invalid_name()) {
        let mut bytes = header.to_vec();
        bytes.extend_from_slice(&name);
        prop_assert_eq!(StateRecord::decode(&bytes), Err(DecodeError::InvalidName));
    }

    /// Property: fewer than six bytes is always Truncated
    #[test]
    fn short_input_truncated(bytes in prop::collection::vec(any::<u8>(), 0..6)) {
        let len = bytes.len();
        prop_assert_eq!(StateRecord::decode(&bytes), Err(DecodeError::Truncated { len }));
    }
}
