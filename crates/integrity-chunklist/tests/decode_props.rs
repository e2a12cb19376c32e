//! Property tests: the decoder never panics and tampering is localized.

mod common;

use std::io::Cursor;

use common::{anchors, payload, signer_a, Encoder, SIGNER_A_PUB};
use integrity_chunklist::Chunklist;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let _ = Chunklist::from_bytes(&bytes);
    }

    #[test]
    fn decode_mutated_header_never_panics(
        index in 0usize..36,
        value in any::<u8>(),
    ) {
        let target = payload(64);
        let mut bytes = Encoder::new(&target, &[32, 0]).body();
        bytes.extend_from_slice(&[0; 256]);
        bytes[index] = value;
        let _ = Chunklist::from_bytes(&bytes);
    }
}

proptest! {
    // Signing is comparatively slow; keep the case count small.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn single_byte_corruption_flags_its_chunk(offset in 0usize..3_000, flip in 1u8..=255) {
        let target = payload(3_000);
        let list = Chunklist::from_bytes(&Encoder::new(&target, &[700, 1100, 0]).sign(&signer_a())).unwrap();

        let mut tampered = target.clone();
        tampered[offset] ^= flip;

        let expected = match offset {
            0..=699 => 0,
            700..=1799 => 1,
            _ => 2,
        };
        let failures = list
            .verify(&mut Cursor::new(&tampered), &anchors(&[SIGNER_A_PUB]))
            .unwrap_err();
        prop_assert_eq!(failures.invalid_chunks(), vec![expected]);
    }
}
