#![no_main]

use integrity_chunklist::{Chunklist, DecodeLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Tight limits keep each run cheap; the decoder must still never panic.
    let limits = DecodeLimits {
        max_chunk_count: 4096,
        max_signed_region_bytes: 1 << 20,
        ..DecodeLimits::default()
    };
    if let Ok(list) = Chunklist::from_bytes_with_limits(data, &limits) {
        assert_eq!(list.chunks().len() as u64, list.chunk_count());
        assert_eq!(list.signed_region().len() as u64, list.signature_offset());
    }
});
