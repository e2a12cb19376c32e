#![no_main]

use integrity_trustcache::TrustCache;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(cache) = TrustCache::parse(data) {
        for entry in cache.entries() {
            let _ = entry.typed_hash();
        }
    }
});
