#![no_main]

use libfuzzer_sys::fuzz_target;
use meridian_transactions::codec;

// Decoding arbitrary bytes never panics, and anything accepted is canonical:
// it re-encodes to exactly the input.
fuzz_target!(|data: &[u8]| {
    if let Ok(tx) = codec::decode(data) {
        let encoded = codec::encode(&tx).expect("decoded transactions always encode");
        assert_eq!(encoded, data, "non-canonical input accepted");
    }
});
