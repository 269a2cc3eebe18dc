#![no_main]
use libfuzzer_sys::fuzz_target;
use ossindex_client::marshal::{JsonMarshaller, Marshaller};

/// Fuzz batch response decoding.
///
/// Arbitrary bodies must either decode to a report list or fail cleanly.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = JsonMarshaller.unmarshal_reports(s);
    }
});
