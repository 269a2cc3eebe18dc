#![no_main]
use libfuzzer_sys::fuzz_target;
use ossindex_client::marshal::{JsonMarshaller, Marshaller};

/// Fuzz single-entry decoding as done on persisted cache files.
///
/// Cache files may be truncated or garbage; decoding must never panic.
fuzz_target!(|data: &[u8]| {
    let mut reader = data;
    let _ = JsonMarshaller.unmarshal_report(&mut reader);
});
