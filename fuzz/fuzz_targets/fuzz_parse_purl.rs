#![no_main]
use libfuzzer_sys::fuzz_target;
use ossindex_client::Identifier;

/// Fuzz package-url parsing used for command-line and file input.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Identifier::parse_purl(s);
    }
});
