#![no_main]

use html2md_converter::{Options, convert};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let outcome = convert(&html, &Options::default());

    // Panics are caught at the boundary; one surfacing here is a bug
    assert_ne!(
        outcome.error_kind(),
        Some(html2md_converter::ErrorKind::Internal),
        "internal error: {:?}",
        outcome.error
    );
    assert!(outcome.markdown.is_empty() || outcome.markdown.ends_with('\n'));
});
