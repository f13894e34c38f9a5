#![no_main]

use html2md_converter::{Options, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, u8)| {
    let (raw, width) = data;
    let options = Options {
        line_width: usize::from(width.max(1)),
        ..Default::default()
    };

    let once = normalize(raw, &options);
    let twice = normalize(&once, &options);
    assert_eq!(once, twice);
});
