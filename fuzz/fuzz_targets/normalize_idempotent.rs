#![no_main]

use libfuzzer_sys::fuzz_target;
use latex_drill::normalize_latex;

fuzz_target!(|data: &str| {
    let once = normalize_latex(data);
    assert_eq!(normalize_latex(&once), once, "input: {data:?}");
});
