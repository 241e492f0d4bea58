#![no_main]

use libfuzzer_sys::fuzz_target;
use valdn::rules;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let rules = rules! {
        "*" => ["required"],
        "user" => ["required", "max:8"],
        "user.name" => ["required", "min:2", "alpha_num"],
        "user.email" => ["email"],
        "tags.*" => ["min:2", "regex:^[a-z]+$"],
        "items.*" => ["required"],
        "missing" => ["required"],
    };

    // Config errors are expected for malformed input; panics are not.
    let _ = valdn::validate_json(text, &rules);
});
