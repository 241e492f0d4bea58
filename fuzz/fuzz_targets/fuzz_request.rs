#![no_main]

use libfuzzer_sys::fuzz_target;
use valdn::Request;

const CONTENT_TYPES: &[&str] = &[
    "application/json",
    "application/x-www-form-urlencoded",
    "multipart/form-data; boundary=XyZ",
    "multipart/form-data; boundary=\"a b\"",
    "text/plain",
];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the content type; the rest splits at the first NUL
    // into query and body.
    let content_type = CONTENT_TYPES[data[0] as usize % CONTENT_TYPES.len()];
    let rest = &data[1..];
    let split = rest.iter().position(|&b| b == 0).unwrap_or(0);
    let (query, body) = rest.split_at(split);

    let request = Request::new()
        .with_content_type(content_type)
        .with_query(String::from_utf8_lossy(query).into_owned())
        .with_body(body.to_vec());

    let _ = request.to_map();
});
