#![no_main]

use cgi_form::bytes::Bytes;
use cgi_form::{parse_cookies, percent, RequestDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = RequestDecoder::new();
    let body = Bytes::copy_from_slice(data);

    let _ = decoder.decode(data, Some("multipart/form-data; boundary=X-BOUNDARY"), Some(body.clone()));
    let _ = decoder.decode(data, Some("application/x-www-form-urlencoded"), Some(body));

    let _ = percent::decode(data);
    let _ = parse_cookies(&String::from_utf8_lossy(data));
});
