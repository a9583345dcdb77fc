use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reel_logging::reel_warn;

/// Decode a response body using: BOM -> Content-Type charset -> chardetng guess.
///
/// Malformed sequences become U+FFFD; one bad cell never costs the whole body.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    // Plain ASCII/UTF-8 exports are the common case; skip detection for them.
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> String {
    // `decode` strips a matching BOM itself.
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        reel_warn!(
            "malformed {} sequence in {} byte body; replaced",
            enc.name(),
            bytes.len()
        );
    }
    text.into_owned()
}
