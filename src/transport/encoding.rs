//! Payload text decoding
//!
//! One provider serves GBK; everything else is UTF-8. Unknown charset labels
//! fall back to lossy UTF-8 so a mislabeled payload degrades into a parse
//! failure for that unit instead of an abort.

use encoding_rs::Encoding;

/// Decode `bytes` according to a WHATWG charset label (e.g. `"gbk"`)
pub fn decode_text(bytes: &[u8], charset: &str) -> String {
    match Encoding::for_label(charset.as_bytes()) {
        Some(encoding) => {
            let (text, _, _) = encoding.decode(bytes);
            text.into_owned()
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_gbk_payloads() {
        // "中文" in GBK
        let bytes = [0xD6, 0xD0, 0xCE, 0xC4];
        assert_eq!(decode_text(&bytes, "gbk"), "中文");
    }

    #[test]
    fn ascii_is_unchanged_under_gbk() {
        assert_eq!(decode_text(b"{\"title\":\"News\"}", "gbk"), "{\"title\":\"News\"}");
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        assert_eq!(decode_text("中文".as_bytes(), "no-such-charset"), "中文");
    }
}
