//! Plain text decoding

use super::RawText;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode as UTF-8, replacing invalid sequences and dropping a leading BOM
pub(super) fn extract(bytes: &[u8]) -> RawText {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    RawText {
        text: String::from_utf8_lossy(bytes).into_owned(),
        page_count: None,
    }
}
