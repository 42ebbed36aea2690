//! Helpers shared by the unit tests

/// `source` as UTF-16LE, Byte Order Mark first
pub(crate) fn to_utf_16le(source: &str) -> Vec<u8> {
    let mut result = b"\xff\xfe".to_vec();
    for unit in source.encode_utf16() {
        result.extend_from_slice(&unit.to_le_bytes());
    }
    result
}

/// `source` as UTF-16BE, Byte Order Mark first
pub(crate) fn to_utf_16be(source: &str) -> Vec<u8> {
    let mut result = b"\xfe\xff".to_vec();
    for unit in source.encode_utf16() {
        result.extend_from_slice(&unit.to_be_bytes());
    }
    result
}
