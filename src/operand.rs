//! Provides the `read_operand` function, which reads the file to be
//! deduplicated into memory, and the `Encoding` that tells us how to write the
//! result back.
use anyhow::{anyhow, Context, Result};
use bstr::ByteSlice;
use log::debug;
use std::{fs, path::Path};

/// How the file was stored on disk. Lines are always split and compared as
/// UTF-8, so UTF-16 files are translated on the way in and on the way out.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Encoding {
    /// UTF-8 without a Byte Order Mark
    Utf8,
    /// UTF-8 with a Byte Order Mark
    Utf8Bom,
    /// UTF-16, little-endian, with a Byte Order Mark
    Utf16Le,
    /// UTF-16, big-endian, with a Byte Order Mark
    Utf16Be,
}

/// The contents of the file to be deduplicated. The `bytes` field is always
/// valid UTF-8 and never contains a Byte Order Mark.
pub struct Operand {
    /// The file's lines, without any Byte Order Mark
    pub bytes: Vec<u8>,
    /// The file's encoding as found on disk
    pub encoding: Encoding,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16BE_BOM: &[u8] = b"\xFE\xFF";

/// Read the file at `path` in its entirety.
pub fn read_operand(path: &Path) -> Result<Operand> {
    let raw = fs::read(path).with_context(|| format!("Can't read file: {}", path.display()))?;
    let operand = decode(raw)
        .with_context(|| format!("Can't decode file: {}", path.display()))?;
    debug!("read {} as {:?}", path.display(), operand.encoding);
    Ok(operand)
}

/// Sniff the Byte Order Mark of `raw`. UTF-16 is translated to UTF-8. Bytes
/// that aren't valid in the encoding are an error rather than a REPLACEMENT
/// CHARACTER, since we're about to overwrite the original.
fn decode(raw: Vec<u8>) -> Result<Operand> {
    let Some((enc, bom_len)) = encoding_rs::Encoding::for_bom(&raw) else {
        raw.to_str()?;
        return Ok(Operand { bytes: raw, encoding: Encoding::Utf8 });
    };
    if enc == encoding_rs::UTF_8 {
        let mut raw = raw;
        let bytes = raw.split_off(bom_len);
        bytes.to_str()?;
        return Ok(Operand { bytes, encoding: Encoding::Utf8Bom });
    }
    let encoding = if enc == encoding_rs::UTF_16LE { Encoding::Utf16Le } else { Encoding::Utf16Be };
    let translated = enc
        .decode_without_bom_handling_and_without_replacement(&raw[bom_len..])
        .ok_or_else(|| anyhow!("malformed {} sequence", enc.name()))?;
    Ok(Operand { bytes: translated.into_owned().into_bytes(), encoding })
}

impl Encoding {
    /// The Byte Order Mark to write at the start of the file, possibly empty
    #[must_use]
    pub fn bom(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => b"",
            Encoding::Utf8Bom => UTF8_BOM,
            Encoding::Utf16Le => UTF16LE_BOM,
            Encoding::Utf16Be => UTF16BE_BOM,
        }
    }

    /// Turn `content` (as produced from an `Operand`'s `bytes`) back into what
    /// belongs on disk, Byte Order Mark first.
    pub fn encode(self, content: &[u8]) -> Result<Vec<u8>> {
        let mut encoded = self.bom().to_vec();
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => encoded.extend_from_slice(content),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                let text = std::str::from_utf8(content)?;
                encoded.reserve(2 * text.len());
                for unit in text.encode_utf16() {
                    let bytes =
                        if self == Encoding::Utf16Le { unit.to_le_bytes() } else { unit.to_be_bytes() };
                    encoded.extend_from_slice(&bytes);
                }
            }
        }
        Ok(encoded)
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{to_utf_16be, to_utf_16le};
    use assert_fs::{prelude::*, TempDir};

    const UTF8_BOM_STR: &str = "\u{FEFF}";

    #[test]
    fn utf8_bom_is_correct() {
        assert_eq!(UTF8_BOM, UTF8_BOM_STR.as_bytes());
    }

    const CRAB: &str = "The cute red crab \u{1F980}\n jumps over the lazy blue gopher\n";

    #[test]
    fn utf_16le_is_translated_to_utf8_without_a_bom() {
        let operand = decode(to_utf_16le(CRAB)).unwrap();
        assert_eq!(operand.encoding, Encoding::Utf16Le);
        assert_eq!(operand.bytes, CRAB.as_bytes());
    }

    #[test]
    fn utf_16be_is_translated_to_utf8_without_a_bom() {
        let operand = decode(to_utf_16be(CRAB)).unwrap();
        assert_eq!(operand.encoding, Encoding::Utf16Be);
        assert_eq!(operand.bytes, CRAB.as_bytes());
    }

    #[test]
    fn utf_16_is_encoded_back_the_way_it_came() {
        assert_eq!(Encoding::Utf16Le.encode(CRAB.as_bytes()).unwrap(), to_utf_16le(CRAB));
        assert_eq!(Encoding::Utf16Be.encode(CRAB.as_bytes()).unwrap(), to_utf_16be(CRAB));
    }

    #[test]
    fn utf8_bom_is_stripped_and_restored() {
        let raw = [UTF8_BOM, CRAB.as_bytes()].concat();
        let operand = decode(raw.clone()).unwrap();
        assert_eq!(operand.encoding, Encoding::Utf8Bom);
        assert_eq!(operand.bytes, CRAB.as_bytes());
        assert_eq!(operand.encoding.encode(&operand.bytes).unwrap(), raw);
    }

    #[test]
    fn utf8_without_a_bom_passes_through() {
        let raw = CRAB.as_bytes().to_vec();
        let operand = decode(raw.clone()).unwrap();
        assert_eq!(operand.encoding, Encoding::Utf8);
        assert_eq!(operand.bytes, raw);
        assert_eq!(Encoding::Utf8.encode(&raw).unwrap(), raw);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert!(decode(b"caf\xe9\ncaf\xe9\n".to_vec()).is_err());
        assert!(decode([UTF8_BOM, &b"caf\xe9\n"[..]].concat()).is_err());
    }

    #[test]
    fn malformed_utf_16_is_an_error() {
        // An unpaired high surrogate
        let raw = b"\xff\xfe\x00\xd8a\x00".to_vec();
        assert!(decode(raw).is_err());
    }

    #[test]
    fn decode_errors_name_the_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("user-claims.txt");
        file.write_binary(b"caf\xe9\n").unwrap();
        let err = read_operand(file.path()).err().unwrap();
        assert!(format!("{err}").contains("user-claims.txt"));
    }

    #[test]
    fn missing_file_error_names_the_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.child("user-claims.txt");
        let err = read_operand(missing.path()).err().unwrap();
        assert!(format!("{err}").contains("user-claims.txt"));
        let io_err = err.root_cause().downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    }
}
