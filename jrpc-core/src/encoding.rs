//! Text encodings understood by the codec
//!
//! JSON is defined over UTF-8 here and UTF-8 is the default everywhere.
//! Two single-byte encodings are supported for callers that need to emit or
//! accept legacy text: US-ASCII and ISO-8859-1. In memory all text is held
//! as Rust `String`s; an [`Encoding`] tag records which encoding a string
//! belongs to and governs conversion at the byte boundary.

use crate::error::{Error, Result};
use std::fmt;

/// A character encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8 (the default)
    #[default]
    Utf8,
    /// 7-bit US-ASCII
    Ascii,
    /// ISO-8859-1 (Latin-1)
    Latin1,
}

impl Encoding {
    /// Canonical name of the encoding
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Ascii => "US-ASCII",
            Encoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Look up an encoding by name; matching ignores case, `-` and `_`
    ///
    /// ```rust
    /// use jrpc_core::Encoding;
    ///
    /// assert_eq!(Encoding::from_name("utf8").unwrap(), Encoding::Utf8);
    /// assert_eq!(Encoding::from_name("latin1").unwrap(), Encoding::Latin1);
    /// assert!(Encoding::from_name("EBCDIC").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "UTF8" => Ok(Encoding::Utf8),
            "ASCII" | "USASCII" => Ok(Encoding::Ascii),
            "ISO88591" | "LATIN1" => Ok(Encoding::Latin1),
            _ => Err(Error::Encoding(format!("unknown encoding '{}'", name))),
        }
    }

    /// Whether `c` has a representation in this encoding
    pub fn can_encode(self, c: char) -> bool {
        match self {
            Encoding::Utf8 => true,
            Encoding::Ascii => c.is_ascii(),
            Encoding::Latin1 => (c as u32) <= 0xFF,
        }
    }

    /// Verify that every character of `text` is representable
    pub fn check(self, text: &str) -> Result<()> {
        match text.chars().find(|c| !self.can_encode(*c)) {
            None => Ok(()),
            Some(c) => Err(Error::Encoding(format!(
                "character U+{:04X} cannot be represented in {}",
                c as u32,
                self.name()
            ))),
        }
    }

    /// Number of bytes `text` occupies once encoded
    ///
    /// Assumes `text` is representable; see [`Encoding::check`].
    pub fn encoded_len(self, text: &str) -> usize {
        match self {
            Encoding::Utf8 => text.len(),
            Encoding::Ascii | Encoding::Latin1 => text.chars().count(),
        }
    }

    /// Encode `text` into bytes
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        self.check(text)?;
        Ok(match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Ascii | Encoding::Latin1 => text.chars().map(|c| c as u32 as u8).collect(),
        })
    }

    /// Decode bytes in this encoding into a `String`
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::Encoding(format!("invalid UTF-8 input: {}", e))),
            Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(Error::Encoding(format!(
                    "byte 0x{:02X} at offset {} is not US-ASCII",
                    bytes[pos], pos
                ))),
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Encoding::default(), Encoding::Utf8);
        assert_eq!(Encoding::from_name("UTF-8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::from_name("us-ascii").unwrap(), Encoding::Ascii);
        assert_eq!(Encoding::from_name("ISO-8859-1").unwrap(), Encoding::Latin1);
        assert_eq!(Encoding::Latin1.to_string(), "ISO-8859-1");
    }

    #[test]
    fn test_latin1_roundtrip() {
        let bytes = Encoding::Latin1.encode("caf\u{e9}").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(Encoding::Latin1.decode(&bytes).unwrap(), "caf\u{e9}");
        assert_eq!(Encoding::Latin1.encoded_len("caf\u{e9}"), 4);
        assert_eq!(Encoding::Utf8.encoded_len("caf\u{e9}"), 5);
    }

    #[test]
    fn test_unrepresentable() {
        assert!(Encoding::Ascii.check("plain").is_ok());
        assert!(matches!(Encoding::Ascii.encode("\u{e9}"), Err(Error::Encoding(_))));
        assert!(matches!(Encoding::Latin1.encode("\u{20ac}"), Err(Error::Encoding(_))));
        assert!(Encoding::Utf8.encode("\u{20ac}").is_ok());
    }

    #[test]
    fn test_decode_errors() {
        assert!(Encoding::Utf8.decode(&[0xff, 0xfe]).is_err());
        assert!(Encoding::Ascii.decode(&[b'a', 0x80]).is_err());
    }
}
