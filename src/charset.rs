//! Specific Character Set support for text values.
//!
//! This module carries just enough character set awareness for the
//! value container: decoding stored bytes into UTF-8 for display,
//! and backslash scanning that does not mistake the trail byte of a
//! multi-byte character for a value separator.

use std::borrow::Cow;

const BACKSLASH: u8 = 0x5C;

/// A character repertoire for text values, identified by a small
/// ordered key. The default repertoire (key 0) is ISO-IR 6 (ASCII).
///
/// Keys at or below [`IsoIr192`] encode the backslash unambiguously,
/// so plain byte scanning locates value separators. Keys above it are
/// multi-byte encodings whose lead bytes shield the following byte
/// from separator scanning.
///
/// [`IsoIr192`]: #variant.IsoIr192
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SpecificCharacterSet {
    /// ISO-IR 6: the default repertoire (ASCII).
    #[default]
    IsoIr6 = 0,
    /// ISO-IR 100: Latin alphabet No. 1.
    IsoIr100 = 1,
    /// ISO-IR 192: Unicode in UTF-8.
    IsoIr192 = 2,
    /// GB18030: Chinese multi-byte encoding, ASCII-compatible,
    /// with lead bytes in the 0x81..=0xFE range.
    Gb18030 = 3,
}

impl SpecificCharacterSet {
    /// The ordered key of this repertoire.
    #[inline]
    pub fn key(self) -> u8 {
        self as u8
    }

    /// Whether a byte opens a multi-byte character,
    /// shielding the byte that follows it.
    #[inline]
    fn is_lead_byte(self, b: u8) -> bool {
        self == SpecificCharacterSet::Gb18030 && (0x81..=0xFE).contains(&b)
    }

    /// Decode stored text bytes into UTF-8,
    /// replacing unmapped content with U+FFFD.
    pub fn decode(self, data: &[u8]) -> Cow<'_, str> {
        match self {
            SpecificCharacterSet::IsoIr192 => String::from_utf8_lossy(data),
            SpecificCharacterSet::IsoIr100 => {
                if data.is_ascii() {
                    // Latin-1 agrees with ASCII in the 7-bit range
                    String::from_utf8_lossy(data)
                } else {
                    data.iter().map(|&b| char::from(b)).collect::<String>().into()
                }
            }
            SpecificCharacterSet::IsoIr6 => {
                if data.is_ascii() {
                    String::from_utf8_lossy(data)
                } else {
                    data.iter()
                        .map(|&b| if b.is_ascii() { char::from(b) } else { '\u{FFFD}' })
                        .collect::<String>()
                        .into()
                }
            }
            SpecificCharacterSet::Gb18030 => {
                let mut out = String::with_capacity(data.len());
                let mut i = 0;
                while i < data.len() {
                    let b = data[i];
                    if b.is_ascii() {
                        out.push(char::from(b));
                        i += 1;
                    } else {
                        // no conversion table on board, one replacement
                        // character per multi-byte sequence
                        out.push('\u{FFFD}');
                        i += if self.is_lead_byte(b) && i + 1 < data.len() {
                            2
                        } else {
                            1
                        };
                    }
                }
                out.into()
            }
        }
    }

    /// Count the value separators (backslashes) in the given text,
    /// under this repertoire's encoding rules.
    pub fn count_backslashes(self, data: &[u8]) -> usize {
        let mut n = 0;
        let mut i = 0;
        while i < data.len() {
            let b = data[i];
            if b == BACKSLASH {
                n += 1;
            } else if self.is_lead_byte(b) {
                i += 1;
            }
            i += 1;
        }
        n
    }

    /// The byte offset of the next value separator in the given text,
    /// or the text length if there is none.
    pub fn next_backslash(self, data: &[u8]) -> usize {
        let mut i = 0;
        while i < data.len() {
            let b = data[i];
            if b == BACKSLASH {
                return i;
            } else if self.is_lead_byte(b) {
                i += 1;
            }
            i += 1;
        }
        data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order() {
        assert!(SpecificCharacterSet::IsoIr6.key() < SpecificCharacterSet::IsoIr192.key());
        assert!(SpecificCharacterSet::Gb18030.key() > SpecificCharacterSet::IsoIr192.key());
        assert_eq!(SpecificCharacterSet::default(), SpecificCharacterSet::IsoIr6);
    }

    #[test]
    fn plain_backslash_scanning() {
        let cs = SpecificCharacterSet::IsoIr6;
        assert_eq!(cs.count_backslashes(b"HELLO\\THERE"), 1);
        assert_eq!(cs.count_backslashes(b"1\\2\\3"), 2);
        assert_eq!(cs.count_backslashes(b"single"), 0);
        assert_eq!(cs.next_backslash(b"AB\\CD"), 2);
        assert_eq!(cs.next_backslash(b"ABCD"), 4);
    }

    #[test]
    fn multibyte_trail_bytes_are_shielded() {
        let cs = SpecificCharacterSet::Gb18030;
        // 0x81 0x5C is one character, not a separator
        assert_eq!(cs.count_backslashes(&[0x81, 0x5C, b'\\', b'x']), 1);
        assert_eq!(cs.next_backslash(&[0x81, 0x5C, b'\\', b'x']), 2);
        assert_eq!(cs.next_backslash(&[0x81, 0x5C, 0x82, 0x5C]), 4);
    }

    #[test]
    fn decoding() {
        assert_eq!(
            SpecificCharacterSet::IsoIr6.decode(b"OHIF^Rontgen"),
            "OHIF^Rontgen"
        );
        assert_eq!(
            SpecificCharacterSet::IsoIr100.decode(&[b'R', 0xF6, b'n']),
            "R\u{F6}n"
        );
        assert_eq!(
            SpecificCharacterSet::IsoIr192.decode("Röntgen".as_bytes()),
            "Röntgen"
        );
        assert_eq!(
            SpecificCharacterSet::IsoIr6.decode(&[b'a', 0xF6]),
            "a\u{FFFD}"
        );
    }
}
