//! Basic data types for addressing and sizing DICOM attribute values:
//! the attribute tag and the value length.

use std::cmp::Ordering;
use std::fmt;

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// A tag is an ordered pair of 16-bit group and element numbers.
/// Both `(u16, u16)` and `[u16; 2]` can be efficiently converted
/// to this type.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// The tag packed into a single 32-bit key,
    /// group in the high bits, element in the low bits.
    /// Key order is the same as tag order.
    #[inline]
    pub fn key(self) -> u32 {
        (u32::from(self.0) << 16) | u32::from(self.1)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialEq<[u16; 2]> for Tag {
    fn eq(&self, other: &[u16; 2]) -> bool {
        self.0 == other[0] && self.1 == other[1]
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// A type for representing value content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length. The value container uses the undefined
/// sentinel while a value is being built up by appending, where
/// the effective size is tracked by the element count instead.
///
/// Numeric comparisons do not function the same way as primitive
/// number types: two undefined lengths are not equal, and comparing
/// against an undefined length is always `false`. Use [`inner_eq`]
/// to compare raw representations.
///
/// [`inner_eq`]: #method.inner_eq
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value from its internal representation.
    /// This is equivalent to `Length(len)`.
    #[inline]
    pub fn new(len: u32) -> Self {
        Length(len)
    }

    /// Create a new length value with the given number of bytes.
    ///
    /// # Panic
    ///
    /// This function will panic if `len` represents an undefined length.
    #[inline]
    pub fn defined(len: u32) -> Self {
        assert_ne!(len, UNDEFINED_LEN);
        Length(len)
    }

    /// Check whether this length is undefined (unknown).
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    /// Returns `None` if it represents an undefined length.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }

    /// Check whether the length is equally specified as another length.
    /// Unlike the implemented `PartialEq`, two undefined lengths are
    /// considered equivalent by this method.
    #[inline]
    pub fn inner_eq(self, other: Length) -> bool {
        self.0 == other.0
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_accessors_and_order() {
        let tag = Tag(0x0010, 0x0020);
        assert_eq!(tag.group(), 0x0010);
        assert_eq!(tag.element(), 0x0020);
        assert_eq!(tag, (0x0010, 0x0020));
        assert_eq!(tag, [0x0010, 0x0020]);
        assert_eq!(Tag::from((0x0010, 0x0020)), tag);
        assert_eq!(Tag::from([0x0010, 0x0020]), tag);

        assert!(Tag(0x0008, 0x0018) < Tag(0x0008, 0x0020));
        assert!(Tag(0x0008, 0xFFFF) < Tag(0x0010, 0x0000));
        assert_eq!(Tag(0x0008, 0x0018).key(), 0x0008_0018);
        assert!(Tag(0x0008, 0x0018).key() < Tag(0x0010, 0x0000).key());
    }

    #[test]
    fn tag_formatting() {
        assert_eq!(Tag(0x0008, 0x0018).to_string(), "(0008,0018)");
        assert_eq!(Tag(0xF001, 0x0001).to_string(), "(F001,0001)");
        assert_eq!(format!("{:?}", Tag(0x0002, 0x0020)), "Tag(0x0002, 0x0020)");
    }

    #[test]
    fn length_undefined_semantics() {
        assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
        assert!(Length::UNDEFINED.inner_eq(Length::UNDEFINED));
        assert!(Length::UNDEFINED.is_undefined());
        assert_eq!(Length::UNDEFINED.get(), None);
        assert_eq!(Length(12).get(), Some(12));
        assert!(Length::defined(16) < Length::defined(64));
        assert!(!(Length::UNDEFINED < Length::defined(64)));
        assert!(!(Length::UNDEFINED > Length::defined(64)));
        assert_eq!(Length::UNDEFINED.to_string(), "U/L");
        assert_eq!(Length(8).to_string(), "8");
    }
}
