//! Construction of value storage from source data.
//!
//! Each constructor takes the target value representation and source
//! elements of some shape, and produces the canonical storage for
//! that representation: numeric sources destined for a string
//! representation are formatted, text destined for a binary
//! representation is parsed, bulk representations reinterpret the
//! source bytes, and AT pairs words into tags. A representation that
//! cannot hold the source content yields the invalid value.

use itertools::Itertools;
use num_traits::{NumCast, ToPrimitive};
use safe_transmute::transmute_to_bytes;
use smallvec::SmallVec;

use super::deserialize::{parse_f64_prefix, parse_i64_prefix};
use super::serialize::format_ds;
use super::{Element, Store, Value, ValueData, C};
use crate::charset::SpecificCharacterSet;
use crate::header::{Length, Tag};
use crate::vr::VR;

/// The element kind of a numeric construction source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

mod source {
    use super::SourceKind;
    use num_traits::NumCast;
    use safe_transmute::TriviallyTransmutable;

    /// Support surface of the construction sources, kept out of the
    /// public interface so that the set stays closed.
    pub trait SourceSupport: Copy + NumCast + TriviallyTransmutable {
        const KIND: SourceKind;
    }

    macro_rules! impl_source {
        ($t:ty, $kind:ident) => {
            impl SourceSupport for $t {
                const KIND: SourceKind = SourceKind::$kind;
            }
        };
    }

    impl_source!(u8, U8);
    impl_source!(i16, I16);
    impl_source!(u16, U16);
    impl_source!(i32, I32);
    impl_source!(u32, U32);
    impl_source!(f32, F32);
    impl_source!(f64, F64);
}

/// Marker for the numeric types accepted as construction sources.
/// This trait is sealed: it covers `u8`, `i16`, `u16`, `i32`, `u32`,
/// `f32` and `f64`, and cannot be implemented outside this crate.
pub trait NumericSource: source::SourceSupport {}

impl<T: source::SourceSupport> NumericSource for T {}

/// Convert between numeric domains, collapsing to zero when the
/// source value has no representation in the target domain.
pub(crate) fn cast_num<T, U>(v: T) -> U
where
    T: ToPrimitive,
    U: NumCast + Default,
{
    NumCast::from(v).unwrap_or_default()
}

impl Value {
    /// Create a value of the given representation from numeric source
    /// elements, converting each element as the representation
    /// requires. The meta representations resolve here: OX becomes OB
    /// for byte sources and OW otherwise, XS becomes US for unsigned
    /// 16-bit sources and SS otherwise. Returns the invalid value
    /// when the representation cannot hold numeric content.
    pub fn new<T: NumericSource>(vr: VR, data: &[T]) -> Value {
        let vr = match vr {
            VR::OX => {
                if T::KIND == SourceKind::U8 {
                    VR::OB
                } else {
                    VR::OW
                }
            }
            VR::XS => {
                if T::KIND == SourceKind::U16 {
                    VR::US
                } else {
                    VR::SS
                }
            }
            other => other,
        };
        let d = match vr {
            VR::FD => Some(numeric_data::<T, f64>(vr, data)),
            VR::FL => Some(numeric_data::<T, f32>(vr, data)),
            VR::SL => Some(numeric_data::<T, i32>(vr, data)),
            VR::UL => Some(numeric_data::<T, u32>(vr, data)),
            VR::SS => Some(numeric_data::<T, i16>(vr, data)),
            VR::US => Some(numeric_data::<T, u16>(vr, data)),
            VR::DS => Some(decimal_text_data(data)),
            VR::IS => Some(integer_text_data(data)),
            VR::OB | VR::UN => Some(byte_data(vr, transmute_to_bytes(data))),
            VR::OW => Some(word_data(data)),
            VR::OF => Some(float_word_data(data)),
            VR::AT => Some(tag_pair_data(data)),
            _ => None,
        };
        Value::from_data(d)
    }

    /// Create a single-element value from a double,
    /// converted as the representation requires.
    pub fn from_scalar(vr: VR, value: f64) -> Value {
        Value::new(vr, &[value])
    }

    /// Create an AT value from attribute tags.
    /// Any other representation yields the invalid value.
    pub fn from_tags(vr: VR, tags: &[Tag]) -> Value {
        if vr != VR::AT {
            return Value::default();
        }
        Value::from_data(Some(store_data(vr, SmallVec::from_slice(tags))))
    }

    /// Create a single-tag AT value.
    pub fn from_tag(vr: VR, tag: Tag) -> Value {
        Value::from_tags(vr, &[tag])
    }

    /// Create a value from text in the default character repertoire.
    pub fn from_text(vr: VR, text: &str) -> Value {
        Value::from_text_bytes(vr, text.as_bytes())
    }

    /// Create a value from text bytes in the default character
    /// repertoire.
    pub fn from_text_bytes(vr: VR, bytes: &[u8]) -> Value {
        Value::with_character_set(vr, SpecificCharacterSet::default(), bytes)
    }

    /// Create a value from text bytes under the given character set.
    ///
    /// Text representations keep the bytes, pad them to an even
    /// length (a space, or a NUL for UI) and count the separators
    /// under the character set's rules; the set itself is only
    /// attached to representations affected by it. Numeric
    /// representations parse one number per backslash-separated
    /// segment, bulk representations take the bytes as element
    /// content. AT and SQ cannot be built from text and yield the
    /// invalid value.
    pub fn with_character_set(vr: VR, cs: SpecificCharacterSet, bytes: &[u8]) -> Value {
        let vr = match vr {
            VR::OX => VR::OB,
            VR::XS => VR::SS,
            other => other,
        };
        let d = if vr.is_text() {
            let mut text: C<u8> = SmallVec::from_slice(bytes);
            if text.len() % 2 != 0 {
                text.push(if vr == VR::UI { 0 } else { b' ' });
            }
            let charset = if vr.has_specific_character_set() {
                cs
            } else {
                SpecificCharacterSet::default()
            };
            let count = if vr.is_long_text() {
                1
            } else if bytes.is_empty() {
                0
            } else {
                (1 + charset.count_backslashes(bytes)) as u32
            };
            Some(ValueData {
                vr,
                charset,
                vl: Length(text.len() as u32),
                count,
                store: Store::Text(text),
            })
        } else {
            match vr {
                VR::FD => Some(store_data(vr, parse_floats::<f64>(bytes))),
                VR::FL => Some(store_data(vr, parse_floats::<f32>(bytes))),
                VR::SL => Some(store_data(vr, parse_ints::<i32>(bytes))),
                VR::UL => Some(store_data(vr, parse_ints::<u32>(bytes))),
                VR::SS => Some(store_data(vr, parse_ints::<i16>(bytes))),
                VR::US => Some(store_data(vr, parse_ints::<u16>(bytes))),
                VR::OB | VR::UN => Some(byte_data(vr, bytes)),
                VR::OW => Some(store_data(vr, words_of(bytes))),
                VR::OF => Some(store_data(vr, floats_of(bytes))),
                _ => None,
            }
        };
        Value::from_data(d)
    }

    /// An empty (zero element) value with the canonical storage kind
    /// for the given representation. The meta representations resolve
    /// to their word forms (OW, SS).
    pub fn empty_for(vr: VR) -> Value {
        match vr {
            _ if vr.is_text() => Value::allocate_text(vr, 0),
            VR::FD => Value::allocate::<f64>(vr, 0),
            VR::FL | VR::OF => Value::allocate::<f32>(vr, 0),
            VR::SL => Value::allocate::<i32>(vr, 0),
            VR::UL => Value::allocate::<u32>(vr, 0),
            VR::SS | VR::XS => Value::allocate::<i16>(VR::SS, 0),
            VR::US => Value::allocate::<u16>(vr, 0),
            VR::OW | VR::OX => Value::allocate::<i16>(VR::OW, 0),
            VR::OB | VR::UN => Value::allocate::<u8>(vr, 0),
            VR::AT => Value::allocate::<Tag>(vr, 0),
            VR::SQ => Value::allocate::<crate::item::Item>(vr, 0),
            _ => Value::default(),
        }
    }
}

fn store_data<T: Element>(vr: VR, elems: C<T>) -> ValueData {
    let (vl, count) = T::header(elems.len());
    ValueData {
        vr,
        charset: SpecificCharacterSet::default(),
        vl,
        count,
        store: T::wrap(elems),
    }
}

fn numeric_data<S, T>(vr: VR, data: &[S]) -> ValueData
where
    S: NumericSource,
    T: Element + NumCast + Default,
{
    store_data(vr, data.iter().map(|&v| cast_num::<S, T>(v)).collect())
}

fn decimal_text_data<S: NumericSource>(data: &[S]) -> ValueData {
    let joined = data.iter().map(|&v| format_ds(cast_num(v))).join("\\");
    text_data(VR::DS, joined.into_bytes(), data.len() as u32)
}

fn integer_text_data<S: NumericSource>(data: &[S]) -> ValueData {
    let joined = data
        .iter()
        .map(|&v| cast_num::<S, i32>(v).to_string())
        .join("\\");
    text_data(VR::IS, joined.into_bytes(), data.len() as u32)
}

fn text_data(vr: VR, mut bytes: Vec<u8>, count: u32) -> ValueData {
    if bytes.len() % 2 != 0 {
        bytes.push(if vr == VR::UI { 0 } else { b' ' });
    }
    let text: C<u8> = SmallVec::from_vec(bytes);
    ValueData {
        vr,
        charset: SpecificCharacterSet::default(),
        vl: Length(text.len() as u32),
        count,
        store: Store::Text(text),
    }
}

fn byte_data(vr: VR, bytes: &[u8]) -> ValueData {
    let count = bytes.len() as u32;
    let mut store: C<u8> = SmallVec::from_slice(bytes);
    if store.len() % 2 != 0 {
        store.push(0);
    }
    ValueData {
        vr,
        charset: SpecificCharacterSet::default(),
        vl: Length(store.len() as u32),
        count,
        store: Store::Bytes(store),
    }
}

fn word_data<S: NumericSource>(data: &[S]) -> ValueData {
    if S::KIND == SourceKind::U16 {
        numeric_data::<S, u16>(VR::OW, data)
    } else {
        // reinterpret the source bytes as native-order words
        store_data(VR::OW, words_of(transmute_to_bytes(data)))
    }
}

fn float_word_data<S: NumericSource>(data: &[S]) -> ValueData {
    if S::KIND == SourceKind::F32 {
        numeric_data::<S, f32>(VR::OF, data)
    } else {
        store_data(VR::OF, floats_of(transmute_to_bytes(data)))
    }
}

fn words_of(bytes: &[u8]) -> C<i16> {
    debug_assert!(bytes.len() % 2 == 0, "byte length must fill whole words");
    bytes
        .chunks_exact(2)
        .map(|c| i16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

fn floats_of(bytes: &[u8]) -> C<f32> {
    debug_assert!(bytes.len() % 4 == 0, "byte length must fill whole floats");
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn tag_pair_data<S: NumericSource>(data: &[S]) -> ValueData {
    debug_assert!(data.len() % 2 == 0, "AT sources pair up group and element");
    let tags: C<Tag> = data
        .chunks_exact(2)
        .map(|p| Tag(cast_num(p[0]), cast_num(p[1])))
        .collect();
    store_data(VR::AT, tags)
}

fn parse_floats<T>(bytes: &[u8]) -> C<T>
where
    T: Element + NumCast + Default,
{
    if bytes.is_empty() {
        return C::new();
    }
    bytes
        .split(|b| *b == b'\\')
        .map(|seg| cast_num(parse_f64_prefix(seg)))
        .collect()
}

fn parse_ints<T>(bytes: &[u8]) -> C<T>
where
    T: Element + NumCast + Default,
{
    if bytes.is_empty() {
        return C::new();
    }
    bytes
        .split(|b| *b == b'\\')
        .map(|seg| cast_num(parse_i64_prefix(seg)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_construction_follows_the_representation() {
        let v = Value::from_scalar(VR::FD, 2.5);
        assert_eq!(v.float64_slice().unwrap(), &[2.5]);

        let v = Value::from_scalar(VR::US, 3.0);
        assert_eq!(v.uint16_slice().unwrap(), &[3u16]);

        let v = Value::from_scalar(VR::DS, 3.14159);
        assert_eq!(v.as_string(), "3.14159");

        let v = Value::from_scalar(VR::IS, 2.5);
        assert_eq!(v.as_string(), "2");
    }

    #[test]
    fn text_representations_cannot_hold_every_source() {
        assert!(!Value::new(VR::CS, &[1.0f64]).is_valid());
        assert!(!Value::from_scalar(VR::SQ, 1.0).is_valid());
        assert!(!Value::from_text(VR::AT, "(0008,0018)").is_valid());
        assert!(!Value::from_text(VR::SQ, "item").is_valid());
    }

    #[test]
    fn bulk_representations_reinterpret_source_bytes() {
        let v = Value::new(VR::OW, &[1.0f32]);
        assert_eq!(v.vr(), Some(VR::OW));
        assert_eq!(v.multiplicity(), 2);
        assert!(v.length().inner_eq(crate::header::Length(4)));

        let v = Value::new(VR::OF, &[1.0f32, 2.0]);
        assert_eq!(v.float32_slice().unwrap(), &[1.0f32, 2.0]);

        let v = Value::new(VR::OB, &[0x0102u16]);
        assert_eq!(v.multiplicity(), 2);
    }

    #[test]
    fn unsigned_conversion_degrades_out_of_domain() {
        let v = Value::new(VR::US, &[-1i16, 3]);
        assert_eq!(v.uint16_slice().unwrap(), &[0u16, 3]);

        let v = Value::from_text(VR::US, "-2\\7");
        assert_eq!(v.uint16_slice().unwrap(), &[0u16, 7]);
    }

    #[test]
    fn empty_text_parses_to_no_elements() {
        let v = Value::from_text(VR::FL, "");
        assert!(v.is_valid());
        assert_eq!(v.multiplicity(), 0);

        let v = Value::from_text(VR::CS, "");
        assert_eq!(v.multiplicity(), 0);
        assert!(v.length().inner_eq(crate::header::Length(0)));
    }
}
