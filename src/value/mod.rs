//! Declaration and implementation of the DICOM attribute value
//! container.
//!
//! A [`Value`] owns one attribute's content: its value representation,
//! byte length, element count and element storage. Handles are cheap
//! to clone, sharing their payload behind a reference count; every
//! mutating operation makes the payload unique first, so writes are
//! never observed through another handle.
//!
//! [`Value`]: ./struct.Value.html

mod convert;
mod deserialize;
mod serialize;

use crate::charset::SpecificCharacterSet;
use crate::header::{Length, Tag};
use crate::item::Item;
use crate::vr::VR;
use itertools::Itertools;
use num_traits::NumCast;
use smallvec::{smallvec, SmallVec};
use snafu::Snafu;
use std::fmt;
use std::rc::Rc;

pub use self::convert::NumericSource;

/// The type of all in-memory element aggregations.
pub type C<T> = SmallVec<[T; 2]>;

/// The storage kind of a value's elements.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StoreType {
    /// a default-constructed handle, holding nothing
    Empty,
    /// text bytes, holding one or more backslash-separated values
    Text,
    /// raw bytes
    Bytes,
    /// signed 16-bit words
    Short,
    /// unsigned 16-bit words
    UShort,
    /// signed 32-bit integers
    Int,
    /// unsigned 32-bit integers
    UInt,
    /// 32-bit floats
    Float,
    /// 64-bit floats
    Double,
    /// attribute tags
    Tags,
    /// nested data set items
    Items,
    /// one value per instance (a multiplexed value)
    Values,
}

/// An error type for a failed attempt at reading a value's storage
/// as a mismatching element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(display("bad value cast: requested {} but value stores {:?}", requested, got))]
pub struct CastValueError {
    /// the name of the requested storage view
    pub requested: &'static str,
    /// the storage kind actually present
    pub got: StoreType,
}

/// The closed set of element storages. Every operation over values
/// matches this exhaustively, so a new kind cannot be added without
/// revisiting all of them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Store {
    Text(C<u8>),
    Bytes(C<u8>),
    Short(C<i16>),
    UShort(C<u16>),
    Int(C<i32>),
    UInt(C<u32>),
    Float(C<f32>),
    Double(C<f64>),
    Tags(C<Tag>),
    Items(C<Item>),
    Values(C<Value>),
}

impl Store {
    fn store_type(&self) -> StoreType {
        match self {
            Store::Text(_) => StoreType::Text,
            Store::Bytes(_) => StoreType::Bytes,
            Store::Short(_) => StoreType::Short,
            Store::UShort(_) => StoreType::UShort,
            Store::Int(_) => StoreType::Int,
            Store::UInt(_) => StoreType::UInt,
            Store::Float(_) => StoreType::Float,
            Store::Double(_) => StoreType::Double,
            Store::Tags(_) => StoreType::Tags,
            Store::Items(_) => StoreType::Items,
            Store::Values(_) => StoreType::Values,
        }
    }
}

/// The shared payload of a value handle.
#[derive(Debug, Clone)]
pub(crate) struct ValueData {
    pub(crate) vr: VR,
    pub(crate) charset: SpecificCharacterSet,
    pub(crate) vl: Length,
    pub(crate) count: u32,
    pub(crate) store: Store,
}

impl ValueData {
    /// Locate the `i`-th backslash-delimited segment of the text and
    /// trim its space padding.
    fn text_segment<'a>(&self, text: &'a [u8], i: usize) -> &'a [u8] {
        let mut seg: &[u8] = if self.count > 1 {
            let mut rest = text;
            let mut k = i;
            loop {
                let p = self.charset.next_backslash(rest);
                if k == 0 {
                    break &rest[..p];
                }
                if p >= rest.len() {
                    break &rest[rest.len()..];
                }
                rest = &rest[p + 1..];
                k -= 1;
            }
        } else {
            text
        };
        while seg.first() == Some(&b' ') {
            seg = &seg[1..];
        }
        while seg.last() == Some(&b' ') {
            seg = &seg[..seg.len() - 1];
        }
        seg
    }
}

fn strip_trailing_nuls(mut t: &[u8]) -> &[u8] {
    while t.last() == Some(&b'\0') {
        t = &t[..t.len() - 1];
    }
    t
}

fn trim_text_tail(mut t: &[u8]) -> &[u8] {
    while matches!(t.last(), Some(b' ') | Some(b'\0')) {
        t = &t[..t.len() - 1];
    }
    t
}

fn trim_text_display(t: &[u8]) -> &[u8] {
    let mut t = trim_text_tail(t);
    while t.first() == Some(&b' ') {
        t = &t[1..];
    }
    t
}

fn element_header(n: usize, width: usize) -> (Length, u32) {
    let bytes = n * width;
    debug_assert!(bytes < u32::MAX as usize, "value length out of range");
    (Length(bytes as u32), n as u32)
}

mod element {
    use super::{element_header, Length, Store, Value, C};
    use crate::header::Tag;
    use crate::item::Item;
    use smallvec::smallvec;

    /// Support surface of the element kinds, kept out of the public
    /// interface so that the set stays closed.
    pub trait ElementSupport: Sized + Clone + Default {
        fn wrap(vec: C<Self>) -> Store;
        fn header(n: usize) -> (Length, u32);
        fn slice(store: &Store) -> Option<&[Self]>;
        fn vec_mut(store: &mut Store) -> Option<&mut C<Self>>;

        fn make_store(n: usize) -> Store {
            Self::wrap(smallvec![Self::default(); n])
        }
    }

    macro_rules! impl_element {
        ($t:ty, $variant:ident, $width:expr) => {
            impl ElementSupport for $t {
                fn wrap(vec: C<Self>) -> Store {
                    Store::$variant(vec)
                }
                fn header(n: usize) -> (Length, u32) {
                    element_header(n, $width)
                }
                fn slice(store: &Store) -> Option<&[Self]> {
                    match store {
                        Store::$variant(v) => Some(v),
                        _ => None,
                    }
                }
                fn vec_mut(store: &mut Store) -> Option<&mut C<Self>> {
                    match store {
                        Store::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        };
    }

    impl_element!(i16, Short, 2);
    impl_element!(u16, UShort, 2);
    impl_element!(i32, Int, 4);
    impl_element!(u32, UInt, 4);
    impl_element!(f32, Float, 4);
    impl_element!(f64, Double, 8);
    impl_element!(Tag, Tags, 4);
    impl_element!(Item, Items, 0);
    impl_element!(Value, Values, 0);

    // byte storage keeps its length even, padding with zero
    impl ElementSupport for u8 {
        fn wrap(vec: C<Self>) -> Store {
            Store::Bytes(vec)
        }
        fn header(n: usize) -> (Length, u32) {
            let (vl, _) = element_header(n + (n & 1), 1);
            (vl, n as u32)
        }
        fn slice(store: &Store) -> Option<&[Self]> {
            match store {
                Store::Bytes(v) => Some(v),
                _ => None,
            }
        }
        fn vec_mut(store: &mut Store) -> Option<&mut C<Self>> {
            match store {
                Store::Bytes(v) => Some(v),
                _ => None,
            }
        }
    }
}

use self::element::ElementSupport;

/// Marker for the element kinds accepted by the generic allocation
/// and mutation operations. This trait is sealed: it covers bytes,
/// the six numeric kinds, [`Tag`], [`Item`] and [`Value`] itself,
/// and cannot be implemented outside this crate.
///
/// [`Tag`]: ../header/struct.Tag.html
/// [`Item`]: ../item/struct.Item.html
/// [`Value`]: ./struct.Value.html
pub trait Element: ElementSupport {}

impl<T: ElementSupport> Element for T {}

/// A DICOM attribute value.
///
/// The default-constructed handle is the *invalid* value: it holds
/// nothing, reads as empty or zero through every accessor, and only
/// compares equal to another invalid value. Valid values are created
/// by the construction family ([`new`], [`from_text`], [`from_tags`],
/// …), by pre-sized allocation ([`allocate`]), or by appending
/// ([`append_init`]).
///
/// Cloning a handle shares the payload; mutators clone the payload
/// first whenever it is shared, so a write through one handle is
/// never visible through another.
///
/// [`new`]: #method.new
/// [`from_text`]: #method.from_text
/// [`from_tags`]: #method.from_tags
/// [`allocate`]: #method.allocate
/// [`append_init`]: #method.append_init
#[derive(Debug, Clone, Default)]
pub struct Value {
    v: Option<Rc<ValueData>>,
}

impl Value {
    pub(crate) fn from_data(data: Option<ValueData>) -> Value {
        Value { v: data.map(Rc::new) }
    }

    fn data(&self) -> Option<&ValueData> {
        self.v.as_deref()
    }

    /// Whether this handle refers to an actual value.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.v.is_some()
    }

    /// The value representation, if the handle is valid.
    pub fn vr(&self) -> Option<VR> {
        self.data().map(|d| d.vr)
    }

    /// The byte length of the value content. The length is undefined
    /// while a value is being built by appending or byte resizing,
    /// where the effective size is tracked by the element count.
    /// An invalid handle reports zero.
    pub fn length(&self) -> Length {
        self.data().map_or(Length(0), |d| d.vl)
    }

    /// The number of elements held (the value multiplicity).
    pub fn multiplicity(&self) -> u32 {
        self.data().map_or(0, |d| d.count)
    }

    /// Whether the value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.multiplicity() == 0
    }

    /// The character set attached to this value's text, if any.
    pub fn character_set(&self) -> SpecificCharacterSet {
        self.data().map_or_else(Default::default, |d| d.charset)
    }

    /// The storage kind of this value's elements.
    pub fn store_type(&self) -> StoreType {
        self.data().map_or(StoreType::Empty, |d| d.store.store_type())
    }

    // --- pre-sized allocation, for code that fills storage in place ---

    /// Create a value with `n` default elements of storage,
    /// to be filled through [`data_mut`].
    ///
    /// [`data_mut`]: #method.data_mut
    pub fn allocate<T: Element>(vr: VR, n: usize) -> Value {
        let (vl, count) = T::header(n);
        Value::from_data(Some(ValueData {
            vr,
            charset: SpecificCharacterSet::default(),
            vl,
            count,
            store: T::make_store(n),
        }))
    }

    /// Create a text value with `n` bytes of zeroed storage, to be
    /// filled through [`text_mut`]. An odd `n` gets one padding byte:
    /// a NUL for UI, a space for every other text representation.
    /// The element count starts at one value; call
    /// [`recount_text_values`] after filling the bytes.
    ///
    /// [`text_mut`]: #method.text_mut
    /// [`recount_text_values`]: #method.recount_text_values
    pub fn allocate_text(vr: VR, n: usize) -> Value {
        Value::allocate_text_with_charset(vr, SpecificCharacterSet::default(), n)
    }

    /// Like [`allocate_text`], attaching a character set when the
    /// representation is affected by one.
    ///
    /// [`allocate_text`]: #method.allocate_text
    pub fn allocate_text_with_charset(vr: VR, charset: SpecificCharacterSet, n: usize) -> Value {
        debug_assert!(vr.is_text());
        let mut text: C<u8> = smallvec![0; n];
        if n % 2 != 0 {
            text.push(if vr == VR::UI { 0 } else { b' ' });
        }
        let charset = if vr.has_specific_character_set() {
            charset
        } else {
            SpecificCharacterSet::default()
        };
        Value::from_data(Some(ValueData {
            vr,
            charset,
            vl: Length(text.len() as u32),
            count: (n > 0) as u32,
            store: Store::Text(text),
        }))
    }

    /// Mutable access to the element storage, cloning the payload
    /// first if it is shared. `None` if the handle is invalid or the
    /// storage is of a different kind.
    pub fn data_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        let d = Rc::make_mut(self.v.as_mut()?);
        T::vec_mut(&mut d.store).map(|v| &mut v[..])
    }

    /// Mutable access to the bytes of a text value, padding included.
    pub fn text_mut(&mut self) -> Option<&mut [u8]> {
        let d = Rc::make_mut(self.v.as_mut()?);
        match &mut d.store {
            Store::Text(t) => Some(&mut t[..]),
            _ => None,
        }
    }

    /// Recompute the element count of a text value after its bytes
    /// were filled in place, honoring the attached character set's
    /// separator rules.
    pub fn recount_text_values(&mut self) {
        if let Some(rc) = self.v.as_mut() {
            let d = Rc::make_mut(rc);
            if let Store::Text(t) = &d.store {
                d.count = if t.is_empty() {
                    0
                } else if d.vr.is_long_text() {
                    1
                } else {
                    (1 + d.charset.count_backslashes(t)) as u32
                };
            }
        }
    }

    /// Resize byte (OB/UN) storage in place, zero-filling any growth.
    /// The length becomes undefined and the element count tracks the
    /// byte count. Returns the resized storage.
    pub fn resize_bytes(&mut self, n: usize) -> Option<&mut [u8]> {
        let d = Rc::make_mut(self.v.as_mut()?);
        debug_assert!(matches!(d.vr, VR::OB | VR::UN));
        match &mut d.store {
            Store::Bytes(v) => {
                v.resize(n, 0);
                d.count = n as u32;
                d.vl = Length::UNDEFINED;
                Some(&mut v[..])
            }
            _ => None,
        }
    }

    // --- growth by appending ---

    /// Reset this handle to an empty growable value of the given
    /// representation, ready for [`append`]. The length stays
    /// undefined until the value is finalized by an encoding layer.
    ///
    /// [`append`]: #method.append
    pub fn append_init<T: Element>(&mut self, vr: VR) {
        *self = Value::from_data(Some(ValueData {
            vr,
            charset: SpecificCharacterSet::default(),
            vl: Length::UNDEFINED,
            count: 0,
            store: T::make_store(0),
        }));
    }

    /// Append one element, cloning the payload first if shared.
    /// Appending to an invalid handle or to storage of a different
    /// kind is a programming error and does nothing.
    pub fn append<T: Element>(&mut self, elem: T) {
        let rc = match self.v.as_mut() {
            Some(rc) => rc,
            None => {
                debug_assert!(false, "append on a default-constructed value");
                return;
            }
        };
        let d = Rc::make_mut(rc);
        match T::vec_mut(&mut d.store) {
            Some(v) => {
                v.push(elem);
                d.count = v.len() as u32;
                d.vl = Length::UNDEFINED;
            }
            None => debug_assert!(false, "appended element kind does not match the storage"),
        }
    }

    /// Overwrite the element at index `i`, cloning the payload first
    /// if shared. The index must be within the element count and the
    /// element kind must match the storage; violations are programming
    /// errors and do nothing.
    pub fn set<T: Element>(&mut self, i: usize, elem: T) {
        let rc = match self.v.as_mut() {
            Some(rc) => rc,
            None => {
                debug_assert!(false, "set on a default-constructed value");
                return;
            }
        };
        let d = Rc::make_mut(rc);
        match T::vec_mut(&mut d.store) {
            Some(v) if i < v.len() => v[i] = elem,
            _ => debug_assert!(false, "set out of bounds or of a mismatching element kind"),
        }
    }

    // --- strict typed access ---

    /// The raw bytes of a text value, padding included.
    pub fn text_bytes(&self) -> Result<&[u8], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Text(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "text_bytes",
                got: self.store_type(),
            }),
        }
    }

    /// The stored 16-bit words as signed. For OW values this succeeds
    /// regardless of the stored signedness.
    pub fn int16_slice(&self) -> Result<&[i16], CastValueError> {
        match self.data().map(|d| (&d.store, d.vr)) {
            Some((Store::Short(v), _)) => Ok(v),
            Some((Store::UShort(v), VR::OW)) => Ok(reinterpret_words(v)),
            _ => Err(CastValueError {
                requested: "int16_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored 16-bit words as unsigned. For OW values this
    /// succeeds regardless of the stored signedness.
    pub fn uint16_slice(&self) -> Result<&[u16], CastValueError> {
        match self.data().map(|d| (&d.store, d.vr)) {
            Some((Store::UShort(v), _)) => Ok(v),
            Some((Store::Short(v), VR::OW)) => Ok(reinterpret_words(v)),
            _ => Err(CastValueError {
                requested: "uint16_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored elements as raw bytes, if stored as bytes.
    pub fn uint8_slice(&self) -> Result<&[u8], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Bytes(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "uint8_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored elements as signed 32-bit integers, if stored so.
    pub fn int32_slice(&self) -> Result<&[i32], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Int(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "int32_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored elements as unsigned 32-bit integers, if stored so.
    pub fn uint32_slice(&self) -> Result<&[u32], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::UInt(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "uint32_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored elements as 32-bit floats, if stored so.
    pub fn float32_slice(&self) -> Result<&[f32], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Float(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "float32_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored elements as 64-bit floats, if stored so.
    pub fn float64_slice(&self) -> Result<&[f64], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Double(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "float64_slice",
                got: self.store_type(),
            }),
        }
    }

    /// The stored attribute tags, if stored as tags.
    pub fn tags(&self) -> Result<&[Tag], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Tags(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "tags",
                got: self.store_type(),
            }),
        }
    }

    /// The stored sequence items, if stored as items.
    pub fn items(&self) -> Result<&[Item], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Items(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "items",
                got: self.store_type(),
            }),
        }
    }

    /// The per-instance values of a multiplexed value.
    pub fn multiplex(&self) -> Result<&[Value], CastValueError> {
        match self.data().map(|d| &d.store) {
            Some(Store::Values(v)) => Ok(v),
            _ => Err(CastValueError {
                requested: "multiplex",
                got: self.store_type(),
            }),
        }
    }

    /// Mutable access to the per-instance values of a multiplexed
    /// value, cloning the payload first if shared.
    pub fn multiplex_mut(&mut self) -> Option<&mut [Value]> {
        self.data_mut::<Value>()
    }

    // --- converting access ---

    fn number_at<T>(&self, i: usize) -> T
    where
        T: NumCast + Copy + Default,
    {
        let d = match self.data() {
            Some(d) => d,
            None => return T::default(),
        };
        if i >= d.count as usize {
            debug_assert!(false, "element index past the value multiplicity");
            return T::default();
        }
        match &d.store {
            Store::Text(t) => match d.vr {
                VR::DS => convert::cast_num(deserialize::parse_f64_prefix(d.text_segment(t, i))),
                VR::IS => convert::cast_num(deserialize::parse_i64_prefix(d.text_segment(t, i))),
                _ => T::default(),
            },
            Store::Bytes(v) => convert::cast_num(v[i]),
            Store::Short(v) => convert::cast_num(v[i]),
            Store::UShort(v) => convert::cast_num(v[i]),
            Store::Int(v) => convert::cast_num(v[i]),
            Store::UInt(v) => convert::cast_num(v[i]),
            Store::Float(v) => convert::cast_num(v[i]),
            Store::Double(v) => convert::cast_num(v[i]),
            Store::Tags(v) => convert::cast_num(v[i].group()),
            Store::Items(_) | Store::Values(_) => T::default(),
        }
    }

    /// The element at index `i` converted to a string: text values
    /// yield the trimmed segment (the whole content for ST/LT/UT),
    /// numeric values are formatted, tags render as `(GGGG,EEEE)`.
    /// Text bytes are interpreted as UTF-8, lossily; see [`get_utf8`]
    /// for character set aware access.
    ///
    /// [`get_utf8`]: #method.get_utf8
    pub fn get_string(&self, i: usize) -> String {
        let d = match self.data() {
            Some(d) => d,
            None => return String::new(),
        };
        if i >= d.count as usize {
            debug_assert!(false, "element index past the value multiplicity");
            return String::new();
        }
        match &d.store {
            Store::Text(t) => {
                let seg = if d.vr.is_long_text() {
                    &t[..]
                } else {
                    d.text_segment(t, i)
                };
                String::from_utf8_lossy(strip_trailing_nuls(seg)).into_owned()
            }
            Store::Bytes(v) => v[i].to_string(),
            Store::Short(v) => v[i].to_string(),
            Store::UShort(v) => v[i].to_string(),
            Store::Int(v) => v[i].to_string(),
            Store::UInt(v) => v[i].to_string(),
            Store::Float(v) => serialize::format_f32(v[i]),
            Store::Double(v) => serialize::format_f64(v[i]),
            Store::Tags(v) => v[i].to_string(),
            Store::Items(_) | Store::Values(_) => String::new(),
        }
    }

    /// Like [`get_string`], decoding text through the attached
    /// character set.
    ///
    /// [`get_string`]: #method.get_string
    pub fn get_utf8(&self, i: usize) -> String {
        let d = match self.data() {
            Some(d) => d,
            None => return String::new(),
        };
        match &d.store {
            Store::Text(t) => {
                if i >= d.count as usize {
                    debug_assert!(false, "element index past the value multiplicity");
                    return String::new();
                }
                let seg = if d.vr.is_long_text() {
                    &t[..]
                } else {
                    d.text_segment(t, i)
                };
                d.charset.decode(strip_trailing_nuls(seg)).into_owned()
            }
            _ => self.get_string(i),
        }
    }

    /// The tag at index `i` of an AT value,
    /// or the zero tag for any other value.
    pub fn get_tag(&self, i: usize) -> Tag {
        match self.data().map(|d| &d.store) {
            Some(Store::Tags(v)) => v.get(i).copied().unwrap_or_default(),
            _ => Tag::default(),
        }
    }

    /// The whole value as one string: text content is trimmed of its
    /// trailing padding (kept for ST/LT/UT), numeric elements are
    /// formatted and joined with backslashes. Bulk data (OB, OW, OF,
    /// UN) and sequences yield the empty string.
    pub fn as_string(&self) -> String {
        let d = match self.data() {
            Some(d) => d,
            None => return String::new(),
        };
        match &d.store {
            Store::Text(t) => {
                if d.vr.is_long_text() {
                    String::from_utf8_lossy(t).into_owned()
                } else {
                    String::from_utf8_lossy(trim_text_tail(t)).into_owned()
                }
            }
            Store::Items(_) | Store::Values(_) => String::new(),
            _ if matches!(d.vr, VR::OB | VR::OW | VR::OF | VR::UN | VR::SQ) => String::new(),
            _ => (0..d.count as usize).map(|i| self.get_string(i)).join("\\"),
        }
    }

    /// Like [`as_string`], decoding text through the attached
    /// character set.
    ///
    /// [`as_string`]: #method.as_string
    pub fn as_utf8(&self) -> String {
        let d = match self.data() {
            Some(d) => d,
            None => return String::new(),
        };
        match &d.store {
            Store::Text(t) => {
                if d.vr.is_long_text() {
                    d.charset.decode(t).into_owned()
                } else {
                    d.charset.decode(trim_text_tail(t)).into_owned()
                }
            }
            _ => self.as_string(),
        }
    }

    /// The first tag of an AT value, or the zero tag.
    pub fn as_tag(&self) -> Tag {
        self.get_tag(0)
    }

    // --- bulk extraction ---

    /// Extract elements starting at index `start` into `out`,
    /// converting each to the output type. Text elements are
    /// re-parsed when the representation is numeric (DS, IS) and
    /// degrade to zero otherwise; tags are flattened into group and
    /// element words, with `start` counted in tags.
    pub fn get_values_into<T>(&self, out: &mut [T], start: usize)
    where
        T: NumCast + Copy + Default,
    {
        let d = match self.data() {
            Some(d) => d,
            None => {
                for slot in out.iter_mut() {
                    *slot = T::default();
                }
                return;
            }
        };
        match &d.store {
            Store::Text(t) => {
                debug_assert!(start + out.len() <= d.count as usize);
                for (k, slot) in out.iter_mut().enumerate() {
                    let seg = d.text_segment(t, start + k);
                    *slot = match d.vr {
                        VR::DS => convert::cast_num(deserialize::parse_f64_prefix(seg)),
                        VR::IS => convert::cast_num(deserialize::parse_i64_prefix(seg)),
                        _ => T::default(),
                    };
                }
            }
            Store::Bytes(v) => copy_cast(v, out, start),
            Store::Short(v) => copy_cast(v, out, start),
            Store::UShort(v) => copy_cast(v, out, start),
            Store::Int(v) => copy_cast(v, out, start),
            Store::UInt(v) => copy_cast(v, out, start),
            Store::Float(v) => copy_cast(v, out, start),
            Store::Double(v) => copy_cast(v, out, start),
            Store::Tags(v) => {
                debug_assert!(start + (out.len() + 1) / 2 <= v.len());
                for (k, slot) in out.iter_mut().enumerate() {
                    let t = v.get(start + k / 2).copied().unwrap_or_default();
                    *slot = convert::cast_num(if k % 2 == 0 { t.group() } else { t.element() });
                }
            }
            Store::Items(_) | Store::Values(_) => {
                for slot in out.iter_mut() {
                    *slot = T::default();
                }
            }
        }
    }

    /// Extract elements starting at index `start` into `out`,
    /// each converted to a string as by [`get_string`].
    ///
    /// [`get_string`]: #method.get_string
    pub fn get_strings_into(&self, out: &mut [String], start: usize) {
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.get_string(start + k);
        }
    }

    /// Extract the tags of an AT value starting at index `start`;
    /// any other value fills `out` with zero tags.
    pub fn get_tags_into(&self, out: &mut [Tag], start: usize) {
        match self.data().map(|d| &d.store) {
            Some(Store::Tags(v)) => {
                for (k, slot) in out.iter_mut().enumerate() {
                    *slot = v.get(start + k).copied().unwrap_or_default();
                }
            }
            _ => {
                for slot in out.iter_mut() {
                    *slot = Tag::default();
                }
            }
        }
    }
}

fn copy_cast<S, T>(src: &[S], out: &mut [T], start: usize)
where
    S: Copy + num_traits::ToPrimitive,
    T: NumCast + Copy + Default,
{
    debug_assert!(start + out.len() <= src.len());
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = src
            .get(start + k)
            .copied()
            .map_or_else(T::default, convert::cast_num);
    }
}

/// Both 16-bit word interpretations are layout compatible,
/// so the view conversion cannot fail.
fn reinterpret_words<'a, S, T>(v: &'a [S]) -> &'a [T]
where
    S: safe_transmute::TriviallyTransmutable,
    T: safe_transmute::TriviallyTransmutable,
{
    if v.is_empty() {
        return &[];
    }
    safe_transmute::transmute_many_pedantic(safe_transmute::transmute_to_bytes(v)).unwrap_or(&[])
}

macro_rules! impl_numeric_getters {
    ($get:ident, $as:ident, $t:ty, $name:literal) => {
        impl Value {
            #[doc = "The element at index `i` converted to "]
            #[doc = $name]
            #[doc = ", degrading to zero when the index is out of"]
            #[doc = " bounds, the conversion leaves the domain, or the"]
            #[doc = " storage does not convert to numbers."]
            pub fn $get(&self, i: usize) -> $t {
                self.number_at(i)
            }

            #[doc = "The first element converted to "]
            #[doc = $name]
            #[doc = ", or zero for an empty value."]
            pub fn $as(&self) -> $t {
                if self.multiplicity() >= 1 {
                    self.number_at(0)
                } else {
                    <$t>::default()
                }
            }
        }
    };
}

impl_numeric_getters!(get_uint8, as_uint8, u8, "an unsigned byte");
impl_numeric_getters!(get_int16, as_int16, i16, "a signed 16-bit integer");
impl_numeric_getters!(get_uint16, as_uint16, u16, "an unsigned 16-bit integer");
impl_numeric_getters!(get_int32, as_int32, i32, "a signed 32-bit integer");
impl_numeric_getters!(get_uint32, as_uint32, u32, "an unsigned 32-bit integer");
impl_numeric_getters!(get_float32, as_float32, f32, "a 32-bit float");
impl_numeric_getters!(get_float64, as_float64, f64, "a 64-bit float");

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (&self.v, &other.v) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.vr == b.vr
                        && a.vl.inner_eq(b.vl)
                        && a.count == b.count
                        && a.store == b.store)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let d = match self.data() {
            Some(d) => d,
            None => return f.write_str("empty[0]"),
        };
        let n = d.count;
        if d.vr == VR::UN {
            return write!(f, "unknown[{}]", n);
        }
        if d.vr.is_long_text() {
            return write!(f, "text[{}]", d.vl);
        }
        if let Store::Text(t) = &d.store {
            return f.write_str(&d.charset.decode(trim_text_display(t)));
        }
        if let Store::Tags(v) = &d.store {
            return f.write_str(&v.iter().join(","));
        }
        match (&d.store, d.vr) {
            (_, VR::SQ) => write!(f, "items[{}]", n),
            (_, VR::OB) => write!(f, "bytes[{}]", n),
            (_, VR::OW) => write!(f, "words[{}]", n),
            (_, VR::OF) => write!(f, "floats[{}]", n),
            (Store::Values(_), _) => write!(f, "values[{}]", n),
            _ => {
                let shown = n.min(16) as usize;
                let body = (0..shown).map(|i| self.get_utf8(i)).join(",");
                if n > 16 {
                    write!(f, "{},...", body)
                } else {
                    f.write_str(&body)
                }
            }
        }
    }
}
