#![crate_type = "lib"]
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This library implements the in-memory containers for DICOM
//! attribute values: reference counted, copy-on-write, and typed by
//! value representation.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the attribute tag and the value length
//!   types used to address and size value content.
//! - [`vr`] holds the value representation enumeration and the
//!   storage-related queries over it.
//! - [`charset`] carries the character set surface needed by text
//!   values: decoding to UTF-8 and separator scanning.
//! - [`item`] defines the nested data set item held by sequence
//!   values.
//! - [`value`] is the value container itself, with construction,
//!   conversion, growth, typed access, equality and rendering.
//!
//! [`charset`]: ./charset/index.html
//! [`header`]: ./header/index.html
//! [`item`]: ./item/index.html
//! [`value`]: ./value/index.html
//! [`vr`]: ./vr/index.html

pub mod charset;
pub mod header;
pub mod item;
pub mod value;
pub mod vr;

pub use charset::SpecificCharacterSet;
pub use header::{Length, Tag};
pub use item::Item;
pub use value::{CastValueError, Value};
pub use vr::VR;

// re-export crates that are part of the public API
pub use smallvec;
