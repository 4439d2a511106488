//! A nested data set item, the element type of sequence (SQ) values.

use crate::header::Tag;
use crate::value::Value;

/// An item of a sequence value: an ordered set of attributes,
/// sorted by tag. Putting a value under a tag that is already
/// present replaces the previous value.
///
/// This type carries no parsing or encoding logic of its own;
/// it only gives sequence values something to hold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    entries: Vec<(Tag, Value)>,
}

impl Item {
    /// Create an empty item.
    pub fn new() -> Self {
        Item::default()
    }

    /// Create an empty item with space reserved for `n` attributes.
    pub fn with_capacity(n: usize) -> Self {
        Item {
            entries: Vec::with_capacity(n),
        }
    }

    /// Insert an attribute, replacing any previous value at the same tag.
    pub fn put(&mut self, tag: Tag, value: Value) {
        match self.entries.binary_search_by_key(&tag.key(), |(t, _)| t.key()) {
            Ok(i) => self.entries[i].1 = value,
            Err(i) => self.entries.insert(i, (tag, value)),
        }
    }

    /// Look up the value stored at the given tag.
    pub fn get(&self, tag: Tag) -> Option<&Value> {
        self.entries
            .binary_search_by_key(&tag.key(), |(t, _)| t.key())
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// Iterate over the attributes in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &(Tag, Value)> {
        self.entries.iter()
    }

    /// The number of attributes in the item.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the item holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vr::VR;

    #[test]
    fn put_get_replace() {
        let mut item = Item::new();
        item.put(Tag(0x0008, 0x0060), Value::from_text(VR::CS, "MR"));
        item.put(Tag(0x0008, 0x0018), Value::from_text(VR::UI, "1.2.3.4"));
        assert_eq!(item.len(), 2);
        assert_eq!(
            item.get(Tag(0x0008, 0x0060)).map(|v| v.as_string()),
            Some("MR".to_string())
        );
        assert_eq!(item.get(Tag(0x0010, 0x0010)), None);

        item.put(Tag(0x0008, 0x0060), Value::from_text(VR::CS, "CT"));
        assert_eq!(item.len(), 2);
        assert_eq!(
            item.get(Tag(0x0008, 0x0060)).map(|v| v.as_string()),
            Some("CT".to_string())
        );
    }

    #[test]
    fn kept_in_tag_order() {
        let mut item = Item::with_capacity(3);
        item.put(Tag(0x0010, 0x0010), Value::from_text(VR::PN, "Doe^John"));
        item.put(Tag(0x0008, 0x0018), Value::from_text(VR::UI, "1.2"));
        let tags: Vec<Tag> = item.iter().map(|(t, _)| *t).collect();
        assert_eq!(tags, vec![Tag(0x0008, 0x0018), Tag(0x0010, 0x0010)]);
    }

    #[test]
    fn structural_equality() {
        let mut a = Item::new();
        a.put(Tag(0x0008, 0x0018), Value::from_text(VR::UI, "1.2"));
        let mut b = Item::new();
        b.put(Tag(0x0008, 0x0018), Value::from_text(VR::UI, "1.2"));
        assert_eq!(a, b);
        b.put(Tag(0x0008, 0x0018), Value::from_text(VR::UI, "1.3"));
        assert_ne!(a, b);
    }
}
