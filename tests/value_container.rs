//! Exercise the value containers through the public API only,
//! as a dependent crate would use them.

use dicom_value::value::StoreType;
use dicom_value::{Item, Length, SpecificCharacterSet, Tag, Value, VR};

#[test]
fn build_and_read_a_small_data_set() {
    let mut item = Item::new();
    item.put(Tag(0x0008, 0x0018), Value::from_text(VR::UI, "1.2.840.10008.1"));
    item.put(Tag(0x0008, 0x0060), Value::from_text(VR::CS, "MR"));
    item.put(Tag(0x0028, 0x0030), Value::new(VR::DS, &[0.5f64, 0.5]));
    item.put(Tag(0x0028, 0x0010), Value::new(VR::US, &[512u16]));

    let rows = item.get(Tag(0x0028, 0x0010)).expect("rows present");
    assert_eq!(rows.as_int32(), 512);

    let spacing = item.get(Tag(0x0028, 0x0030)).expect("spacing present");
    assert_eq!(spacing.multiplicity(), 2);
    assert_eq!(spacing.as_string(), "0.5\\0.5");
    assert_eq!(spacing.get_float64(1), 0.5);

    let mut seq = Value::allocate::<Item>(VR::SQ, 1);
    seq.data_mut::<Item>().expect("item storage")[0] = item.clone();
    assert_eq!(seq.to_string(), "items[1]");
    assert_eq!(
        seq.items().expect("items")[0]
            .get(Tag(0x0008, 0x0060))
            .map(|v| v.as_string()),
        Some("MR".to_string())
    );
}

#[test]
fn values_shared_between_items_stay_isolated() {
    let shared = Value::from_text(VR::CS, "ORIGINAL\\PRIMARY");
    let mut a = Item::new();
    a.put(Tag(0x0008, 0x0008), shared.clone());
    let mut b = Item::new();
    b.put(Tag(0x0008, 0x0008), shared.clone());
    assert_eq!(a, b);

    b.put(Tag(0x0008, 0x0008), Value::from_text(VR::CS, "DERIVED\\SECONDARY"));
    assert_ne!(a, b);
    assert_eq!(
        a.get(Tag(0x0008, 0x0008)).map(|v| v.get_string(0)),
        Some("ORIGINAL".to_string())
    );
}

#[test]
fn growing_pixel_data_bytes() {
    let mut fragment = Value::default();
    fragment.append_init::<u8>(VR::OB);
    for chunk in [&b"ab"[..], &b"cde"[..]] {
        for b in chunk {
            fragment.append(*b);
        }
    }
    assert_eq!(fragment.multiplicity(), 5);
    assert!(fragment.length().is_undefined());
    assert_eq!(fragment.uint8_slice().expect("byte storage"), b"abcde");
    assert_eq!(fragment.to_string(), "bytes[5]");
}

#[test]
fn parser_style_allocation_round_trip() {
    // a parser pre-allocates, writes the wire bytes, then recounts
    let payload = b"DERIVED\\SECONDARY\\OTHER";
    let mut v = Value::allocate_text_with_charset(
        VR::CS,
        SpecificCharacterSet::IsoIr6,
        payload.len(),
    );
    assert!(v.length().inner_eq(Length(24)));
    v.text_mut().expect("text storage")[..payload.len()].copy_from_slice(payload);
    v.recount_text_values();
    assert_eq!(v.multiplicity(), 3);
    assert_eq!(v.get_string(2), "OTHER");
    assert_eq!(v.store_type(), StoreType::Text);
}
