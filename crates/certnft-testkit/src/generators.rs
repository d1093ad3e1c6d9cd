//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use certnft::ImageUpload;
use certnft_core::{CertificateFields, OwnerAddress};

/// Generate a well-formed owner address.
pub fn owner_address() -> impl Strategy<Value = OwnerAddress> {
    any::<[u8; 20]>().prop_map(|bytes| {
        OwnerAddress::parse(&format!("0x{}", hex::encode(bytes))).expect("well-formed address")
    })
}

/// Generate a non-blank display name.
pub fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .'-]{0,39}".prop_map(String::from)
}

/// Generate certificate text fields.
pub fn certificate_fields() -> impl Strategy<Value = CertificateFields> {
    (name(), name(), ".{0,80}")
        .prop_map(|(recipient, course, description)| {
            CertificateFields::new(recipient, course, description)
        })
}

/// Generate a filename hint, including awkward ones.
pub fn filename() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,12}\\.(png|jpg|svg)".prop_map(String::from),
        ".{1,24}".prop_map(String::from),
    ]
}

/// Generate a non-empty image upload of at most `max_len` bytes.
pub fn image(max_len: usize) -> impl Strategy<Value = ImageUpload> {
    (
        filename(),
        prop::collection::vec(any::<u8>(), 1..=max_len.max(1)),
    )
        .prop_map(|(filename, bytes)| ImageUpload::new(filename, Bytes::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_generated_addresses_parse(addr in owner_address()) {
            let reparsed = OwnerAddress::parse(addr.as_str()).unwrap();
            prop_assert_eq!(reparsed, addr);
        }

        #[test]
        fn test_generated_names_not_blank(n in name()) {
            prop_assert!(!n.trim().is_empty());
        }

        #[test]
        fn test_generated_images_not_empty(img in image(64)) {
            prop_assert!(!img.bytes.is_empty());
            prop_assert!(img.bytes.len() <= 64);
        }
    }
}
