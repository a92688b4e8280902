//! # Composite Keys
//!
//! Several record kinds share one keyspace. Composite keys namespace them
//! with the platform's encoding: a U+0000 prefix, the object type, then each
//! attribute, every component terminated by U+0000:
//!
//! ```text
//! ("Shipment", ["Location", "1003"])  →  "\0Shipment\0Location\01003\0"
//! ("Shipment", ["1003"])              →  "\0Shipment\01003\0"
//! ("BillOfLading", ["1003"])          →  "\0BillOfLading\01003\0"
//! ```
//!
//! Because every component is terminated and components may not contain
//! U+0000, the encoding is injective. The leading U+0000 keeps composite keys
//! out of plain range scans, which only cover simple keys.

use tfc_core::LedgerError;

const DELIMITER: char = '\u{0}';
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Build a composite key from an object type and its attributes.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidCompositeKey`] if any component contains
/// U+0000 or U+10FFFF.
pub fn composite_key(object_type: &str, attributes: &[&str]) -> Result<String, LedgerError> {
    validate_component(object_type)?;
    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(DELIMITER);
    key.push_str(object_type);
    key.push(DELIMITER);
    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(DELIMITER);
    }
    Ok(key)
}

/// Split a composite key back into its object type and attributes.
///
/// Returns `None` for simple keys.
pub fn split_composite_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let body = key.strip_prefix(DELIMITER)?.strip_suffix(DELIMITER)?;
    let mut parts = body.split(DELIMITER);
    let object_type = parts.next()?;
    Some((object_type, parts.collect()))
}

/// Whether the key is in the composite namespace.
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(DELIMITER)
}

fn validate_component(component: &str) -> Result<(), LedgerError> {
    if component.contains(DELIMITER) || component.contains(MAX_UNICODE_RUNE) {
        return Err(LedgerError::InvalidCompositeKey(component.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding() {
        assert_eq!(
            composite_key("Shipment", &["Location", "1003"]).unwrap(),
            "\u{0}Shipment\u{0}Location\u{0}1003\u{0}"
        );
        assert_eq!(
            composite_key("BillOfLading", &["1003"]).unwrap(),
            "\u{0}BillOfLading\u{0}1003\u{0}"
        );
    }

    #[test]
    fn test_shipment_namespaces_do_not_collide() {
        let shipment = composite_key("Shipment", &["1003"]).unwrap();
        let location = composite_key("Shipment", &["Location", "1003"]).unwrap();
        let bill = composite_key("BillOfLading", &["1003"]).unwrap();
        assert_ne!(shipment, location);
        assert_ne!(shipment, bill);
        assert_ne!(location, bill);

        // A trade literally named "Location" still differs from any location key.
        let odd = composite_key("Shipment", &["Location"]).unwrap();
        assert_ne!(odd, location);
    }

    #[test]
    fn test_split_roundtrip() {
        let key = composite_key("Shipment", &["Location", "7"]).unwrap();
        let (object_type, attrs) = split_composite_key(&key).unwrap();
        assert_eq!(object_type, "Shipment");
        assert_eq!(attrs, vec!["Location", "7"]);
        assert!(split_composite_key("1003").is_none());
    }

    #[test]
    fn test_reserved_code_points_rejected() {
        assert!(matches!(
            composite_key("Shipment", &["a\u{0}b"]),
            Err(LedgerError::InvalidCompositeKey(_))
        ));
        assert!(composite_key("Ship\u{10FFFF}", &[]).is_err());
    }

    #[test]
    fn test_is_composite() {
        assert!(is_composite_key(&composite_key("Shipment", &["1"]).unwrap()));
        assert!(!is_composite_key("1003"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn distinct_attributes_give_distinct_keys(
                a in proptest::collection::vec("[A-Za-z0-9]{0,6}", 0..4),
                b in proptest::collection::vec("[A-Za-z0-9]{0,6}", 0..4),
            ) {
                let ka = composite_key("Shipment", &a.iter().map(String::as_str).collect::<Vec<_>>()).unwrap();
                let kb = composite_key("Shipment", &b.iter().map(String::as_str).collect::<Vec<_>>()).unwrap();
                prop_assert_eq!(ka == kb, a == b);
                prop_assert!(is_composite_key(&ka));
            }
        }
    }
}
