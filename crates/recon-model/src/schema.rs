//! Expected headers generated from a record type's fields.

use std::collections::BTreeSet;

use crate::header::ExpectedHeader;

/// Describes the writable fields of a target record type.
///
/// Implemented next to the record type, usually by listing the serde field
/// names:
///
/// ```
/// use recon_model::RecordSchema;
///
/// struct Contact {
///     first_name: String,
///     email: Option<String>,
/// }
///
/// impl RecordSchema for Contact {
///     fn writable_fields() -> Vec<String> {
///         vec!["first_name".into(), "email".into()]
///     }
/// }
/// ```
pub trait RecordSchema {
    fn writable_fields() -> Vec<String>;
}

/// One optional expected header per writable field of `T`.
///
/// Field names that differ only by case collapse to the first one seen.
pub fn expected_headers_from_schema<T: RecordSchema>() -> Vec<ExpectedHeader> {
    let mut seen = BTreeSet::new();
    T::writable_fields()
        .into_iter()
        .filter(|field| !field.trim().is_empty())
        .filter(|field| seen.insert(field.to_lowercase()))
        .map(ExpectedHeader::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person;

    impl RecordSchema for Person {
        fn writable_fields() -> Vec<String> {
            vec![
                "Name".to_string(),
                "Email".to_string(),
                "name".to_string(),
                String::new(),
            ]
        }
    }

    #[test]
    fn generates_one_header_per_field() {
        let headers = expected_headers_from_schema::<Person>();
        let names: Vec<&str> = headers.iter().map(ExpectedHeader::name).collect();
        assert_eq!(names, vec!["Name", "Email"]);
        assert!(headers.iter().all(|h| !h.is_required()));
    }
}
