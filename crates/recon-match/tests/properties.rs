//! Laws the three matching modes must obey for arbitrary inputs.

use proptest::prelude::*;

use recon_match::{HeaderMatcher, partial_ratio, ratio};
use recon_model::{AutoMatching, ExpectedHeader};

fn header_text() -> impl Strategy<Value = String> {
    "[a-zA-Z _]{1,14}"
}

fn candidates() -> impl Strategy<Value = Vec<ExpectedHeader>> {
    prop::collection::vec(
        (header_text(), prop::collection::vec(header_text(), 0..3)),
        1..5,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (name, aliases))| {
                ExpectedHeader::new(format!("{name}{idx}")).with_aliases(aliases)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn exact_matches_iff_some_alias_is_equal_ignoring_case(
        source in header_text(),
        headers in candidates(),
    ) {
        let matcher = HeaderMatcher::new(AutoMatching::Exact);
        let lowered = source.to_lowercase();
        let expected = headers
            .iter()
            .find(|h| h.aliases().iter().any(|a| a.to_lowercase() == lowered))
            .map(ExpectedHeader::name);
        prop_assert_eq!(matcher.find_match(&source, &headers).map(ExpectedHeader::name), expected);
    }

    #[test]
    fn lenient_accepts_everything_strict_accepts(
        source in header_text(),
        headers in candidates(),
    ) {
        let strict = HeaderMatcher::new(AutoMatching::Strict);
        let lenient = HeaderMatcher::new(AutoMatching::Lenient);
        for header in &headers {
            if strict.matches(&source, header) {
                prop_assert!(lenient.matches(&source, header));
            }
        }
        if strict.find_match(&source, &headers).is_some() {
            prop_assert!(lenient.find_match(&source, &headers).is_some());
        }
    }

    #[test]
    fn strict_only_matches_above_ninety(
        source in header_text(),
        headers in candidates(),
    ) {
        let matcher = HeaderMatcher::new(AutoMatching::Strict);
        if let Some(hit) = matcher.find_match(&source, &headers) {
            let lowered = source.to_lowercase();
            prop_assert!(hit.aliases().iter().any(|a| ratio(&a.to_lowercase(), &lowered) > 90));
        }
    }

    #[test]
    fn matching_is_deterministic(
        source in header_text(),
        headers in candidates(),
    ) {
        for mode in AutoMatching::ALL {
            let matcher = HeaderMatcher::new(mode);
            let first = matcher.find_match(&source, &headers).map(ExpectedHeader::name);
            let second = matcher.find_match(&source, &headers).map(ExpectedHeader::name);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn ratios_are_symmetric(a in header_text(), b in header_text()) {
        prop_assert_eq!(ratio(&a, &b), ratio(&b, &a));
        prop_assert_eq!(partial_ratio(&a, &b), partial_ratio(&b, &a));
    }
}

#[test]
fn contact_header_scenarios() {
    let headers = vec![
        ExpectedHeader::new("FirstName")
            .with_aliases(["FirstName", "First Name"])
            .required(true),
        ExpectedHeader::new("Email").with_aliases(["Email"]),
    ];

    let strict = HeaderMatcher::new(AutoMatching::Strict);
    assert_eq!(
        strict.find_match("first name", &headers).map(ExpectedHeader::name),
        Some("FirstName")
    );
    assert_eq!(
        strict.find_match("email", &headers).map(ExpectedHeader::name),
        Some("Email")
    );
    assert!(strict.find_match("fname", &headers).is_none());

    let lenient = HeaderMatcher::new(AutoMatching::Lenient);
    assert!(strict.find_match("first", &headers).is_none());
    assert_eq!(
        lenient.find_match("first", &headers).map(ExpectedHeader::name),
        Some("FirstName")
    );
}
