//! Mode-driven matching of one source header against candidate headers.

use std::cmp::Reverse;

use recon_model::{AutoMatching, ExpectedHeader};

use crate::score::{
    LENIENT_PARTIAL_THRESHOLD, LENIENT_RATIO_THRESHOLD, STRICT_RATIO_THRESHOLD, partial_ratio,
    ratio,
};

/// Scores of one source header against one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    /// The alias that was compared.
    pub alias: String,
    /// Full-string ratio, 0 to 100.
    pub ratio: u8,
    /// Partial ratio, 0 to 100.
    pub partial_ratio: u8,
    /// Whether the pair matches under the matcher's mode.
    pub matched: bool,
}

impl MatchScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        format!(
            "'{}': ratio {}%; partial {}%{}",
            self.alias,
            self.ratio,
            self.partial_ratio,
            if self.matched { " (match)" } else { "" }
        )
    }
}

/// A ranked candidate for a source header.
#[derive(Debug, Clone)]
pub struct Suggestion<'a> {
    pub header: &'a ExpectedHeader,
    pub score: MatchScore,
}

/// Applies one [`AutoMatching`] mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderMatcher {
    mode: AutoMatching,
}

impl HeaderMatcher {
    pub fn new(mode: AutoMatching) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AutoMatching {
        self.mode
    }

    /// First candidate with an alias that matches `source`.
    ///
    /// Candidates are tried in iteration order and never compared against
    /// each other, so a later candidate with a higher score does not win.
    pub fn find_match<'a, I>(&self, source: &str, candidates: I) -> Option<&'a ExpectedHeader>
    where
        I: IntoIterator<Item = &'a ExpectedHeader>,
    {
        let source = source.to_lowercase();
        let found = candidates
            .into_iter()
            .find(|header| header.aliases().iter().any(|alias| self.alias_matches(&source, alias)));
        if let Some(header) = found {
            tracing::trace!(
                source = %source,
                expected = %header.name(),
                mode = %self.mode,
                "header matched"
            );
        }
        found
    }

    /// True when any alias of `header` matches `source`.
    pub fn matches(&self, source: &str, header: &ExpectedHeader) -> bool {
        let source = source.to_lowercase();
        header
            .aliases()
            .iter()
            .any(|alias| self.alias_matches(&source, alias))
    }

    /// Score of `source` against the best alias of `header`.
    ///
    /// The first matching alias is reported when there is one, otherwise
    /// the alias with the highest scores. `None` only for a header without
    /// aliases.
    pub fn explain(&self, source: &str, header: &ExpectedHeader) -> Option<MatchScore> {
        let source = source.to_lowercase();
        let mut best: Option<MatchScore> = None;
        for alias in header.aliases() {
            let lowered = alias.to_lowercase();
            let score = MatchScore {
                alias: alias.clone(),
                ratio: ratio(&lowered, &source),
                partial_ratio: partial_ratio(&lowered, &source),
                matched: self.alias_matches(&source, alias),
            };
            if score.matched {
                return Some(score);
            }
            let better = best
                .as_ref()
                .is_none_or(|b| (score.ratio, score.partial_ratio) > (b.ratio, b.partial_ratio));
            if better {
                best = Some(score);
            }
        }
        best
    }

    /// Rank every candidate for `source`, best first.
    ///
    /// Matches sort ahead of non-matches, then by ratio and partial ratio.
    /// Equal scores keep iteration order.
    pub fn suggest<'a, I>(&self, source: &str, candidates: I) -> Vec<Suggestion<'a>>
    where
        I: IntoIterator<Item = &'a ExpectedHeader>,
    {
        let mut ranked: Vec<Suggestion<'a>> = candidates
            .into_iter()
            .filter_map(|header| {
                self.explain(source, header)
                    .map(|score| Suggestion { header, score })
            })
            .collect();
        ranked.sort_by_key(|s| {
            Reverse((s.score.matched, s.score.ratio, s.score.partial_ratio))
        });
        ranked
    }

    /// `source` must already be lower-cased.
    fn alias_matches(&self, source: &str, alias: &str) -> bool {
        let alias = alias.to_lowercase();
        match self.mode {
            AutoMatching::Exact => alias == source,
            AutoMatching::Strict => ratio(&alias, source) > STRICT_RATIO_THRESHOLD,
            AutoMatching::Lenient => {
                let full = ratio(&alias, source);
                full > STRICT_RATIO_THRESHOLD
                    || (full > LENIENT_RATIO_THRESHOLD
                        && partial_ratio(&alias, source) > LENIENT_PARTIAL_THRESHOLD)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_headers() -> Vec<ExpectedHeader> {
        vec![
            ExpectedHeader::new("FirstName")
                .with_aliases(["First Name"])
                .required(true),
            ExpectedHeader::new("Email"),
        ]
    }

    #[test]
    fn exact_ignores_case_only() {
        let headers = contact_headers();
        let matcher = HeaderMatcher::new(AutoMatching::Exact);
        assert_eq!(
            matcher.find_match("FIRST NAME", &headers).map(ExpectedHeader::name),
            Some("FirstName")
        );
        assert!(matcher.find_match("first nme", &headers).is_none());
        assert!(matcher.find_match("first", &headers).is_none());
    }

    #[test]
    fn strict_accepts_close_spelling() {
        let headers = contact_headers();
        let matcher = HeaderMatcher::new(AutoMatching::Strict);
        assert_eq!(
            matcher.find_match("first name", &headers).map(ExpectedHeader::name),
            Some("FirstName")
        );
        assert_eq!(
            matcher.find_match("first nme", &headers).map(ExpectedHeader::name),
            Some("FirstName")
        );
        assert_eq!(
            matcher.find_match("email", &headers).map(ExpectedHeader::name),
            Some("Email")
        );
        assert!(matcher.find_match("fname", &headers).is_none());
    }

    #[test]
    fn lenient_accepts_strong_substring() {
        let headers = contact_headers();
        assert!(
            HeaderMatcher::new(AutoMatching::Strict)
                .find_match("first", &headers)
                .is_none()
        );
        assert_eq!(
            HeaderMatcher::new(AutoMatching::Lenient)
                .find_match("first", &headers)
                .map(ExpectedHeader::name),
            Some("FirstName")
        );
    }

    #[test]
    fn iteration_order_breaks_ties() {
        let headers = vec![ExpectedHeader::new("Mail"), ExpectedHeader::new("Email")];
        let matcher = HeaderMatcher::new(AutoMatching::Lenient);
        // "email" is an exact hit on the second candidate, but the first
        // candidate already satisfies the lenient rule.
        assert_eq!(
            matcher.find_match("email", &headers).map(ExpectedHeader::name),
            Some("Mail")
        );
        let reversed: Vec<ExpectedHeader> = headers.into_iter().rev().collect();
        assert_eq!(
            matcher.find_match("email", &reversed).map(ExpectedHeader::name),
            Some("Email")
        );
    }

    #[test]
    fn explain_reports_matching_alias() {
        let headers = contact_headers();
        let matcher = HeaderMatcher::new(AutoMatching::Lenient);
        let score = matcher.explain("first", &headers[0]).unwrap();
        assert!(score.matched);
        assert_eq!(score.partial_ratio, 100);
        assert!(score.explain().contains("(match)"));
    }

    #[test]
    fn suggest_ranks_best_first() {
        let headers = vec![
            ExpectedHeader::new("Phone"),
            ExpectedHeader::new("Email"),
            ExpectedHeader::new("EmailAddress"),
        ];
        let matcher = HeaderMatcher::new(AutoMatching::Strict);
        let ranked = matcher.suggest("e-mail", &headers);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].header.name(), "Email");
        assert_eq!(ranked[2].header.name(), "Phone");
    }
}
