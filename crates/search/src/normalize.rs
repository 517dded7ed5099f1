//! Text and location normalization.
//!
//! Both functions are total: `None`, empty and whitespace-only input map to
//! the empty string, and the same input always yields the same output.

use crate::error::{Result, SearchError};
use jobboard_core::config::{default_metros, MetroRule};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Built-in metro table, compiled once.
static DEFAULT_TABLE: Lazy<MetroTable> = Lazy::new(|| {
    MetroTable::from_rules(&default_metros()).unwrap_or_else(|err| {
        tracing::error!(error = %err, "Built-in metro table failed to compile");
        MetroTable::empty()
    })
});

/// Trim and lower-case free text.
///
/// # Example
/// ```
/// use jobboard_search::normalize_text;
///
/// assert_eq!(normalize_text(Some("  Senior Engineer ")), "senior engineer");
/// assert_eq!(normalize_text(None), "");
/// ```
pub fn normalize_text(s: Option<&str>) -> String {
    match s {
        Some(s) => s.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Canonicalize a location using the built-in metro table.
///
/// Returns `"remote"`, `"new york"`, `"san francisco"` or `"toronto"` when the
/// location falls in one of those buckets, otherwise the normalized text.
///
/// # Example
/// ```
/// use jobboard_search::normalize_location;
///
/// assert_eq!(normalize_location(Some("Brooklyn, NY")), "new york");
/// assert_eq!(normalize_location(Some("Austin, TX")), "austin, tx");
/// ```
pub fn normalize_location(s: Option<&str>) -> String {
    MetroTable::builtin().canonicalize(s)
}

#[derive(Debug, Clone)]
struct CompiledMetro {
    label: String,
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl CompiledMetro {
    fn matches(&self, location: &str) -> bool {
        self.keywords.iter().any(|k| location.contains(k.as_str()))
            || self.patterns.iter().any(|p| p.is_match(location))
    }
}

/// Ordered lookup table mapping raw locations to metro buckets.
///
/// Rules are checked in order and the first match wins; there is no scoring.
#[derive(Debug, Clone)]
pub struct MetroTable {
    rules: Vec<CompiledMetro>,
}

impl MetroTable {
    /// A table with no rules; every location passes through.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in table (remote, new york, san francisco, toronto).
    pub fn builtin() -> &'static MetroTable {
        &DEFAULT_TABLE
    }

    /// Compile a table from configuration rules.
    ///
    /// Keywords are lower-cased and blank keywords dropped. Patterns compile
    /// case-insensitively; the first one that fails aborts the build.
    pub fn from_rules(rules: &[MetroRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let keywords = rule
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();

                let patterns = rule
                    .patterns
                    .iter()
                    .map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(true)
                            .build()
                            .map_err(|source| SearchError::InvalidPattern {
                                label: rule.label.clone(),
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(CompiledMetro {
                    label: rule.label.trim().to_lowercase(),
                    keywords,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Labels in priority order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.label.as_str())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Map a location to its metro label, or to its normalized text.
    pub fn canonicalize(&self, s: Option<&str>) -> String {
        let normalized = normalize_text(s);
        if normalized.is_empty() {
            return normalized;
        }

        match self.rules.iter().find(|rule| rule.matches(&normalized)) {
            Some(rule) => rule.label.clone(),
            None => normalized,
        }
    }
}

impl Default for MetroTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_text_basic() {
        assert_eq!(normalize_text(Some("  Staff ENGINEER\t")), "staff engineer");
    }

    #[test]
    fn test_normalize_text_empty_inputs() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(Some("")), "");
        assert_eq!(normalize_text(Some("   ")), "");
    }

    #[test]
    fn test_location_remote() {
        assert_eq!(normalize_location(Some("Remote - WFH OK")), "remote");
        assert_eq!(normalize_location(Some("Work from home")), "remote");
        assert_eq!(normalize_location(Some("Distributed team (US)")), "remote");
    }

    #[test]
    fn test_location_new_york() {
        assert_eq!(normalize_location(Some("Brooklyn, NY")), "new york");
        assert_eq!(normalize_location(Some("NYC")), "new york");
        assert_eq!(normalize_location(Some("New York, New York")), "new york");
    }

    #[test]
    fn test_location_san_francisco() {
        assert_eq!(normalize_location(Some("Palo Alto, CA")), "san francisco");
        assert_eq!(normalize_location(Some("SF Bay Area")), "san francisco");
        assert_eq!(normalize_location(Some("SF")), "san francisco");
    }

    #[test]
    fn test_location_toronto() {
        assert_eq!(normalize_location(Some("Scarborough, ON")), "toronto");
        assert_eq!(normalize_location(Some("Toronto")), "toronto");
        assert_eq!(normalize_location(Some("North York, Ontario")), "toronto");
    }

    #[test]
    fn test_location_passthrough() {
        assert_eq!(normalize_location(Some("Austin, TX")), "austin, tx");
        assert_eq!(normalize_location(Some(" Berlin ")), "berlin");
        assert_eq!(normalize_location(None), "");
    }

    #[test]
    fn test_location_priority_order() {
        // remote wins over a city in the same string
        assert_eq!(normalize_location(Some("Remote or NYC")), "remote");
        // new york is checked before san francisco
        assert_eq!(normalize_location(Some("NYC / SF")), "new york");
    }

    #[test]
    fn test_short_tokens_need_word_boundaries() {
        // "sf" inside another word is not san francisco
        assert_eq!(normalize_location(Some("Transfer Station")), "transfer station");
        // "remote" inside a larger word is not remote
        assert_eq!(normalize_location(Some("Remoteville")), "remoteville");
    }

    #[test]
    fn test_borough_names_need_word_boundaries() {
        assert_eq!(normalize_location(Some("Queens, NY")), "new york");
        assert_eq!(normalize_location(Some("The Bronx")), "new york");
        assert_eq!(normalize_location(Some("Manhattan")), "new york");
        assert_eq!(normalize_location(Some("Midtown Manhattan, NY")), "new york");
        assert_eq!(normalize_location(Some("Brisbane, Queensland")), "brisbane, queensland");
        assert_eq!(normalize_location(Some("Manhattan, KS")), "manhattan, ks");
        assert_eq!(normalize_location(Some("Manhattan Beach, CA")), "manhattan beach, ca");
    }

    #[test]
    fn test_builtin_labels() {
        let labels: Vec<_> = MetroTable::builtin().labels().collect();
        assert_eq!(labels, ["remote", "new york", "san francisco", "toronto"]);
    }

    #[test]
    fn test_custom_table() {
        let rules = vec![MetroRule {
            label: "London".into(),
            keywords: vec!["Shoreditch".into(), "  ".into()],
            patterns: vec![r"\blondon\b".into()],
        }];
        let table = MetroTable::from_rules(&rules).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.canonicalize(Some("Shoreditch, UK")), "london");
        assert_eq!(table.canonicalize(Some("LONDON")), "london");
        assert_eq!(table.canonicalize(Some("Brooklyn, NY")), "brooklyn, ny");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let rules = vec![MetroRule {
            label: "broken".into(),
            keywords: vec![],
            patterns: vec!["(unclosed".into()],
        }];
        let err = MetroTable::from_rules(&rules).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { ref label, .. } if label == "broken"));
    }

    #[test]
    fn test_empty_table_passes_through() {
        let table = MetroTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.canonicalize(Some("Remote")), "remote");
        assert_eq!(table.canonicalize(Some("NYC")), "nyc");
    }

    proptest! {
        #[test]
        fn prop_normalize_text_idempotent(s in "[ \\ta-zA-Z0-9,.\\-éÉßÖ]{0,40}") {
            let once = normalize_text(Some(&s));
            let twice = normalize_text(Some(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_normalize_location_is_deterministic(s in "[ a-zA-Z,]{0,30}") {
            prop_assert_eq!(normalize_location(Some(&s)), normalize_location(Some(&s)));
        }

        #[test]
        fn prop_location_is_label_or_normalized(s in "[ a-zA-Z,]{0,30}") {
            let out = normalize_location(Some(&s));
            let is_label = MetroTable::builtin().labels().any(|l| l == out);
            prop_assert!(is_label || out == normalize_text(Some(&s)));
        }
    }
}
