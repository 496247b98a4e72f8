//! Keyword-overlap item matcher.

use std::collections::BTreeSet;

use serde::Serialize;

use super::catalog::Item;

/// Keywords at least this long also match inside a longer query token,
/// so `telur` matches `telurnya`.
const MIN_SUBSTRING_KEYWORD_LEN: usize = 4;

/// Outcome classification of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Exactly one item has the top score.
    Matched,
    /// Two or more items share the top score.
    Ambiguous,
    /// No item shares a keyword with the description.
    Unmatched,
}

impl MatchStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Ambiguous => "ambiguous",
            Self::Unmatched => "unmatched",
        }
    }
}

/// Result of matching one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The single best item.
    Matched(Item),
    /// Tied candidates in catalog order, always two or more.
    Ambiguous(Vec<Item>),
    /// Nothing scored.
    Unmatched,
}

impl MatchResult {
    /// Returns the classification.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        match self {
            Self::Matched(_) => MatchStatus::Matched,
            Self::Ambiguous(_) => MatchStatus::Ambiguous,
            Self::Unmatched => MatchStatus::Unmatched,
        }
    }

    /// Returns the matched item, if any.
    #[must_use]
    pub fn item(&self) -> Option<&Item> {
        match self {
            Self::Matched(item) => Some(item),
            Self::Ambiguous(_) | Self::Unmatched => None,
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedItem {
    item: Item,
    keywords: BTreeSet<String>,
}

/// Matcher over an immutable catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct ItemMatcher {
    entries: Vec<IndexedItem>,
}

impl ItemMatcher {
    /// Builds a matcher from catalog items, skipping inactive ones.
    ///
    /// An item's keyword set is its keyword list plus the words of its name.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let entries = items
            .into_iter()
            .filter(|item| item.is_active)
            .map(|item| {
                let keywords = item
                    .keywords
                    .iter()
                    .flat_map(|k| tokenize(k))
                    .chain(tokenize(&item.name))
                    .collect();
                IndexedItem { item, keywords }
            })
            .collect();
        Self { entries }
    }

    /// Number of matchable items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog snapshot has no matchable items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classifies a free-text description. Never fails.
    #[must_use]
    pub fn match_description(&self, description: &str) -> MatchResult {
        let query: Vec<String> = tokenize(description).collect();
        if query.is_empty() {
            return MatchResult::Unmatched;
        }

        let scores: Vec<usize> = self
            .entries
            .iter()
            .map(|entry| score(&entry.keywords, &query))
            .collect();
        let best = scores.iter().copied().max().unwrap_or(0);
        if best == 0 {
            return MatchResult::Unmatched;
        }

        let mut top: Vec<Item> = self
            .entries
            .iter()
            .zip(&scores)
            .filter(|(_, s)| **s == best)
            .map(|(entry, _)| entry.item.clone())
            .collect();

        if top.len() == 1 {
            MatchResult::Matched(top.remove(0))
        } else {
            MatchResult::Ambiguous(top)
        }
    }
}

/// Counts the item keywords present in the query.
fn score(keywords: &BTreeSet<String>, query: &[String]) -> usize {
    keywords
        .iter()
        .filter(|keyword| query.iter().any(|token| token_matches(token, keyword)))
        .count()
}

fn token_matches(token: &str, keyword: &str) -> bool {
    token == keyword
        || (keyword.chars().count() >= MIN_SUBSTRING_KEYWORD_LEN && token.contains(keyword))
}

/// Lower-cases and splits on anything that is not a letter or digit.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn item(code: &str, name: &str, keywords: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            keywords: crate::matcher::parse_keywords(keywords),
            unit: Some("kg".to_string()),
            is_active: true,
        }
    }

    fn chili_catalog() -> Vec<Item> {
        vec![
            item("ITM001", "Cabe Merah Tanjung", "cabe,merah,tanjung"),
            item("ITM002", "Cabe Merah Keriting", "cabe,merah,keriting"),
            item("ITM003", "Bawang Putih", "bawang,putih"),
        ]
    }

    #[test]
    fn test_single_best_item_is_matched() {
        let catalog = chili_catalog();
        let matcher = ItemMatcher::new(catalog.clone());

        let result = matcher.match_description("cabe merah tanjung");
        assert_eq!(result.status(), MatchStatus::Matched);
        assert_eq!(result.item(), Some(&catalog[0]));
    }

    #[test]
    fn test_matching_ignores_case_and_punctuation() {
        let matcher = ItemMatcher::new(chili_catalog());
        let result = matcher.match_description("CABE-merah, Keriting!");
        assert_eq!(result.item().map(|i| i.code.as_str()), Some("ITM002"));
    }

    #[test]
    fn test_tie_is_ambiguous_in_catalog_order() {
        let matcher = ItemMatcher::new(chili_catalog());

        let MatchResult::Ambiguous(candidates) = matcher.match_description("cabe merah") else {
            panic!("expected ambiguous result");
        };
        let codes: Vec<&str> = candidates.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["ITM001", "ITM002"]);
    }

    #[test]
    fn test_no_overlap_is_unmatched() {
        let matcher = ItemMatcher::new(chili_catalog());
        assert_eq!(matcher.match_description("gas elpiji"), MatchResult::Unmatched);
        assert_eq!(matcher.match_description("   "), MatchResult::Unmatched);
    }

    #[test]
    fn test_long_keyword_matches_inside_token() {
        let matcher = ItemMatcher::new(vec![item("ITM010", "Telur Ayam", "telur")]);
        assert_eq!(
            matcher.match_description("telurnya sekrat").status(),
            MatchStatus::Matched
        );
    }

    #[test]
    fn test_short_keyword_needs_whole_token() {
        let matcher = ItemMatcher::new(vec![item("ITM011", "Gas", "gas")]);
        assert_eq!(
            matcher.match_description("gasket").status(),
            MatchStatus::Unmatched
        );
    }

    #[test]
    fn test_inactive_items_are_skipped() {
        let mut retired = item("ITM001", "Cabe Merah Tanjung", "cabe,merah,tanjung");
        retired.is_active = false;
        let matcher = ItemMatcher::new(vec![retired]);
        assert!(matcher.is_empty());
        assert_eq!(
            matcher.match_description("cabe merah tanjung"),
            MatchResult::Unmatched
        );
    }

    #[test]
    fn test_name_words_count_as_keywords() {
        let matcher = ItemMatcher::new(vec![item("ITM020", "Kecap Manis", "")]);
        assert_eq!(
            matcher.match_description("kecap manis").status(),
            MatchStatus::Matched
        );
    }

    proptest! {
        /// An empty catalog always yields Unmatched.
        #[test]
        fn prop_empty_catalog_never_matches(description in ".{0,60}") {
            let matcher = ItemMatcher::new(Vec::new());
            prop_assert_eq!(matcher.match_description(&description), MatchResult::Unmatched);
        }

        /// An item's own name matches it when no other item shares all its keywords.
        #[test]
        fn prop_exact_name_is_reflexive(index in 0usize..3) {
            let catalog = vec![
                item("ITM001", "Cabe Merah Tanjung", "cabe,merah,tanjung"),
                item("ITM002", "Bawang Putih", "bawang,putih"),
                item("ITM003", "Minyak Goreng", "minyak,goreng"),
            ];
            let matcher = ItemMatcher::new(catalog.clone());
            let result = matcher.match_description(&catalog[index].name);
            prop_assert_eq!(result.item(), Some(&catalog[index]));
        }

        /// Ambiguous results always carry at least two candidates.
        #[test]
        fn prop_ambiguous_has_two_or_more(words in prop::collection::vec(
            prop::sample::select(vec!["cabe", "merah", "tanjung", "keriting", "bawang", "putih", "gula"]),
            0..5,
        )) {
            let matcher = ItemMatcher::new(chili_catalog());
            if let MatchResult::Ambiguous(candidates) = matcher.match_description(&words.join(" ")) {
                prop_assert!(candidates.len() >= 2);
            }
        }
    }
}
