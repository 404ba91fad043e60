// WHY: Immutable lookup structures produced once from the registry and shared read-only by matchers

use std::collections::HashMap;

pub mod ambiguity;
pub mod builder;
pub mod overrides;
pub mod parents;

pub use ambiguity::AmbiguityFilter;
pub use builder::IndexBuilder;
pub use parents::ParentMap;

/// One normalized pattern and the institution it resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    pub pattern: String,
    pub canonical_name: String,
    pub candidate_ids: Vec<String>,
}

impl MatchEntry {
    pub fn is_multi_word(&self) -> bool {
        self.pattern.contains(' ')
    }
}

/// True when `pattern` occurs in `text` as whole tokens, not inside a longer word
///
/// Runs once per single-word pattern per query, so it checks the bytes around each
/// hit in place instead of building a padded needle.
pub fn contains_token(text: &str, pattern: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(pattern).any(|(start, hit)| {
        let end = start + hit.len();
        (start == 0 || bytes[start - 1] == b' ') && (end == bytes.len() || bytes[end] == b' ')
    })
}

/// Patterns for one scope, each list sorted by descending pattern length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedPatterns {
    pub multi_word: Vec<MatchEntry>,
    pub single_word: Vec<MatchEntry>,
}

impl ScopedPatterns {
    /// Multi-word patterns by substring first, then single-word patterns as whole tokens
    pub fn find(&self, text: &str) -> Option<&MatchEntry> {
        self.multi_word
            .iter()
            .find(|entry| text.contains(entry.pattern.as_str()))
            .or_else(|| {
                self.single_word
                    .iter()
                    .find(|entry| contains_token(text, &entry.pattern))
            })
    }

    pub fn len(&self) -> usize {
        self.multi_word.len() + self.single_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multi_word.is_empty() && self.single_word.is_empty()
    }
}

/// Summary of a built index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub countries: usize,
    pub global_multi_word: usize,
    pub global_single_word: usize,
    pub identifiers: usize,
}

/// Country-scoped and global pattern tables plus identifier -> country
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    by_country: HashMap<String, ScopedPatterns>,
    global: ScopedPatterns,
    id_country: HashMap<String, String>,
    name_countries: HashMap<String, Vec<String>>,
}

impl MatchIndex {
    pub(crate) fn new(
        by_country: HashMap<String, ScopedPatterns>,
        global: ScopedPatterns,
        id_country: HashMap<String, String>,
        name_countries: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            by_country,
            global,
            id_country,
            name_countries,
        }
    }

    pub fn country(&self, country: &str) -> Option<&ScopedPatterns> {
        self.by_country.get(country)
    }

    pub fn global(&self) -> &ScopedPatterns {
        &self.global
    }

    pub fn country_of(&self, id: &str) -> Option<&str> {
        self.id_country.get(id).map(String::as_str)
    }

    /// Countries of the registry records that carried a canonical name
    pub fn source_countries(&self, canonical_name: &str) -> &[String] {
        self.name_countries
            .get(canonical_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Countries that have a scoped table, sorted
    pub fn countries(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self.by_country.keys().map(String::as_str).collect();
        countries.sort_unstable();
        countries
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            countries: self.by_country.len(),
            global_multi_word: self.global.multi_word.len(),
            global_single_word: self.global.single_word.len(),
            identifiers: self.id_country.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pattern: &str, name: &str) -> MatchEntry {
        MatchEntry {
            pattern: pattern.to_string(),
            canonical_name: name.to_string(),
            candidate_ids: vec![format!("id:{name}")],
        }
    }

    #[test]
    fn test_contains_token_boundaries() {
        assert!(contains_token("mit", "mit"));
        assert!(contains_token("mit media lab", "mit"));
        assert!(contains_token("media lab mit", "mit"));
        assert!(contains_token("the mit media lab", "mit"));

        assert!(!contains_token("limited", "mit"));
        assert!(!contains_token("acme limited company", "mit"));
        assert!(!contains_token("summit", "mit"));
        assert!(!contains_token("mitre corporation", "mit"));
        assert!(!contains_token("", "mit"));
        // An embedded hit does not hide a later whole-token one
        assert!(contains_token("summit mit", "mit"));
        assert!(contains_token("mitmit mit lab", "mit"));
        assert!(!contains_token("mitmit", "mit"));
    }

    #[test]
    fn test_multi_word_checked_before_single_word() {
        let scope = ScopedPatterns {
            multi_word: vec![entry("harvard medical school", "Harvard Medical School")],
            single_word: vec![entry("harvard", "Harvard University")],
        };
        let found = scope.find("dept of genetics harvard medical school boston").unwrap();
        assert_eq!(found.canonical_name, "Harvard Medical School");

        let found = scope.find("harvard boston").unwrap();
        assert_eq!(found.canonical_name, "Harvard University");
    }

    #[test]
    fn test_multi_word_is_plain_substring() {
        let scope = ScopedPatterns {
            multi_word: vec![entry("king s college", "King's College")],
            single_word: vec![],
        };
        // Substring semantics: no boundary requirement for multi-word patterns
        assert!(scope.find("xking s colleges").is_some());
        assert!(scope.find("kings college").is_none());
    }

    #[test]
    fn test_stats_and_accessors() {
        let mut by_country = HashMap::new();
        by_country.insert("Japan".to_string(), ScopedPatterns::default());
        by_country.insert("Chile".to_string(), ScopedPatterns::default());
        let mut id_country = HashMap::new();
        id_country.insert("grid.1".to_string(), "Japan".to_string());
        let mut name_countries = HashMap::new();
        name_countries.insert(
            "Tokyo Institute of Technology".to_string(),
            vec!["Japan".to_string()],
        );

        let index = MatchIndex::new(
            by_country,
            ScopedPatterns {
                multi_word: vec![entry("tokyo tech", "Tokyo Institute of Technology")],
                single_word: vec![],
            },
            id_country,
            name_countries,
        );

        assert_eq!(index.countries(), vec!["Chile", "Japan"]);
        assert_eq!(index.country_of("grid.1"), Some("Japan"));
        assert_eq!(index.country_of("grid.2"), None);
        assert!(index.country("Peru").is_none());
        assert_eq!(index.source_countries("Tokyo Institute of Technology"), ["Japan"]);
        assert!(index.source_countries("Unknown").is_empty());
        assert_eq!(
            index.stats(),
            IndexStats {
                countries: 2,
                global_multi_word: 1,
                global_single_word: 0,
                identifiers: 1
            }
        );
    }
}
