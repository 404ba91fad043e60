// WHY: Short or generic names ("university", "institute of physics") occur in hundreds of registry
// entries; letting them into the index would hand every affiliation to whichever entry sorted first

use regex_automata::meta::Regex;
use std::collections::HashSet;

use crate::error::BuildError;

/// Patterns shorter than this are never indexed
pub const MIN_PATTERN_LEN: usize = 3;

/// Generic "X of Y" phrases that name a kind of unit, not one institution
const GENERIC_PHRASE_PATTERN: &str =
    r"^(?:institute of|department of|college of).{3,20}$|^ministry of .{3,20}$";

/// Normalized names known to identify many unrelated institutions
pub const AMBIGUOUS_NAMES: &[&str] = &[
    "university",
    "institute",
    "college",
    "hospital",
    "academy",
    "school",
    "laboratory",
    "research institute",
    "research center",
    "research centre",
    "national university",
    "state university",
    "open university",
    "technical university",
    "medical university",
    "university hospital",
    "university college",
    "general hospital",
    "central hospital",
    "city hospital",
    "childrens hospital",
    "medical center",
    "medical school",
    "school of medicine",
    "faculty of medicine",
    "faculty of science",
    "graduate school",
    "business school",
    "law school",
    "polytechnic",
    "polytechnic university",
    "national institute",
    "max planck institute",
    "academy of sciences",
    "national academy of sciences",
    "ministry of health",
    "ministry of education",
    "department of health",
    "department of medicine",
    "department of physics",
    "department of chemistry",
    "geological survey",
    "national library",
    "national museum",
    "public health",
    "cancer center",
    "cancer institute",
    "heart institute",
];

/// Decides whether a normalized candidate may become a match pattern
pub struct AmbiguityFilter {
    excluded: HashSet<String>,
    generic_phrase: Regex,
}

impl AmbiguityFilter {
    pub fn new(ambiguous_names: &[String]) -> Result<Self, BuildError> {
        let generic_phrase = Regex::new(GENERIC_PHRASE_PATTERN)
            .map_err(|e| BuildError::invalid_pattern("generic phrases", GENERIC_PHRASE_PATTERN, e))?;

        Ok(Self {
            excluded: ambiguous_names.iter().cloned().collect(),
            generic_phrase,
        })
    }

    /// True when the pattern is long enough, not curated as ambiguous, and not a generic phrase
    pub fn accepts(&self, pattern: &str) -> bool {
        pattern.len() >= MIN_PATTERN_LEN
            && !self.excluded.contains(pattern)
            && !self.generic_phrase.is_match(pattern)
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}
