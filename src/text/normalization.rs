// WHY: Index patterns and query text must go through the exact same folding,
// otherwise substring and whole-word comparisons silently stop lining up

use crate::config::MatcherConfig;
use crate::error::BuildError;

use super::abbreviations::AbbreviationExpander;
use super::transliterate::to_ascii_lower;

/// Normalize affiliation text: ASCII-lowercase, "&" to "and", drop apostrophes,
/// punctuation to spaces, collapse whitespace
pub fn normalize_affiliation(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_affiliation_into(text, &mut result);
    result
}

/// Normalize into supplied buffer to avoid allocation
pub fn normalize_affiliation_into(text: &str, buffer: &mut String) {
    buffer.clear();

    let folded = to_ascii_lower(text);
    buffer.reserve(folded.len());

    // Separators are deferred so runs collapse and nothing leads or trails
    let mut pending_space = false;

    for ch in folded.chars() {
        match ch {
            '\'' => {}
            '&' => {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str("and");
                pending_space = true;
            }
            _ if ch.is_ascii_punctuation() || ch.is_whitespace() => {
                pending_space = true;
            }
            _ => {
                if pending_space && !buffer.is_empty() {
                    buffer.push(' ');
                }
                pending_space = false;
                buffer.push(ch);
            }
        }
    }
}

/// Query-side normalizer carrying the compiled abbreviation tables
pub struct Normalizer {
    expander: AbbreviationExpander,
}

impl Normalizer {
    pub fn new(config: &MatcherConfig) -> Result<Self, BuildError> {
        let expander =
            AbbreviationExpander::new(&config.abbreviations, &config.institution_abbreviations)?;
        Ok(Self { expander })
    }

    /// Normalizer with the built-in abbreviation tables
    pub fn with_default_rules() -> Result<Self, BuildError> {
        Self::new(&MatcherConfig::default())
    }

    /// Plain normalization, no abbreviation handling
    pub fn normalize(&self, text: &str) -> String {
        normalize_affiliation(text)
    }

    /// Expand abbreviations, normalize, then expand institution-type tokens
    pub fn preprocess_name(&self, text: &str) -> String {
        let expanded = self.expander.expand_patterns(text);
        let normalized = normalize_affiliation(&expanded);
        self.expander.expand_tokens(&normalized)
    }
}
