// WHY: Runtime half of the engine; owns the immutable index plus compiled query tables
// and resolves one affiliation string per call without touching shared mutable state

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MatcherConfig;
use crate::country::CountryClassifier;
use crate::error::BuildError;
use crate::index::{IndexBuilder, MatchEntry, MatchIndex};
use crate::registry::InstituteRecord;
use crate::text::Normalizer;

/// Escaped whitespace tokens produced by the upstream record format
const WHITESPACE_PLACEHOLDERS: &[&str] = &["#TAB#", "#N#"];

/// Which table produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    Country,
    Global,
}

/// Outcome of matching one affiliation; same shape whether or not anything matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Empty when unmatched
    pub canonical_name: String,
    pub candidate_ids: Vec<String>,
    pub countries: Vec<String>,
    /// Preprocessed text the tables were scanned against
    pub normalized: String,
    pub scope: Option<MatchScope>,
}

impl MatchResult {
    fn country_scoped(entry: &MatchEntry, country: &str, normalized: String) -> Self {
        Self {
            canonical_name: entry.canonical_name.clone(),
            candidate_ids: entry.candidate_ids.clone(),
            countries: vec![country.to_string()],
            normalized,
            scope: Some(MatchScope::Country),
        }
    }

    fn global(entry: &MatchEntry, countries: Vec<String>, normalized: String) -> Self {
        Self {
            canonical_name: entry.canonical_name.clone(),
            candidate_ids: entry.candidate_ids.clone(),
            countries,
            normalized,
            scope: Some(MatchScope::Global),
        }
    }

    /// No confident match; the classified country, if any, is still reported
    fn unmatched(country: Option<&str>, normalized: String) -> Self {
        Self {
            canonical_name: String::new(),
            candidate_ids: Vec::new(),
            countries: country.map(|c| vec![c.to_string()]).unwrap_or_default(),
            normalized,
            scope: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.scope.is_some()
    }
}

/// Resolves free-text affiliations against a built index
pub struct Matcher {
    index: MatchIndex,
    normalizer: Normalizer,
    classifier: CountryClassifier,
}

impl Matcher {
    /// Wrap an already built index with query tables from `config`
    pub fn new(index: MatchIndex, config: &MatcherConfig) -> Result<Self, BuildError> {
        Ok(Self {
            index,
            normalizer: Normalizer::new(config)?,
            classifier: CountryClassifier::from_config(config)?,
        })
    }

    /// Build the index from registry records and wrap it
    pub fn from_records(records: &[InstituteRecord], config: &MatcherConfig) -> Result<Self, BuildError> {
        let index = IndexBuilder::new(config)?.build(records)?;
        Self::new(index, config)
    }

    pub fn index(&self) -> &MatchIndex {
        &self.index
    }

    /// Match one raw affiliation string
    ///
    /// Country-scoped tables are tried first when a country is recognized, then the
    /// global tables. Within a scope multi-word patterns (substring) beat single-word
    /// patterns (whole token), and longer patterns beat shorter ones.
    pub fn match_affiliation(&self, raw_text: &str) -> MatchResult {
        let cleaned = WHITESPACE_PLACEHOLDERS
            .iter()
            .fold(raw_text.to_string(), |text, placeholder| text.replace(placeholder, " "));

        let country = self.classifier.classify(&cleaned);
        let normalized = self.normalizer.preprocess_name(&cleaned);

        if let Some(country) = country {
            if let Some(entry) = self
                .index
                .country(country)
                .and_then(|scoped| scoped.find(&normalized))
            {
                return MatchResult::country_scoped(entry, country, normalized);
            }
            debug!("No {} match for {:?}, falling back to global table", country, normalized);
        }

        if let Some(entry) = self.index.global().find(&normalized) {
            let countries = self.countries_of(entry);
            return MatchResult::global(entry, countries, normalized);
        }

        MatchResult::unmatched(country, normalized)
    }

    /// Distinct registry countries of the candidates, in candidate order
    ///
    /// A consolidated parent id need not be a registry record itself; when no
    /// candidate has a country, the countries of the records carrying the name are used.
    fn countries_of(&self, entry: &MatchEntry) -> Vec<String> {
        let mut countries: Vec<String> = Vec::new();
        for country in entry
            .candidate_ids
            .iter()
            .filter_map(|id| self.index.country_of(id))
        {
            if !countries.iter().any(|seen| seen == country) {
                countries.push(country.to_string());
            }
        }
        if countries.is_empty() {
            countries = self.index.source_countries(&entry.canonical_name).to_vec();
        }
        countries
    }
}
