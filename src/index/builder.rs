// WHY: One blocking pass over the registry turns names, aliases and labels into length-ordered
// pattern tables; all intermediate maps live only inside build() and are dropped afterwards

use regex_automata::meta::Regex;
use std::collections::{HashMap, HashSet};
use std::iter;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{ManualOverride, MatcherConfig};
use crate::error::BuildError;
use crate::registry::InstituteRecord;
use crate::text::abbreviations::replace_all;
use crate::text::normalize_affiliation;

use super::ambiguity::{AmbiguityFilter, MIN_PATTERN_LEN};
use super::parents::ParentMap;
use super::{MatchEntry, MatchIndex, ScopedPatterns};

/// From the first whitespace-preceded "(" through the last ")"
const BRACKET_QUALIFIER_PATTERN: &str = r"\s\([^}]*\)";
const LEADING_ARTICLE_PATTERN: &str = r"(?i)^the\s";

/// Accumulators for a single build
#[derive(Default)]
struct BuildState {
    parents: ParentMap,
    id_country: HashMap<String, String>,
    /// country -> pattern -> canonical name
    country_patterns: HashMap<String, HashMap<String, String>>,
    /// pattern -> canonical name
    global_patterns: HashMap<String, String>,
    /// (canonical name, country) -> source ids
    country_name_ids: HashMap<(String, String), Vec<String>>,
    /// canonical name -> source ids
    name_ids: HashMap<String, Vec<String>>,
    /// canonical name -> distinct countries of its source records, in record order
    name_countries: HashMap<String, Vec<String>>,
}

impl BuildState {
    /// Later insertions of the same pattern replace earlier ones
    fn add_pattern(&mut self, country: &str, pattern: String, canonical_name: &str) {
        self.country_patterns
            .entry(country.to_string())
            .or_default()
            .insert(pattern.clone(), canonical_name.to_string());
        self.global_patterns
            .insert(pattern, canonical_name.to_string());
    }
}

/// Builds a MatchIndex from a full registry snapshot
pub struct IndexBuilder {
    filter: AmbiguityFilter,
    overrides: Vec<ManualOverride>,
    bracket_qualifier: Regex,
    leading_article: Regex,
}

impl IndexBuilder {
    pub fn new(config: &MatcherConfig) -> Result<Self, BuildError> {
        let bracket_qualifier = Regex::new(BRACKET_QUALIFIER_PATTERN).map_err(|e| {
            BuildError::invalid_pattern("bracket qualifier", BRACKET_QUALIFIER_PATTERN, e)
        })?;
        let leading_article = Regex::new(LEADING_ARTICLE_PATTERN).map_err(|e| {
            BuildError::invalid_pattern("leading article", LEADING_ARTICLE_PATTERN, e)
        })?;

        Ok(Self {
            filter: AmbiguityFilter::new(&config.ambiguous_names)?,
            overrides: config.manual_overrides.clone(),
            bracket_qualifier,
            leading_article,
        })
    }

    pub fn with_default_rules() -> Result<Self, BuildError> {
        Self::new(&MatcherConfig::default())
    }

    /// "Foo University (Bar)" -> "Foo University"
    pub fn strip_bracketed_qualifier(&self, name: &str) -> String {
        replace_all(&self.bracket_qualifier, name, "").trim().to_string()
    }

    /// Build the country-scoped and global pattern tables
    ///
    /// Records without an id, a name, or a first-address country are skipped.
    /// Fails when nothing usable remains or when parent links form a cycle.
    pub fn build(&self, records: &[InstituteRecord]) -> Result<MatchIndex, BuildError> {
        if records.is_empty() {
            return Err(BuildError::EmptyRegistry);
        }

        let start_time = Instant::now();
        info!("Building match index from {} registry records", records.len());

        let mut state = BuildState::default();
        let mut skipped = 0usize;

        for record in records {
            if !record.is_indexable() {
                debug!("Skipping registry record {:?}: missing id, name or country", record.id);
                skipped += 1;
                continue;
            }
            self.add_record(&mut state, record);
        }

        if skipped == records.len() {
            return Err(BuildError::NoUsableRecords {
                total: records.len(),
            });
        }

        state.parents.validate()?;

        for ids in state.name_ids.values_mut() {
            consolidate_ids(ids, &state.parents)?;
        }
        for ids in state.country_name_ids.values_mut() {
            consolidate_ids(ids, &state.parents)?;
        }

        self.apply_overrides(&mut state);

        let index = finalize(state);
        let stats = index.stats();

        info!(
            "Match index built in {}ms: {} records indexed, {} skipped, {} countries, {} global multi-word and {} single-word patterns",
            start_time.elapsed().as_millis(),
            records.len() - skipped,
            skipped,
            stats.countries,
            stats.global_multi_word,
            stats.global_single_word
        );

        Ok(index)
    }

    fn add_record(&self, state: &mut BuildState, record: &InstituteRecord) {
        let (Some(name), Some(country)) = (record.display_name(), record.country()) else {
            return;
        };
        let id = record.id.as_str();

        state.parents.insert(id, record.parent_id());
        state.id_country.insert(id.to_string(), country.to_string());

        let canonical_name = self.strip_bracketed_qualifier(name);
        state
            .country_name_ids
            .entry((canonical_name.clone(), country.to_string()))
            .or_default()
            .push(id.to_string());
        state
            .name_ids
            .entry(canonical_name.clone())
            .or_default()
            .push(id.to_string());
        let countries = state.name_countries.entry(canonical_name.clone()).or_default();
        if !countries.iter().any(|seen| seen == country) {
            countries.push(country.to_string());
        }

        let unified_name = replace_all(&self.leading_article, &canonical_name, "");
        let candidates = iter::once(unified_name.as_str())
            .chain(record.aliases.iter().map(String::as_str))
            .chain(record.labels.iter().map(|label| label.label.as_str()));

        // Rejected candidates still leave the id tracked under its canonical name above
        for candidate in candidates {
            let pattern = normalize_affiliation(candidate);
            if self.filter.accepts(&pattern) {
                state.add_pattern(country, pattern, &canonical_name);
            }
        }
    }

    fn apply_overrides(&self, state: &mut BuildState) {
        for entry in &self.overrides {
            if !state.name_ids.contains_key(&entry.canonical_name) {
                debug!(
                    "Skipping override {:?} -> {:?}: canonical name not in registry",
                    entry.pattern, entry.canonical_name
                );
                continue;
            }
            let pattern = normalize_affiliation(&entry.pattern);
            state.add_pattern(&entry.country, pattern, &entry.canonical_name);
        }
    }
}

/// Collapse sibling ids that share one topmost parent to their majority immediate parent
///
/// Ties go to the lexicographically smallest parent id. Lists whose ids resolve to
/// different roots are left untouched.
fn consolidate_ids(ids: &mut Vec<String>, parents: &ParentMap) -> Result<(), BuildError> {
    if ids.len() < 2 {
        return Ok(());
    }

    let mut roots = HashSet::new();
    for id in ids.iter() {
        roots.insert(parents.resolve_top_parent(id)?);
    }
    if roots.len() != 1 {
        return Ok(());
    }

    let mut votes: HashMap<&str, usize> = HashMap::new();
    for id in ids.iter() {
        *votes.entry(parents.parent_of(id)).or_insert(0) += 1;
    }

    let winner = votes
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(id, _)| id.to_string());

    if let Some(winner) = winner {
        *ids = vec![winner];
    }
    Ok(())
}

/// Sort by descending pattern length (ties by pattern text) and split on internal spaces
fn sort_and_split(
    patterns: HashMap<String, String>,
    ids_for: impl Fn(&str) -> Vec<String>,
) -> ScopedPatterns {
    let mut pairs: Vec<(String, String)> = patterns
        .into_iter()
        .filter(|(pattern, _)| pattern.len() >= MIN_PATTERN_LEN)
        .collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

    let mut scoped = ScopedPatterns::default();
    for (pattern, canonical_name) in pairs {
        let entry = MatchEntry {
            candidate_ids: ids_for(&canonical_name),
            pattern,
            canonical_name,
        };
        if entry.is_multi_word() {
            scoped.multi_word.push(entry);
        } else {
            scoped.single_word.push(entry);
        }
    }
    scoped
}

fn finalize(state: BuildState) -> MatchIndex {
    let BuildState {
        id_country,
        country_patterns,
        global_patterns,
        country_name_ids,
        name_ids,
        name_countries,
        ..
    } = state;

    let global_ids = |name: &str| name_ids.get(name).cloned().unwrap_or_default();

    let by_country = country_patterns
        .into_iter()
        .map(|(country, patterns)| {
            let scoped = sort_and_split(patterns, |name| {
                country_name_ids
                    .get(&(name.to_string(), country.clone()))
                    .filter(|ids| !ids.is_empty())
                    .cloned()
                    .unwrap_or_else(|| global_ids(name))
            });
            (country, scoped)
        })
        .collect();

    let global = sort_and_split(global_patterns, global_ids);

    MatchIndex::new(by_country, global, id_country, name_countries)
}
