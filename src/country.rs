// WHY: Knowing the country up front narrows matching to that country's institutions,
// which is what keeps generic names like "National University" from hitting the wrong place

use regex_automata::meta::Regex;

use crate::config::{CountryRule, MatcherConfig};
use crate::error::BuildError;

/// Country patterns matched against raw text, first match wins
/// Order resolves overlaps: "New South Wales" must be seen before "Wales",
/// "New Mexico" before "Mexico", "Northern Ireland" before "Ireland"
pub const COUNTRY_PATTERNS: &[(&str, &str)] = &[
    (r"\bAustralia\b|New South Wales|\bQueensland\b|\bTasmania\b", "Australia"),
    (r"\bNew Zealand\b", "New Zealand"),
    (
        r"\bUSA\b|\bU\.S\.A\.?|United States|\bNew Mexico\b|\bCalifornia\b|\bMassachusetts\b|\bNew York\b|\bTexas\b|\bIllinois\b|\bPennsylvania\b|\bMichigan\b|\bMaryland\b|\bWashington,? DC\b",
        "United States",
    ),
    (
        r"\bUK\b|United Kingdom|\bEngland\b|\bScotland\b|\bWales\b|Northern Ireland|Great Britain",
        "United Kingdom",
    ),
    (r"\bIreland\b", "Ireland"),
    (r"\bHong Kong\b", "Hong Kong"),
    (r"\bTaiwan\b", "Taiwan"),
    (r"\bMacau\b|\bMacao\b", "Macao"),
    (r"\bChina\b|\bP\.?\s?R\.?\s?C\b|\bBeijing\b|\bShanghai\b", "China"),
    (r"\bJapan\b|\bTokyo\b", "Japan"),
    (r"\bSouth Korea\b|\bKorea\b", "South Korea"),
    (r"\bSingapore\b", "Singapore"),
    (r"\bIndia\b", "India"),
    (r"\bIndonesia\b", "Indonesia"),
    (r"\bCanada\b|\bOntario\b|\bQuebec\b|\bQuébec\b", "Canada"),
    (r"\bMexico\b|\bMéxico\b", "Mexico"),
    (r"\bBrazil\b|\bBrasil\b", "Brazil"),
    (r"\bArgentina\b", "Argentina"),
    (r"\bChile\b", "Chile"),
    (r"\bGermany\b|\bDeutschland\b", "Germany"),
    (r"\bFrance\b", "France"),
    (r"\bSwitzerland\b|\bSchweiz\b|\bSuisse\b", "Switzerland"),
    (r"\bAustria\b|\bÖsterreich\b", "Austria"),
    (r"\bItaly\b|\bItalia\b", "Italy"),
    (r"\bSpain\b|\bEspaña\b", "Spain"),
    (r"\bPortugal\b", "Portugal"),
    (r"\bNetherlands\b|\bThe Netherlands\b|\bHolland\b", "Netherlands"),
    (r"\bBelgium\b|\bBelgique\b", "Belgium"),
    (r"\bDenmark\b", "Denmark"),
    (r"\bSweden\b", "Sweden"),
    (r"\bNorway\b", "Norway"),
    (r"\bFinland\b", "Finland"),
    (r"\bPoland\b", "Poland"),
    (r"\bCzech Republic\b|\bCzechia\b", "Czechia"),
    (r"\bGreece\b", "Greece"),
    (r"\bTurkey\b|\bTürkiye\b", "Turkey"),
    (r"\bRussia\b|\bRussian Federation\b", "Russia"),
    (r"\bIsrael\b", "Israel"),
    (r"\bIran\b", "Iran"),
    (r"\bEgypt\b", "Egypt"),
    (r"\bSouth Africa\b", "South Africa"),
];

/// Ordered regex table mapping raw text to a registry country
pub struct CountryClassifier {
    rules: Vec<(Regex, String)>,
}

impl CountryClassifier {
    /// Compile the table once, preserving its order
    pub fn new(rules: &[CountryRule]) -> Result<Self, BuildError> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| (regex, rule.country.clone()))
                    .map_err(|e| BuildError::invalid_pattern("countries", &rule.pattern, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    pub fn from_config(config: &MatcherConfig) -> Result<Self, BuildError> {
        Self::new(&config.countries)
    }

    pub fn with_default_rules() -> Result<Self, BuildError> {
        Self::from_config(&MatcherConfig::default())
    }

    /// Country of the first pattern found anywhere in the raw text
    pub fn classify(&self, raw_text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(raw_text))
            .map(|(_, country)| country.as_str())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CountryClassifier {
        CountryClassifier::with_default_rules().unwrap()
    }

    #[test]
    fn test_builtin_table_compiles() {
        assert_eq!(classifier().rule_count(), COUNTRY_PATTERNS.len());
    }

    #[test]
    fn test_common_countries() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("Dept. of Physics, Harvard Univ., USA"),
            Some("United States")
        );
        assert_eq!(classifier.classify("University of Oxford, Oxford, UK"), Some("United Kingdom"));
        assert_eq!(classifier.classify("Tsinghua University, Beijing 100084"), Some("China"));
        assert_eq!(classifier.classify("ETH Zürich, Switzerland"), Some("Switzerland"));
    }

    #[test]
    fn test_overlapping_names_resolve_by_order() {
        let classifier = classifier();
        assert_eq!(classifier.classify("University of Sydney, New South Wales"), Some("Australia"));
        assert_eq!(classifier.classify("University of New Mexico, Albuquerque"), Some("United States"));
        assert_eq!(classifier.classify("Queen's University Belfast, Northern Ireland"), Some("United Kingdom"));
        assert_eq!(classifier.classify("Trinity College Dublin, Ireland"), Some("Ireland"));
    }

    #[test]
    fn test_raw_text_is_case_sensitive() {
        // "usa" inside a lowercase word must not classify
        assert_eq!(classifier().classify("causal inference lab"), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classifier().classify("xyz123 not a real place"), None);
        assert_eq!(classifier().classify(""), None);
    }

    #[test]
    fn test_first_match_wins_not_best_match() {
        let rules = vec![
            CountryRule { pattern: "Paris".into(), country: "France".into() },
            CountryRule { pattern: r"Paris, Texas".into(), country: "United States".into() },
        ];
        let classifier = CountryClassifier::new(&rules).unwrap();
        assert_eq!(classifier.classify("Paris, Texas"), Some("France"));
    }
}
