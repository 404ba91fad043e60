// WHY: Affiliation text is full of "Univ.", "Dept.", "Inst." while the registry spells names out;
// expanding them on the query side lets full-name patterns hit abbreviated input

use regex_automata::meta::Regex;

use crate::config::{LiteralRule, RegexRule};
use crate::error::BuildError;

/// Regex expansions applied to raw text before punctuation is stripped
/// Order matters: each rule sees the output of the ones before it
pub const ABBREVIATION_RULES: &[(&str, &str)] = &[
    (r"(?i)\bUniv\b\.?", "University"),
    (r"(?i)\bUni\.", "University"),
    (r"(?i)\bUniversit\.", "University"),
    (r"(?i)\bDepts?\b\.?", "Department"),
    (r"(?i)\bDep\.", "Department"),
    (r"(?i)\bInst\b\.?", "Institute"),
    (r"(?i)\bInstit\.", "Institute"),
    (r"(?i)\bTech\.", "Technology"),
    (r"(?i)\bTechnol\b\.?", "Technology"),
    (r"(?i)\bNatl\b\.?", "National"),
    (r"(?i)\bNat\.", "National"),
    (r"(?i)\bIntl\b\.?", "International"),
    (r"(?i)\bCtr\b\.?", "Center"),
    (r"(?i)\bLab\.", "Laboratory"),
    (r"(?i)\bLabs\.", "Laboratories"),
    (r"(?i)\bHosp\b\.?", "Hospital"),
    (r"(?i)\bColl\b\.?", "College"),
    (r"(?i)\bAcad\b\.?", "Academy"),
    (r"(?i)\bSch\b\.?", "School"),
    (r"(?i)\bFac\.", "Faculty"),
    (r"(?i)\bSci\.", "Science"),
    (r"(?i)\bMed\.", "Medical"),
    (r"(?i)\bRes\.", "Research"),
    (r"(?i)\bAssoc\b\.?", "Association"),
    (r"(?i)\bFdn\b\.?", "Foundation"),
    (r"(?i)\bPolytech\.", "Polytechnic"),
];

/// Literal token rewrites applied to normalized text
/// Keys carry surrounding spaces so only whole tokens are rewritten
pub const INSTITUTION_ABBREVIATIONS: &[(&str, &str)] = &[
    (" univ ", " university "),
    (" inst ", " institute "),
    (" dept ", " department "),
    (" natl ", " national "),
    (" ctr ", " center "),
    (" hosp ", " hospital "),
    (" acad ", " academy "),
    (" coll ", " college "),
    (" labs ", " laboratories "),
];

/// Upper bound on repeated passes of one literal rule; a rule whose output
/// contains its own key would otherwise never settle
const MAX_TOKEN_PASSES: usize = 8;

/// Replace every non-overlapping match of `regex` in `text` with a literal replacement
pub(crate) fn replace_all(regex: &Regex, text: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for found in regex.find_iter(text) {
        result.push_str(&text[last_end..found.start()]);
        result.push_str(replacement);
        last_end = found.end();
    }

    result.push_str(&text[last_end..]);
    result
}

/// Compiled abbreviation tables, applied in configured order
pub struct AbbreviationExpander {
    regex_rules: Vec<(Regex, String)>,
    literal_rules: Vec<(String, String)>,
}

impl AbbreviationExpander {
    /// Compile both tables once
    pub fn new(regex_rules: &[RegexRule], literal_rules: &[LiteralRule]) -> Result<Self, BuildError> {
        let regex_rules = regex_rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| (regex, rule.replacement.clone()))
                    .map_err(|e| BuildError::invalid_pattern("abbreviations", &rule.pattern, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let literal_rules = literal_rules
            .iter()
            .filter(|rule| !rule.from.is_empty())
            .map(|rule| (rule.from.clone(), rule.to.clone()))
            .collect();

        Ok(Self {
            regex_rules,
            literal_rules,
        })
    }

    /// Apply the regex table to raw (not yet normalized) text
    pub fn expand_patterns(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (regex, replacement) in &self.regex_rules {
            current = replace_all(regex, &current, replacement);
        }
        current
    }

    /// Apply the literal token table to normalized text
    /// WHY: padding lets token-form keys like " inst " match the first and last token too
    pub fn expand_tokens(&self, normalized: &str) -> String {
        let mut current = format!(" {normalized} ");
        for (from, to) in &self.literal_rules {
            // Adjacent repeats share a separator, so one pass rewrites only every other one
            for _ in 0..MAX_TOKEN_PASSES {
                if !current.contains(from.as_str()) {
                    break;
                }
                let next = current.replace(from.as_str(), to);
                if next == current {
                    break;
                }
                current = next;
            }
        }
        current.trim().to_string()
    }

    pub fn regex_rule_count(&self) -> usize {
        self.regex_rules.len()
    }

    pub fn literal_rule_count(&self) -> usize {
        self.literal_rules.len()
    }
}
