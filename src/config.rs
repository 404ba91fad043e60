// WHY: The lookup tables are curated data, versioned separately from the engine;
// built-ins ship with the crate and a TOML file may replace any of them

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::country::COUNTRY_PATTERNS;
use crate::index::ambiguity::AMBIGUOUS_NAMES;
use crate::index::overrides::MANUAL_OVERRIDES;
use crate::text::abbreviations::{ABBREVIATION_RULES, INSTITUTION_ABBREVIATIONS};

/// Regex substitution applied to raw affiliation text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexRule {
    pub pattern: String,
    pub replacement: String,
}

/// Literal substring substitution applied to normalized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralRule {
    pub from: String,
    pub to: String,
}

/// Regex that, when found in raw text, implies a registry country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRule {
    pub pattern: String,
    pub country: String,
}

/// Curated pattern that bypasses the ambiguity filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub country: String,
    pub pattern: String,
    pub canonical_name: String,
}

/// All static tables consumed by the normalizer, classifier and index builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Normalized names never used as patterns
    pub ambiguous_names: Vec<String>,
    /// Ordered regex expansions run before punctuation stripping
    pub abbreviations: Vec<RegexRule>,
    /// Ordered literal token expansions run after punctuation stripping
    pub institution_abbreviations: Vec<LiteralRule>,
    /// Ordered country patterns, first match wins
    pub countries: Vec<CountryRule>,
    pub manual_overrides: Vec<ManualOverride>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            ambiguous_names: AMBIGUOUS_NAMES.iter().map(|name| name.to_string()).collect(),
            abbreviations: ABBREVIATION_RULES
                .iter()
                .map(|&(pattern, replacement)| RegexRule {
                    pattern: pattern.to_string(),
                    replacement: replacement.to_string(),
                })
                .collect(),
            institution_abbreviations: INSTITUTION_ABBREVIATIONS
                .iter()
                .map(|&(from, to)| LiteralRule {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
            countries: COUNTRY_PATTERNS
                .iter()
                .map(|&(pattern, country)| CountryRule {
                    pattern: pattern.to_string(),
                    country: country.to_string(),
                })
                .collect(),
            manual_overrides: MANUAL_OVERRIDES
                .iter()
                .map(|&(country, pattern, canonical_name)| ManualOverride {
                    country: country.to_string(),
                    pattern: pattern.to_string(),
                    canonical_name: canonical_name.to_string(),
                })
                .collect(),
        }
    }
}

impl MatcherConfig {
    /// Parse a TOML document; tables it omits keep their built-in values
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file does not exist: {}", path.display());
        }

        let content = fs::read_to_string(path).await?;
        let config = Self::from_toml_str(&content)?;

        info!(
            "Loaded matcher config from {}: {} abbreviation rules, {} country rules, {} ambiguous names, {} overrides",
            path.display(),
            config.abbreviations.len(),
            config.countries.len(),
            config.ambiguous_names.len(),
            config.manual_overrides.len()
        );

        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
