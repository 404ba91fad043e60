// WHY: Build-time failures need to be matchable by callers (a cycle is a data defect,
// an empty registry is an operational one), so they get a typed enum instead of anyhow

use thiserror::Error;

/// Fatal conditions raised while compiling tables or building the match index
#[derive(Debug, Error)]
pub enum BuildError {
    /// The registry snapshot contained no institute records at all
    #[error("registry snapshot is empty, refusing to build a match index")]
    EmptyRegistry,

    /// Every record was skipped as malformed
    #[error("none of the {total} registry records carry a name, an id and a country")]
    NoUsableRecords { total: usize },

    /// Following parent links revisited an identifier before reaching a root
    #[error("parent relationship cycle detected: {}", chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },

    /// A configured regex failed to compile
    #[error("invalid pattern in {table} table: {pattern}")]
    InvalidPattern {
        table: &'static str,
        pattern: String,
        #[source]
        source: Box<regex_automata::meta::BuildError>,
    },
}

impl BuildError {
    pub(crate) fn invalid_pattern(
        table: &'static str,
        pattern: &str,
        source: regex_automata::meta::BuildError,
    ) -> Self {
        Self::InvalidPattern {
            table,
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}
