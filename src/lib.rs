pub mod batch;
pub mod config;
pub mod country;
pub mod error;
pub mod index;
pub mod matcher;
pub mod registry;
pub mod text;

// Re-export main types for convenient access
pub use matcher::{MatchResult, MatchScope, Matcher};
pub use error::BuildError;
pub use config::MatcherConfig;

// Re-export index construction types
pub use index::{IndexBuilder, IndexStats, MatchEntry, MatchIndex, ParentMap, ScopedPatterns};

// Re-export registry and text utilities
pub use registry::{InstituteRecord, Registry};
pub use country::CountryClassifier;
pub use text::{normalize_affiliation, Normalizer};

pub use batch::{match_batch_parallel, BatchConfig, BatchStats};
