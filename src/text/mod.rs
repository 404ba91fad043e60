// WHY: Text folding shared by index construction and query preprocessing

pub mod abbreviations;
pub mod normalization;
pub mod transliterate;

pub use abbreviations::AbbreviationExpander;
pub use normalization::{normalize_affiliation, normalize_affiliation_into, Normalizer};
pub use transliterate::to_ascii_lower;
