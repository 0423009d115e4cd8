//! Query parsing and fuzzy matching.

pub mod fuzzy;
pub mod parse;
pub mod result;

pub use fuzzy::FuzzyQuery;
pub use parse::{CONSTRUCTOR_MARKER, ParsedQuery};
pub use result::{FuzzyResult, ResultKind};
