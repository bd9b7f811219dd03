//! Contact-name matching used when importing rows that reference contacts.

pub mod fuzzy_matcher;

pub use fuzzy_matcher::{ContactMatcher, MatchResult, MatchType};
