//! Fuzzy contact-name resolution.
//!
//! Spreadsheet rows refer to contacts by name ("Contact", "Customer"
//! columns). This module turns that free text into a contact:
//! - Exact name match after case/whitespace normalization scores 100
//! - Otherwise a `nucleo-matcher` fuzzy score, normalized to 0..=95
//! - A matching company boosts a fuzzy score by 15 (still capped at 95)

use crate::models::Contact;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Highest score a fuzzy match can reach; 100 is reserved for exact names.
const FUZZY_CEILING: u32 = 95;
const COMPANY_BOOST: u8 = 15;
/// Company names must clear this to count towards the boost.
const COMPANY_MIN_SCORE: u8 = 50;

/// A candidate contact and how confident the match is.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matched contact
    pub contact: Contact,

    /// Confidence score (0-100, where 100 is an exact match)
    pub confidence: u8,

    /// Type of match that produced this result
    pub match_type: MatchType,
}

/// The type of match that was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Normalized names are identical
    ExactName,

    /// Fuzzy name match
    FuzzyName,
}

/// Contact matcher backed by `nucleo-matcher`.
pub struct ContactMatcher {
    matcher: Matcher,
    buf: Vec<char>,
}

impl Default for ContactMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    /// Candidate contacts for `name`, best first.
    ///
    /// # Arguments
    /// * `name` - Free-text name from the spreadsheet
    /// * `company` - Company from the same row, if any
    /// * `contacts` - The user's contacts
    /// * `max_results` - Maximum number of results to return
    /// * `min_confidence` - Minimum confidence threshold (0-100)
    pub fn find_matches(
        &mut self,
        name: &str,
        company: Option<&str>,
        contacts: &[Contact],
        max_results: usize,
        min_confidence: u8,
    ) -> Vec<MatchResult> {
        let query = Self::normalize_name(name);
        if query.is_empty() {
            return Vec::new();
        }
        let company = company.map(Self::normalize_name).filter(|c| !c.is_empty());

        let mut results: Vec<MatchResult> = Vec::new();
        for contact in contacts {
            if Self::normalize_name(&contact.name) == query {
                results.push(MatchResult {
                    contact: contact.clone(),
                    confidence: 100,
                    match_type: MatchType::ExactName,
                });
                continue;
            }

            let Some(mut confidence) = self.fuzzy_score(&query, &contact.name) else {
                continue;
            };
            if let (Some(query_company), Some(contact_company)) = (&company, &contact.company) {
                let company_score = self.fuzzy_score(query_company, contact_company);
                if company_score.is_some_and(|s| s > COMPANY_MIN_SCORE) {
                    confidence = (confidence + COMPANY_BOOST).min(FUZZY_CEILING as u8);
                }
            }

            if confidence >= min_confidence {
                results.push(MatchResult {
                    contact: contact.clone(),
                    confidence,
                    match_type: MatchType::FuzzyName,
                });
            }
        }

        results.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| a.contact.name.cmp(&b.contact.name))
        });
        results.truncate(max_results);
        results
    }

    /// The single best contact for `name` at or above `min_confidence`.
    pub fn resolve(
        &mut self,
        name: &str,
        company: Option<&str>,
        contacts: &[Contact],
        min_confidence: u8,
    ) -> Option<MatchResult> {
        self.find_matches(name, company, contacts, 1, min_confidence)
            .into_iter()
            .next()
    }

    /// Fuzzy score of `query` against `target`, scaled so that the query
    /// matched against itself would score 95.
    fn fuzzy_score(&mut self, query: &str, target: &str) -> Option<u8> {
        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let best = pattern.score(Utf32Str::new(query, &mut self.buf), &mut self.matcher)?;
        let score = pattern.score(Utf32Str::new(target, &mut self.buf), &mut self.matcher)?;
        if best == 0 || score == 0 {
            return None;
        }
        let scaled = (score.saturating_mul(FUZZY_CEILING) / best).min(FUZZY_CEILING);
        Some(scaled as u8)
    }

    /// Lowercase and collapse runs of whitespace.
    pub fn normalize_name(name: &str) -> String {
        name.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
