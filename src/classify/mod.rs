//! Rule-based Document Classifiers
//!
//! Two independent axes computed from plain text with fixed keyword tables:
//! - Nature: what kind of document this reads like (invoice, resume, ...)
//! - Authenticity: whether the text carries scam or trust signals
//!
//! Matching is case-insensitive substring search. Tables are ordered and the
//! first matching row wins, so the order of each table is part of its meaning.

mod authenticity;
mod nature;

pub use authenticity::{classify_authenticity, AuthenticityLabel};
pub use nature::{classify_nature, NatureLabel};

/// True when any keyword occurs in the already-lowercased text
fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text_lower.contains(kw))
}
