use serde::{Deserialize, Serialize};

use super::contains_any;

/// Trust signal carried by a text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticityLabel {
    Suspicious,
    LikelyReal,
    Unclear,
}

impl AuthenticityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suspicious => "suspicious",
            Self::LikelyReal => "likely_real",
            Self::Unclear => "unclear",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Suspicious => "Potentially Fake / Scam-like Document",
            Self::LikelyReal => "Likely Real Document",
            Self::Unclear => "Unclear Authenticity (Needs manual review)",
        }
    }
}

impl std::fmt::Display for AuthenticityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "lottery",
    "winner",
    "urgent payment",
    "claim prize",
    "nigerian prince",
    "click here",
    "100% guaranteed",
    "limited time offer",
    "congratulations you won",
    "bank transfer",
    "company-logo",
    "generated",
];

// Keywords must stay lowercase: they are matched against lowercased text.
// Bare "invoice", "google" and "this is to certify that" never counted as
// real signals and are left out.
const REAL_KEYWORDS: &[&str] = &[
    "invoice number",
    "tax id",
    "academic references",
    "official seal",
    "company registration",
    "signature",
    "terms and conditions",
    "research methodology",
    "certificate",
    "amount due",
    "payment",
    "receipt",
    "curriculum vitae",
    "resume",
    "experience",
    "skills",
    "education",
];

/// Suspicious signals are checked first and win over any real-document signal.
const AUTHENTICITY_RULES: &[(AuthenticityLabel, &[&str])] = &[
    (AuthenticityLabel::Suspicious, SUSPICIOUS_KEYWORDS),
    (AuthenticityLabel::LikelyReal, REAL_KEYWORDS),
];

pub fn classify_authenticity(text: &str) -> AuthenticityLabel {
    let text_lower = text.to_lowercase();

    AUTHENTICITY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&text_lower, keywords))
        .map(|(label, _)| *label)
        .unwrap_or(AuthenticityLabel::Unclear)
}
