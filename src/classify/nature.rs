use serde::{Deserialize, Serialize};

use super::contains_any;

/// Document genre
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NatureLabel {
    Invoice,
    Resume,
    ResearchPaper,
    Narrative,
    BlogArticle,
    Report,
    General,
}

impl NatureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Resume => "resume",
            Self::ResearchPaper => "research_paper",
            Self::Narrative => "narrative",
            Self::BlogArticle => "blog_article",
            Self::Report => "report",
            Self::General => "general",
        }
    }

    /// Human-readable label used in reports and CSV exports
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice / Financial Document",
            Self::Resume => "Resume / CV",
            Self::ResearchPaper => "Research Paper / Academic Document",
            Self::Narrative => "Story / Narrative",
            Self::BlogArticle => "Blog / Article",
            Self::Report => "Report / Business Document",
            Self::General => "General Document",
        }
    }
}

impl std::fmt::Display for NatureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Priority-ordered keyword table. `General` has no row: it is the fallback.
const NATURE_RULES: &[(NatureLabel, &[&str])] = &[
    (
        NatureLabel::Invoice,
        &["invoice", "amount due", "payment", "receipt"],
    ),
    (
        NatureLabel::Resume,
        &["curriculum vitae", "resume", "experience", "skills", "education"],
    ),
    (
        NatureLabel::ResearchPaper,
        &["research", "methodology", "references", "abstract", "study"],
    ),
    (
        NatureLabel::Narrative,
        &["story", "once upon", "narrative", "characters"],
    ),
    (
        NatureLabel::BlogArticle,
        &["blog", "post", "article", "tips", "guide"],
    ),
    (
        NatureLabel::Report,
        &["report", "summary", "analysis", "findings"],
    ),
];

/// Classify the genre of a text. First matching row of `NATURE_RULES` wins.
pub fn classify_nature(text: &str) -> NatureLabel {
    let text_lower = text.to_lowercase();

    NATURE_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&text_lower, keywords))
        .map(|(label, _)| *label)
        .unwrap_or(NatureLabel::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_beats_resume() {
        let text = "Resume attached together with the invoice for last month";
        assert_eq!(classify_nature(text), NatureLabel::Invoice);
    }

    #[test]
    fn test_no_keywords_is_general() {
        assert_eq!(classify_nature("The cat sat on the mat."), NatureLabel::General);
        assert_eq!(classify_nature(""), NatureLabel::General);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify_nature("AMOUNT DUE: $40"), NatureLabel::Invoice);
        assert_eq!(classify_nature("Curriculum Vitae"), NatureLabel::Resume);
    }

    #[test]
    fn test_each_row_reachable() {
        assert_eq!(classify_nature("Our methodology"), NatureLabel::ResearchPaper);
        assert_eq!(classify_nature("Once upon a time"), NatureLabel::Narrative);
        assert_eq!(classify_nature("Ten tips for gardening"), NatureLabel::BlogArticle);
        assert_eq!(classify_nature("Key findings"), NatureLabel::Report);
    }

    #[test]
    fn test_substring_match_inside_words() {
        // "poster" contains "post"
        assert_eq!(classify_nature("A poster on the wall"), NatureLabel::BlogArticle);
    }

    #[test]
    fn test_table_order_matches_priority() {
        let order: Vec<NatureLabel> = NATURE_RULES.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            order,
            vec![
                NatureLabel::Invoice,
                NatureLabel::Resume,
                NatureLabel::ResearchPaper,
                NatureLabel::Narrative,
                NatureLabel::BlogArticle,
                NatureLabel::Report,
            ]
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(NatureLabel::Invoice.to_string(), "Invoice / Financial Document");
        assert_eq!(NatureLabel::General.as_str(), "general");
    }
}
