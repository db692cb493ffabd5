use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const PARSER_VERSION: &str = "1.0.0";

/// Section headings counted by `sections_detected`. Matched case-insensitively anywhere in
/// the raw text, so the count is a rough signal only.
const SECTION_KEYWORDS: &[&str] = &[
    "education",
    "experience",
    "skills",
    "projects",
    "certifications",
    "awards",
    "leadership",
    "summary",
];

/// How the raw text reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Text,
    Pdf,
}

/// Upload context that feeds metadata. Never part of a document's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOrigin {
    pub kind: SourceKind,
    pub filename: Option<String>,
    pub structuring_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub timestamp: String,
    pub character_count: usize,
    pub word_count: usize,
    pub sections_detected: usize,
    pub parser_version: String,
    pub extraction_method: SourceKind,
    pub filename: Option<String>,
    pub structuring_model: String,
}

/// Derives the informational metadata stored next to a CV.
pub fn derive_metadata(
    raw_text: &str,
    origin: &DocumentOrigin,
    now: DateTime<Utc>,
) -> DocumentMetadata {
    let lower = raw_text.to_lowercase();
    DocumentMetadata {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        character_count: raw_text.chars().count(),
        word_count: raw_text.split_whitespace().count(),
        sections_detected: SECTION_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count(),
        parser_version: PARSER_VERSION.to_string(),
        extraction_method: origin.kind,
        filename: origin.filename.clone(),
        structuring_model: origin.structuring_model.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn origin(kind: SourceKind, filename: Option<&str>) -> DocumentOrigin {
        DocumentOrigin {
            kind,
            filename: filename.map(String::from),
            structuring_model: "test-model".to_string(),
        }
    }

    #[test]
    fn test_counts() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let meta = derive_metadata(
            "Jane Doe\nEXPERIENCE\nAcme - Engineer\nSkills: Rust, Go",
            &origin(SourceKind::Text, None),
            now,
        );
        assert_eq!(meta.word_count, 9);
        assert_eq!(meta.sections_detected, 2);
        assert_eq!(meta.timestamp, "2024-05-01T12:00:00.000Z");
        assert_eq!(meta.extraction_method, SourceKind::Text);
        assert_eq!(meta.parser_version, PARSER_VERSION);
    }

    #[test]
    fn test_character_count_uses_chars_not_bytes() {
        let meta = derive_metadata("Zoë", &origin(SourceKind::Text, None), Utc::now());
        assert_eq!(meta.character_count, 3);
    }

    #[test]
    fn test_pdf_origin_keeps_filename() {
        let meta = derive_metadata(
            "text",
            &origin(SourceKind::Pdf, Some("jane.pdf")),
            Utc::now(),
        );
        assert_eq!(meta.filename.as_deref(), Some("jane.pdf"));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["extraction_method"], "pdf");
        assert_eq!(json["filename"], "jane.pdf");
    }
}
