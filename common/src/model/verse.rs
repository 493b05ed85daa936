use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length, in characters, of the original-script text.
pub const MAX_SLOKA_LEN: usize = 1000;
/// Maximum length, in characters, of the transliteration.
pub const MAX_TRANSLITERATION_LEN: usize = 1000;
/// Maximum length, in characters, of the translation.
pub const MAX_TRANSLATION_LEN: usize = 2000;
/// Maximum length, in characters, of the source label.
pub const MAX_SOURCE_LEN: usize = 200;

/// A verse as served by the API.
///
/// `id`, `created_at` and `updated_at` are assigned by the store when the verse
/// is loaded and never change afterwards. Absent optional fields are omitted
/// from the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    pub id: String,
    pub sloka: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One element of the bulk loader's input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerse {
    pub sloka: String,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerseError {
    #[error("sloka is required")]
    MissingSloka,

    #[error("{field} exceeds {max} characters ({len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
}

impl NewVerse {
    /// Trims every field, drops empty optional fields and enforces the length caps.
    pub fn normalize(self) -> Result<NewVerse, VerseError> {
        let sloka = self.sloka.trim().to_string();
        if sloka.is_empty() {
            return Err(VerseError::MissingSloka);
        }
        check_len("sloka", &sloka, MAX_SLOKA_LEN)?;

        let transliteration = normalize_optional(self.transliteration);
        let translation = normalize_optional(self.translation);
        let source = normalize_optional(self.source);

        if let Some(t) = &transliteration {
            check_len("transliteration", t, MAX_TRANSLITERATION_LEN)?;
        }
        if let Some(t) = &translation {
            check_len("translation", t, MAX_TRANSLATION_LEN)?;
        }
        if let Some(s) = &source {
            check_len("source", s, MAX_SOURCE_LEN)?;
        }

        Ok(NewVerse {
            sloka,
            transliteration,
            translation,
            source,
        })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), VerseError> {
    let len = value.chars().count();
    if len > max {
        return Err(VerseError::TooLong { field, max, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(sloka: &str) -> NewVerse {
        NewVerse {
            sloka: sloka.to_string(),
            transliteration: None,
            translation: None,
            source: None,
        }
    }

    #[test]
    fn trims_and_drops_blank_optionals() {
        let v = NewVerse {
            sloka: "  धर्मक्षेत्रे  ".to_string(),
            transliteration: Some("   ".to_string()),
            translation: Some(" On the field of dharma ".to_string()),
            source: Some(" Bhagavad Gita 1.1\n".to_string()),
        }
        .normalize()
        .unwrap();

        assert_eq!(v.sloka, "धर्मक्षेत्रे");
        assert_eq!(v.transliteration, None);
        assert_eq!(v.translation.as_deref(), Some("On the field of dharma"));
        assert_eq!(v.source.as_deref(), Some("Bhagavad Gita 1.1"));
    }

    #[test]
    fn blank_sloka_is_rejected() {
        assert_eq!(verse(" \t ").normalize(), Err(VerseError::MissingSloka));
    }

    #[test]
    fn length_is_counted_in_characters() {
        // Devanagari characters are multi-byte; the cap applies to characters.
        let text = "क".repeat(MAX_SLOKA_LEN);
        assert!(verse(&text).normalize().is_ok());

        let too_long = "क".repeat(MAX_SLOKA_LEN + 1);
        assert_eq!(
            verse(&too_long).normalize(),
            Err(VerseError::TooLong {
                field: "sloka",
                max: MAX_SLOKA_LEN,
                len: MAX_SLOKA_LEN + 1
            })
        );
    }

    #[test]
    fn source_cap() {
        let mut v = verse("A");
        v.source = Some("s".repeat(MAX_SOURCE_LEN + 1));
        assert!(matches!(
            v.normalize(),
            Err(VerseError::TooLong { field: "source", .. })
        ));
    }

    #[test]
    fn record_omits_absent_fields() {
        let record = VerseRecord {
            id: "0b6d7c1e-58a5-4c1a-9a43-2f1f4f6f9d10".to_string(),
            sloka: "A".to_string(),
            transliteration: None,
            translation: Some("T".to_string()),
            source: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("transliteration").is_none());
        assert!(json.get("source").is_none());
        assert_eq!(json["translation"], "T");
        assert!(json.get("createdAt").is_some());
    }
}
