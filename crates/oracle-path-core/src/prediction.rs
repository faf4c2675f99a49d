//! Prediction records and reading parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PredictionId, UserId};

/// The style of reading the Oracle performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    /// Free-form mystical guidance (the default).
    Mystic,

    /// A three-card tarot reading.
    Tarot,
}

impl Default for ReadingType {
    fn default() -> Self {
        Self::Mystic
    }
}

impl ReadingType {
    /// Get the reading type name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mystic => "mystic",
            Self::Tarot => "tarot",
        }
    }
}

/// Languages the Oracle can be instructed to answer in.
///
/// Anything outside this set falls back to English; the language only shapes
/// the instruction given to the inference backend and never blocks a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    Eng,
    /// German.
    Deu,
    /// Spanish.
    Spa,
    /// French.
    Fra,
    /// Italian.
    Ita,
    /// Portuguese.
    Por,
    /// Dutch.
    Nld,
    /// Swedish.
    Swe,
    /// Norwegian.
    Nor,
    /// Danish.
    Dan,
    /// Polish.
    Pol,
}

impl Language {
    /// Parse a three-letter language code, if supported.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "eng" => Some(Self::Eng),
            "deu" => Some(Self::Deu),
            "spa" => Some(Self::Spa),
            "fra" => Some(Self::Fra),
            "ita" => Some(Self::Ita),
            "por" => Some(Self::Por),
            "nld" => Some(Self::Nld),
            "swe" => Some(Self::Swe),
            "nor" => Some(Self::Nor),
            "dan" => Some(Self::Dan),
            "pol" => Some(Self::Pol),
            _ => None,
        }
    }

    /// The three-letter code for this language.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eng => "eng",
            Self::Deu => "deu",
            Self::Spa => "spa",
            Self::Fra => "fra",
            Self::Ita => "ita",
            Self::Por => "por",
            Self::Nld => "nld",
            Self::Swe => "swe",
            Self::Nor => "nor",
            Self::Dan => "dan",
            Self::Pol => "pol",
        }
    }

    /// The English name of this language, used in inference instructions.
    #[must_use]
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Eng => "English",
            Self::Deu => "German",
            Self::Spa => "Spanish",
            Self::Fra => "French",
            Self::Ita => "Italian",
            Self::Por => "Portuguese",
            Self::Nld => "Dutch",
            Self::Swe => "Swedish",
            Self::Nor => "Norwegian",
            Self::Dan => "Danish",
            Self::Pol => "Polish",
        }
    }
}

/// A stored question/answer pair.
///
/// Immutable once created; owned solely by the requesting user. The history
/// is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Unique, time-ordered identifier.
    pub id: PredictionId,

    /// The user who asked.
    pub user_id: UserId,

    /// The question as submitted (after trimming).
    pub prompt: String,

    /// The Oracle's answer.
    pub prediction: String,

    /// Whether the request was served on the premium tier.
    pub is_premium: bool,

    /// Instruction language used, if one was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    /// Reading style used, if one was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<ReadingType>,

    /// When the prediction was created.
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Create a new prediction record with a fresh time-ordered ID.
    #[must_use]
    pub fn new(
        user_id: UserId,
        prompt: String,
        prediction: String,
        is_premium: bool,
        language: Option<Language>,
        reading_type: Option<ReadingType>,
    ) -> Self {
        Self {
            id: PredictionId::generate(),
            user_id,
            prompt,
            prediction,
            is_premium,
            language,
            reading_type,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_roundtrip() {
        for code in [
            "eng", "deu", "spa", "fra", "ita", "por", "nld", "swe", "nor", "dan", "pol",
        ] {
            let lang = Language::from_code(code).unwrap();
            assert_eq!(lang.code(), code);
        }
    }

    #[test]
    fn unsupported_language_code() {
        assert!(Language::from_code("jpn").is_none());
        assert!(Language::from_code("").is_none());
        assert!(Language::from_code("english").is_none());
    }

    #[test]
    fn language_serde_uses_code() {
        let json = serde_json::to_string(&Language::Deu).unwrap();
        assert_eq!(json, "\"deu\"");
        let parsed: Language = serde_json::from_str("\"pol\"").unwrap();
        assert_eq!(parsed, Language::Pol);
    }

    #[test]
    fn reading_type_serde() {
        let parsed: ReadingType = serde_json::from_str("\"tarot\"").unwrap();
        assert_eq!(parsed, ReadingType::Tarot);
        assert_eq!(ReadingType::default(), ReadingType::Mystic);
    }

    #[test]
    fn record_carries_optional_fields() {
        let record = PredictionRecord::new(
            UserId::generate(),
            "Will it rain?".into(),
            "The clouds whisper of change.".into(),
            false,
            Some(Language::Eng),
            None,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["language"], "eng");
        assert!(json.get("reading_type").is_none());
    }
}
