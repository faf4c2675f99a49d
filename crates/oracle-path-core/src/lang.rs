//! Best-effort prompt language detection.
//!
//! Detection is advisory only: it shapes the instruction sent to the
//! inference backend and never blocks a submission. Short or ambiguous
//! prompts fall back to English.

use whatlang::Lang;

use crate::Language;

/// Prompts shorter than this (after trimming) skip detection entirely;
/// the classifier is unreliable on tiny inputs.
pub const MIN_DETECTION_LENGTH: usize = 20;

/// Minimum classifier confidence to accept a detection result.
const MIN_CONFIDENCE: f64 = 0.5;

/// Detect the language of a prompt, defaulting to English.
///
/// Returns English when the prompt is too short, the classifier is not
/// confident, or the detected language is outside the supported set.
#[must_use]
pub fn detect_language(prompt: &str) -> Language {
    let trimmed = prompt.trim();
    if trimmed.len() < MIN_DETECTION_LENGTH {
        return Language::Eng;
    }

    let Some(info) = whatlang::detect(trimmed) else {
        return Language::Eng;
    };

    if info.confidence() < MIN_CONFIDENCE {
        return Language::Eng;
    }

    map_lang(info.lang()).unwrap_or(Language::Eng)
}

const fn map_lang(lang: Lang) -> Option<Language> {
    match lang {
        Lang::Eng => Some(Language::Eng),
        Lang::Deu => Some(Language::Deu),
        Lang::Spa => Some(Language::Spa),
        Lang::Fra => Some(Language::Fra),
        Lang::Ita => Some(Language::Ita),
        Lang::Por => Some(Language::Por),
        Lang::Nld => Some(Language::Nld),
        Lang::Swe => Some(Language::Swe),
        // whatlang reports Norwegian Bokmål as `Nob`.
        Lang::Nob => Some(Language::Nor),
        Lang::Dan => Some(Language::Dan),
        Lang::Pol => Some(Language::Pol),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_prompt_defaults_to_english() {
        assert_eq!(detect_language("hi"), Language::Eng);
        assert_eq!(detect_language("   "), Language::Eng);
    }

    #[test]
    fn english_prompt_detected() {
        let prompt = "Will I find success in my new career this year?";
        assert_eq!(detect_language(prompt), Language::Eng);
    }

    #[test]
    fn german_prompt_detected() {
        let prompt = "Werde ich in diesem Jahr beruflichen Erfolg haben und meine Ziele erreichen?";
        assert_eq!(detect_language(prompt), Language::Deu);
    }

    #[test]
    fn spanish_prompt_detected() {
        let prompt = "¿Encontraré el amor verdadero este año o debo esperar un poco más?";
        assert_eq!(detect_language(prompt), Language::Spa);
    }

    #[test]
    fn unsupported_language_falls_back_to_english() {
        // Japanese is outside the supported instruction set.
        let prompt = "今年は仕事で成功するでしょうか。新しい挑戦を始めるべきですか。";
        assert_eq!(detect_language(prompt), Language::Eng);
    }
}
