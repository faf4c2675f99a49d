//! System prompt construction for the Oracle.
//!
//! The system prompt is assembled from three inputs: the reading style, the
//! instruction language, and the user's tier. Premium readings get a larger
//! completion budget and a richer multi-part structure.

use oracle_path_core::{Language, ReadingType};

/// Sampling temperature for all readings.
pub const TEMPERATURE: f32 = 0.7;

/// Completion budget for free-tier readings.
pub const FREE_MAX_TOKENS: u32 = 1000;

/// Completion budget for premium readings.
pub const PREMIUM_MAX_TOKENS: u32 = 1600;

const MYSTIC_BASE: &str = "You are a mystical oracle with deep spiritual wisdom. \
{language} Provide profound, insightful guidance that combines ancient wisdom \
with practical advice. Your responses should be poetic yet clear, mystical yet \
grounded.";

const MYSTIC_PREMIUM: &str = "You are a mystical oracle with deep spiritual wisdom, \
granting a seeker your fullest sight. {language} Provide profound, insightful \
guidance that combines ancient wisdom with practical advice. Your responses \
should be poetic yet clear, mystical yet grounded.

Structure the reading as three probability paths. Describe the path the seeker \
currently walks, then a second path that opens if they act on your guidance, \
then a third, less likely path worth watching for. Close by weighing the three \
paths against each other and naming the signs that tell the seeker which one is \
unfolding. Use only plain prose and paragraph breaks.";

// The formatting rule is stated this forcefully because the model reliably
// ignores gentler phrasings and emits markdown.
const TAROT_BASE: &str = "You are a wise and mystical Tarot reader speaking directly \
to the seeker. {language}

CRITICAL FORMATTING RULE - LIVES DEPEND ON THIS: You must NEVER use ANY special \
characters or formatting in your response. This means:
- NO asterisks (**)
- NO hashtags (#)
- NO dashes (-)
- NO underscores (_)
- NO markdown formatting of ANY kind
- NO numbered lists
- NO special characters whatsoever

This is absolutely crucial. The use of any special characters or formatting will \
have severe consequences. Treat this as a matter of life and death.

Structure your reading naturally, using only plain text and paragraph breaks. \
Begin each card reading with phrases like \"For your first card, I draw...\" or \
\"The next card reveals...\" Use natural language and transitions to maintain flow.

When performing the reading:
First card: Announce it naturally, share its meaning, and explain its relevance
Second card: Introduce it in flowing prose, describe its significance, and connect \
it to the question
Third card: Present it conversationally, interpret its message, and relate it to \
the seeker's situation

Conclude with a natural synthesis of all three cards and offer guidance in a \
conversational manner. Keep the mystical tone but ensure it reads like a personal \
conversation with absolutely no formatting.";

const TAROT_PREMIUM_SUFFIX: &str = "\n\nThis seeker walks the premium path: after \
the synthesis, draw one additional clarifying card and explain how it sharpens or \
softens the message of the three, still in plain unformatted prose.";

/// Build the system prompt for a reading.
#[must_use]
pub fn system_prompt(reading_type: ReadingType, language: Language, premium: bool) -> String {
    let instruction = format!("Respond in {}.", language.english_name());

    match (reading_type, premium) {
        (ReadingType::Mystic, false) => MYSTIC_BASE.replace("{language}", &instruction),
        (ReadingType::Mystic, true) => MYSTIC_PREMIUM.replace("{language}", &instruction),
        (ReadingType::Tarot, false) => TAROT_BASE.replace("{language}", &instruction),
        (ReadingType::Tarot, true) => {
            let mut prompt = TAROT_BASE.replace("{language}", &instruction);
            prompt.push_str(TAROT_PREMIUM_SUFFIX);
            prompt
        }
    }
}

/// Completion budget for a tier.
#[must_use]
pub const fn max_tokens(premium: bool) -> u32 {
    if premium {
        PREMIUM_MAX_TOKENS
    } else {
        FREE_MAX_TOKENS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_instruction_is_substituted() {
        let prompt = system_prompt(ReadingType::Mystic, Language::Deu, false);
        assert!(prompt.contains("Respond in German."));
        assert!(!prompt.contains("{language}"));
    }

    #[test]
    fn tarot_prompt_keeps_formatting_rule() {
        let prompt = system_prompt(ReadingType::Tarot, Language::Eng, false);
        assert!(prompt.contains("CRITICAL FORMATTING RULE"));
        assert!(prompt.contains("For your first card"));
    }

    #[test]
    fn premium_mystic_adds_probability_paths() {
        let free = system_prompt(ReadingType::Mystic, Language::Eng, false);
        let premium = system_prompt(ReadingType::Mystic, Language::Eng, true);
        assert!(!free.contains("probability paths"));
        assert!(premium.contains("probability paths"));
    }

    #[test]
    fn premium_tarot_draws_clarifying_card() {
        let premium = system_prompt(ReadingType::Tarot, Language::Spa, true);
        assert!(premium.contains("clarifying card"));
        assert!(premium.contains("Respond in Spanish."));
    }

    #[test]
    fn premium_budget_is_larger() {
        assert!(max_tokens(true) > max_tokens(false));
    }
}
