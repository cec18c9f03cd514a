// Prompts for the field correction request

use crate::llm::types::ChatMessage;
use crate::note::SNAPSHOT_FIELD;

/// Marker a user can put in a field to ask for wording improvements on top of
/// spelling fixes.
pub const IMPROVE_MARKER: &str = "!improve";

pub const SYSTEM_PROMPT: &str = r#"
You are a helpful assistant that corrects flashcards.

## YOUR MISSION
Your primary role is to correct spelling errors in each field of the card.

## WHEN TO GO FURTHER
- If a field needs more help (awkward phrasing, unclear wording), or the text contains the `!improve` marker, you may also fix grammar and tighten the wording for clarity and effective learning.
- Usually less is more. The user may prefer informal language and shorter sentences. Do not make the text wordier.

## STRICT RULES
1. Do NOT expand contractions: keep "don't" as "don't", never "do not".
2. Do NOT add ending punctuation unless it is already present in the text.
3. Fields are HTML. Keep the existing formatting exactly. If you add formatting of your own, use only Anki supported HTML tags (<b>, <i>, <u>, <br>, <sub>, <sup>).
4. If a field needs no changes, return its text unaltered.

## OUTPUT FORMAT
Return a single JSON object matching the provided schema: one key per field name, each holding the corrected text as a string.
"#;

pub const USER_INSTRUCTION: &str =
    "Correct the following text and return a JSON object containing the corrected fields:";

/// Builds the user turn: the instruction followed by one `name: value` line
/// per field. The snapshot field is never sent.
pub fn compose_user_prompt<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut lines = vec![USER_INSTRUCTION.to_string()];
    lines.extend(
        fields
            .into_iter()
            .filter(|(name, _)| *name != SNAPSHOT_FIELD)
            .map(|(name, value)| format!("{}: {}", name, value)),
    );
    lines.join("\n")
}

pub fn compose_messages<'a>(
    fields: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT.trim()),
        ChatMessage::user(compose_user_prompt(fields)),
    ]
}
