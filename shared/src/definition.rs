//! Dictionary definitions: canned mock payload, prompt construction and
//! normalization of raw model output into [`DefinitionResponse`].

use tracing::warn;

use crate::llm::{ChatMessage, CompletionRequest};
use crate::models::{DefinitionResponse, Example, Synonym};

/// Confidence reported when the model output could not be parsed.
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

/// Part of speech reported when the model output could not be parsed.
pub const FALLBACK_PART_OF_SPEECH: &str = "unknown";

const SYSTEM_PROMPT: &str = "You are a helpful dictionary assistant. Provide accurate, concise \
definitions in the exact JSON format requested. Always respond with valid JSON only.";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;

/// Canned definition with `word` set to the caller's text.
pub fn mock_definition(text: &str) -> DefinitionResponse {
    DefinitionResponse {
        word: text.to_string(),
        part_of_speech: "noun".to_string(),
        definition: "A concise, structured explanation generated in mock mode for demonstration \
                     purposes."
            .to_string(),
        examples: vec![
            Example {
                sentence: "The term is used frequently in modern AI discussions.".to_string(),
                context: "Researchers defined the term in multiple ways.".to_string(),
            },
            Example {
                sentence: "Understanding the term improves product clarity.".to_string(),
                context: "Understanding the term improves product clarity.".to_string(),
            },
        ],
        synonyms: vec![
            synonym("concept", "high"),
            synonym("notion", "medium"),
            synonym("idea", "medium"),
            synonym("term", "low"),
            synonym("expression", "low"),
        ],
        confidence: 0.95,
    }
}

fn synonym(word: &str, similarity: &str) -> Synonym {
    Synonym {
        word: word.to_string(),
        similarity: similarity.to_string(),
    }
}

/// Chat completion asking the model for a JSON definition of `text`.
pub fn definition_completion(model: &str, text: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(definition_prompt(text)),
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

fn definition_prompt(text: &str) -> String {
    // The word is JSON-escaped so quotes in user text keep the example valid.
    let word = serde_json::Value::String(text.to_string());
    format!(
        r#"Define the following text/phrase: "{text}"

Provide a comprehensive definition including:
1. The main definition/meaning
2. Part of speech (if applicable)
3. 2-3 example sentences showing usage
4. 3-5 synonyms with similarity levels
5. A confidence score (0-1) for your definition

Format your response as JSON with the following structure:
{{
    "word": {word},
    "part_of_speech": "noun/verb/adjective/phrase/etc",
    "definition": "Clear, concise definition",
    "examples": [
        {{"sentence": "Example sentence", "context": "Brief context"}},
        {{"sentence": "Another example", "context": "Brief context"}}
    ],
    "synonyms": [
        {{"word": "synonym1", "similarity": "high/medium/low"}},
        {{"word": "synonym2", "similarity": "high/medium/low"}}
    ],
    "confidence": 0.9
}}"#
    )
}

/// Remove a leading ```` ```json ```` fence and a trailing ```` ``` ```` fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let body = raw.strip_prefix("```json").unwrap_or(raw);
    body.strip_suffix("```").unwrap_or(body)
}

/// Parse raw model output into a definition.
///
/// Malformed JSON or a schema mismatch yields a degraded response carrying
/// the raw text as the definition; this never fails.
pub fn normalize(raw: &str, text: &str) -> DefinitionResponse {
    match serde_json::from_str::<DefinitionResponse>(strip_code_fence(raw)) {
        Ok(definition) => definition,
        Err(e) => {
            warn!(error = %e, raw_len = raw.len(), "Model output is not a valid definition");
            DefinitionResponse {
                word: text.to_string(),
                part_of_speech: FALLBACK_PART_OF_SPEECH.to_string(),
                definition: raw.to_string(),
                examples: Vec::new(),
                synonyms: Vec::new(),
                confidence: FALLBACK_CONFIDENCE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "word": "ubiquitous",
        "part_of_speech": "adjective",
        "definition": "Present everywhere.",
        "examples": [{"sentence": "Phones are ubiquitous.", "context": "technology"}],
        "synonyms": [{"word": "omnipresent", "similarity": "high"}],
        "confidence": 0.92
    }"#;

    #[test]
    fn test_mock_overwrites_only_word() {
        let mock = mock_definition("ubiquitous");
        assert_eq!(mock.word, "ubiquitous");
        assert_eq!(mock.part_of_speech, "noun");
        assert_eq!(mock.confidence, 0.95);
        assert_eq!(mock.examples.len(), 2);
        assert_eq!(mock.examples[1].context, mock.examples[1].sentence);
        assert_eq!(mock.synonyms.len(), 5);

        let other = mock_definition("serendipity");
        assert_eq!(
            DefinitionResponse {
                word: "ubiquitous".to_string(),
                ..other
            },
            mock
        );
    }

    #[test]
    fn test_normalize_plain_json() {
        let definition = normalize(VALID, "ubiquitous");
        assert_eq!(definition.part_of_speech, "adjective");
        assert_eq!(definition.synonyms[0].word, "omnipresent");
        assert_eq!(definition.confidence, 0.92);
    }

    #[test]
    fn test_normalize_fenced_json() {
        let raw = format!("```json\n{}\n```", VALID);
        let definition = normalize(&raw, "ubiquitous");
        assert_eq!(definition.definition, "Present everywhere.");
    }

    #[test]
    fn test_confidence_is_not_clamped() {
        let raw = VALID.replace("0.92", "1.5");
        assert_eq!(normalize(&raw, "ubiquitous").confidence, 1.5);
    }

    #[test]
    fn test_non_json_falls_back() {
        let raw = "Ubiquitous means found everywhere.";
        let definition = normalize(raw, "ubiquitous");
        assert_eq!(definition.word, "ubiquitous");
        assert_eq!(definition.part_of_speech, "unknown");
        assert_eq!(definition.definition, raw);
        assert!(definition.examples.is_empty());
        assert!(definition.synonyms.is_empty());
        assert_eq!(definition.confidence, 0.7);
    }

    #[test]
    fn test_missing_fields_fall_back_with_raw_text() {
        let raw = "```json\n{\"word\": \"ubiquitous\", \"definition\": \"everywhere\"}\n```";
        let definition = normalize(raw, "ubiquitous");
        assert_eq!(definition.part_of_speech, "unknown");
        assert_eq!(definition.definition, raw);
        assert_eq!(definition.confidence, 0.7);
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("plain"), "plain");
        assert_eq!(strip_code_fence("```json{}```"), "{}");
    }

    #[test]
    fn test_prompt_embeds_escaped_word() {
        let request = definition_completion("llama-3.1-8b-instant", "say \"hi\"");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.max_tokens, 1000);
        let prompt = &request.messages[1].content;
        assert!(prompt.contains(r#""word": "say \"hi\"""#));
    }
}
