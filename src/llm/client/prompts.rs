//! Default LLM prompts.

/// Prompt used by `reviewlens ask` when none is given.
pub const DEFAULT_ASK_PROMPT: &str = "Explain generative AI in one sentence.";

/// Default prompt for scoring review sentiment.
///
/// `{review}` is replaced with the review text. Custom prompts without the
/// placeholder get the review appended after a space.
pub const DEFAULT_SENTIMENT_PROMPT: &str = r#"Rate the sentiment of the following customer review on a scale from -1 (very negative) to 1 (very positive).

Respond with ONLY a single decimal number between -1 and 1. No words, no explanation, no formatting.

Review: {review}"#;
