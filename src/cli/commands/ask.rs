//! One-shot prompt command.

use console::style;

use reviewlens::llm::{LlmClient, LlmError, DEFAULT_ASK_PROMPT};
use reviewlens::Config;

use crate::cli::icons;

/// Send one prompt and print the reply.
pub async fn cmd_ask(
    config: &Config,
    prompt: Option<&str>,
    model: Option<&str>,
    max_tokens: Option<u32>,
) -> anyhow::Result<()> {
    let mut llm = config.llm.clone();
    if let Some(model) = model {
        llm = llm.with_model(model);
    }
    if let Some(max_tokens) = max_tokens {
        llm.max_tokens = max_tokens;
    }

    let prompt = prompt.unwrap_or(DEFAULT_ASK_PROMPT);
    let client = LlmClient::new(llm)?;

    eprintln!(
        "{} Asking {} ({})",
        icons::info(),
        client.config().provider_name(),
        style(&client.config().model).dim()
    );

    match client.ask(prompt).await {
        Ok(reply) => {
            println!("{}", reply.trim());
            Ok(())
        }
        Err(e @ (LlmError::Connection(_) | LlmError::MissingApiKey(_))) => {
            eprintln!("{} {}", icons::warn(), client.config().availability_hint());
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
