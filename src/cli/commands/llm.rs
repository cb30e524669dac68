//! LLM-related commands.

use console::style;

use reviewlens::llm::LlmClient;
use reviewlens::Config;

use crate::cli::icons;

/// Show the LLM configuration and list available models.
pub async fn cmd_llm_models(config: &Config) -> anyhow::Result<()> {
    let llm = &config.llm;
    let client = LlmClient::new(llm.clone())?;

    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Enabled:", if llm.enabled { "Yes" } else { "No" });
    println!("{:<20} {}", "Provider:", llm.provider_name());
    println!("{:<20} {}", "Endpoint:", llm.endpoint);
    println!(
        "{:<20} {}",
        "API Key:",
        if llm.api_key.is_some() { "Set" } else { "Not set" }
    );
    println!("{:<20} {}", "Current Model:", llm.model);
    println!("{:<20} {}", "Max Tokens:", llm.max_tokens);
    println!("{:<20} {:.2}", "Temperature:", llm.effective_temperature());
    println!("{:<20} {}s", "Timeout:", llm.timeout_secs);
    println!(
        "{:<20} {}",
        "Scoring Tokens:", config.sentiment.max_tokens
    );

    if !client.is_available().await {
        println!("\n{} {}", icons::warn(), llm.availability_hint());
        return Ok(());
    }

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    match client.list_models().await {
        Ok(models) if models.is_empty() => println!("  No models available"),
        Ok(models) => {
            for model in models {
                let marker = if model == llm.model {
                    style("*").green().to_string()
                } else {
                    " ".to_string()
                };
                println!("{} {}", marker, model);
            }
        }
        Err(e) => println!("{} Failed to list models: {}", icons::error(), e),
    }

    Ok(())
}
