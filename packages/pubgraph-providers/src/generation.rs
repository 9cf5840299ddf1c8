use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
	choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
	message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
	content: String,
}

/// Sends one user prompt to an OpenAI-compatible chat-completion endpoint and
/// returns the assistant's reply.
pub async fn complete(
	cfg: &pubgraph_config::GenerationProviderConfig,
	prompt: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let parsed: CompletionResponse = res.error_for_status()?.json().await?;

	answer_text(parsed)
}

fn answer_text(response: CompletionResponse) -> Result<String> {
	let Some(choice) = response.choices.into_iter().next() else {
		return Err(eyre::eyre!("Completion response contained no choices."));
	};

	Ok(choice.message.content.trim().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn takes_the_first_choice_and_trims_it() {
		let raw = r#"{
			"choices": [
				{ "message": { "content": "  An answer.\n" } },
				{ "message": { "content": "Ignored." } }
			]
		}"#;
		let parsed: CompletionResponse =
			serde_json::from_str(raw).expect("Failed to parse completion.");

		assert_eq!(answer_text(parsed).expect("Expected an answer."), "An answer.");
	}

	#[test]
	fn empty_choices_are_an_error() {
		let parsed = CompletionResponse { choices: Vec::new() };

		assert!(answer_text(parsed).is_err());
	}
}
