use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
	// Providers may return items out of order; `index` is authoritative.
	index: Option<usize>,
	embedding: Vec<f32>,
}

pub async fn embed(
	cfg: &pubgraph_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let parsed: EmbeddingResponse = res.error_for_status()?.json().await?;

	if parsed.data.is_empty() && !texts.is_empty() {
		return Err(eyre::eyre!("Embedding response contained no data."));
	}

	Ok(in_request_order(parsed.data))
}

fn in_request_order(data: Vec<EmbeddingItem>) -> Vec<Vec<f32>> {
	let mut indexed = data
		.into_iter()
		.enumerate()
		.map(|(fallback, item)| (item.index.unwrap_or(fallback), item.embedding))
		.collect::<Vec<_>>();

	indexed.sort_by_key(|(index, _)| *index);

	indexed.into_iter().map(|(_, embedding)| embedding).collect()
}
