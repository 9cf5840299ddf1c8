mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, GenerationProviderConfig, Ingestion, Postgres, Providers,
	Qdrant, Search, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	require_non_empty(&cfg.service.http_bind, "service.http_bind")?;
	require_non_empty(&cfg.service.admin_bind, "service.admin_bind")?;
	require_non_empty(&cfg.storage.postgres.dsn, "storage.postgres.dsn")?;
	require_positive(cfg.storage.postgres.pool_max_conns as u64, "storage.postgres.pool_max_conns")?;
	require_non_empty(&cfg.storage.qdrant.url, "storage.qdrant.url")?;
	require_non_empty(&cfg.storage.qdrant.collection_prefix, "storage.qdrant.collection_prefix")?;
	require_positive(cfg.providers.embedding.dimensions as u64, "providers.embedding.dimensions")?;

	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	require_non_empty(&cfg.providers.embedding.api_key, "providers.embedding.api_key")?;
	require_positive(cfg.providers.embedding.timeout_ms, "providers.embedding.timeout_ms")?;
	require_non_empty(&cfg.providers.generation.api_key, "providers.generation.api_key")?;
	require_positive(cfg.providers.generation.max_tokens as u64, "providers.generation.max_tokens")?;
	require_positive(cfg.providers.generation.timeout_ms, "providers.generation.timeout_ms")?;
	require_positive(cfg.search.default_top_k as u64, "search.default_top_k")?;
	require_positive(cfg.ingestion.batch_size as u64, "ingestion.batch_size")?;
	require_positive(cfg.ingestion.max_concurrency as u64, "ingestion.max_concurrency")?;

	Ok(())
}

fn require_non_empty(value: &str, field: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::Validation { message: format!("{field} must be non-empty.") });
	}

	Ok(())
}

fn require_positive(value: u64, field: &str) -> Result<()> {
	if value == 0 {
		return Err(Error::Validation { message: format!("{field} must be greater than zero.") });
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	normalize_endpoint(&mut cfg.providers.embedding.api_base, &mut cfg.providers.embedding.path);
	normalize_endpoint(&mut cfg.providers.generation.api_base, &mut cfg.providers.generation.path);
}

fn normalize_endpoint(api_base: &mut String, path: &mut String) {
	let trimmed = api_base.trim_end_matches('/');

	if trimmed.len() != api_base.len() {
		*api_base = trimmed.to_string();
	}
	if !path.starts_with('/') {
		*path = format!("/{path}");
	}
}
