use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use pubgraph_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("pubgraph_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn template_config_is_valid() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML.to_string());
	let result = pubgraph_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result.expect("Expected template config to be valid.");
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let payload = SAMPLE_CONFIG_TEMPLATE_TOML.replace("dimensions  = 1536", "dimensions  = 768");
	let path = write_temp_config(payload);
	let result = pubgraph_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected dimension validation error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn http_bind_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.service.http_bind = "   ".to_string();

	let err = pubgraph_config::validate(&cfg).expect_err("Expected http_bind validation error.");

	assert!(
		err.to_string().contains("service.http_bind must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn postgres_dsn_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.storage.postgres.dsn = String::new();

	let err = pubgraph_config::validate(&cfg).expect_err("Expected dsn validation error.");

	assert!(
		err.to_string().contains("storage.postgres.dsn must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn collection_prefix_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.storage.qdrant.collection_prefix = " ".to_string();

	let err = pubgraph_config::validate(&cfg).expect_err("Expected prefix validation error.");

	assert!(
		err.to_string().contains("storage.qdrant.collection_prefix must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_api_key_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.embedding.api_key = String::new();

	let err = pubgraph_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("providers.embedding.api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_top_k_must_be_positive() {
	let mut cfg = base_config();

	cfg.search.default_top_k = 0;

	let err = pubgraph_config::validate(&cfg).expect_err("Expected top_k validation error.");

	assert!(
		err.to_string().contains("search.default_top_k must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn ingestion_concurrency_must_be_positive() {
	let mut cfg = base_config();

	cfg.ingestion.max_concurrency = 0;

	let err = pubgraph_config::validate(&cfg).expect_err("Expected concurrency validation error.");

	assert!(
		err.to_string().contains("ingestion.max_concurrency must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_embedding_section_is_a_parse_error() {
	let payload = {
		let start = SAMPLE_CONFIG_TEMPLATE_TOML
			.find("[providers.embedding]")
			.expect("Template config must include [providers.embedding].");
		let end = SAMPLE_CONFIG_TEMPLATE_TOML[start..]
			.find("\n[providers.generation]")
			.map(|offset| start + offset)
			.expect("Template config must include [providers.generation].");

		format!("{}{}", &SAMPLE_CONFIG_TEMPLATE_TOML[..start], &SAMPLE_CONFIG_TEMPLATE_TOML[end..])
	};
	let path = write_temp_config(payload);
	let result = pubgraph_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	match result.expect_err("Expected missing embedding parse error.") {
		Error::Parse { .. } => {},
		err => panic!("Expected parse config error, got {err}"),
	}
}

#[test]
fn generation_api_key_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.generation.api_key = String::new();

	let err = pubgraph_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("providers.generation.api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn generation_max_tokens_must_be_positive() {
	let mut cfg = base_config();

	cfg.providers.generation.max_tokens = 0;

	let err = pubgraph_config::validate(&cfg).expect_err("Expected max_tokens validation error.");

	assert!(
		err.to_string().contains("providers.generation.max_tokens must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn normalize_strips_trailing_slash_from_api_base() {
	let payload = SAMPLE_CONFIG_TEMPLATE_TOML.replace(
		"api_base    = \"https://api.openai.com/v1\"",
		"api_base    = \"https://api.openai.com/v1/\"",
	);
	let path = write_temp_config(payload);
	let result = pubgraph_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected config to load.");

	assert_eq!(cfg.providers.embedding.api_base, "https://api.openai.com/v1");
}

#[test]
fn pubgraph_example_toml_is_valid() {
	let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

	path.push("../../pubgraph.example.toml");

	pubgraph_config::load(&path).expect("Expected pubgraph.example.toml to be a valid config.");
}
