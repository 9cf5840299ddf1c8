use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration};

use color_eyre::{Result, eyre};
use qdrant_client::{client::Payload, qdrant::{PointStruct, Value}};
use time::{Duration, OffsetDateTime};
use tokio::{sync::Semaphore, task::JoinSet, time as tokio_time};
use uuid::Uuid;

use pubgraph_domain::CATEGORIES;
use pubgraph_providers::embedding;
use pubgraph_storage::{
	db::Db,
	documents,
	models::{IndexedItem, OutboxEntry, SectionRecord},
	outbox,
	qdrant::QdrantStore,
};

const CLAIM_LEASE_SECONDS: i64 = 30;
const BASE_BACKOFF_MS: i64 = 500;
const MAX_BACKOFF_MS: i64 = 30_000;
const MAX_OUTBOX_ERROR_CHARS: usize = 1_024;

pub struct WorkerState {
	pub db: Db,
	pub qdrant: QdrantStore,
	pub embedding: pubgraph_config::EmbeddingProviderConfig,
	pub ingestion: pubgraph_config::Ingestion,
}

pub async fn run_worker(state: WorkerState) -> Result<()> {
	let state = Arc::new(state);
	let poll_interval = StdDuration::from_millis(state.ingestion.poll_interval_ms);

	loop {
		if let Err(err) = process_outbox_once(state.clone()).await {
			tracing::error!(error = %err, "Ingest outbox processing failed.");
		}

		tokio_time::sleep(poll_interval).await;
	}
}

/// Claims one batch and fans it out with bounded concurrency. One document's
/// failure never affects the others in the batch.
async fn process_outbox_once(state: Arc<WorkerState>) -> Result<()> {
	let now = OffsetDateTime::now_utc();
	let jobs =
		outbox::claim_batch(&state.db, now, state.ingestion.batch_size, CLAIM_LEASE_SECONDS)
			.await?;

	if jobs.is_empty() {
		return Ok(());
	}

	let semaphore = Arc::new(Semaphore::new(state.ingestion.max_concurrency as usize));
	let mut set: JoinSet<(OutboxEntry, Result<()>)> = JoinSet::new();

	for job in jobs {
		let state = state.clone();
		let semaphore = semaphore.clone();

		set.spawn(async move {
			let _permit = match semaphore.acquire_owned().await {
				Ok(permit) => permit,
				Err(_) => return (job, Err(eyre::eyre!("Worker semaphore closed."))),
			};
			let result = handle_job(&state, &job).await;

			(job, result)
		});
	}

	while let Some(joined) = set.join_next().await {
		let (job, result) = match joined {
			Ok(pair) => pair,
			Err(err) => {
				tracing::error!(error = %err, "Ingest job panicked.");

				continue;
			},
		};

		match result {
			Ok(()) => {
				outbox::mark_done(&state.db, job.outbox_id).await?;
			},
			Err(err) => {
				let next_attempts = job.attempts.saturating_add(1);
				let available_at = OffsetDateTime::now_utc() + backoff_for_attempt(next_attempts);
				let error_text = sanitize_outbox_error(&err.to_string());

				outbox::mark_failed(
					&state.db,
					job.outbox_id,
					next_attempts,
					&error_text,
					available_at,
				)
				.await?;
				tracing::error!(error = %err, outbox_id = %job.outbox_id, "Ingest job failed.");
			},
		}
	}

	Ok(())
}

async fn handle_job(state: &WorkerState, job: &OutboxEntry) -> Result<()> {
	match job.op.as_str() {
		"UPSERT" => handle_index(state, job.document_id).await,
		"DELETE" => handle_delete(state, job.document_id).await,
		other => Err(eyre::eyre!("Unsupported outbox op: {other}.")),
	}
}

async fn handle_index(state: &WorkerState, document_id: Uuid) -> Result<()> {
	let Some(document) = documents::document_by_id(&state.db.pool, document_id).await? else {
		tracing::info!(document_id = %document_id, "Document missing for outbox job. Marking done.");

		return Ok(());
	};
	let items = documents::items_for_document(&state.db.pool, document_id).await?;
	let sections = documents::sections_for_document(&state.db.pool, document_id).await?;

	for category in CATEGORIES {
		let batch = items
			.iter()
			.filter(|item| item.category == category.label())
			.cloned()
			.collect::<Vec<_>>();

		if batch.is_empty() {
			continue;
		}

		let names = batch.iter().map(|item| item.name.clone()).collect::<Vec<_>>();
		let vectors = embed_texts(state, &names).await?;
		let points = item_points(&batch, &vectors, state.qdrant.vector_dim)?;
		let collection = state.qdrant.category_collection(category);

		state.qdrant.upsert_points(&collection, points).await?;
	}

	index_sections(state, document_id, &document.name, &sections).await?;

	tracing::info!(
		document = %document.name,
		items = items.len(),
		sections = sections.len(),
		"Indexed document."
	);

	Ok(())
}

/// Items are shared across documents, so deleting a document only removes
/// its section points. An item that loses its last owner stays in the index
/// as an orphan, which search skips.
async fn handle_delete(state: &WorkerState, document_id: Uuid) -> Result<()> {
	let collection = state.qdrant.sections_collection();

	state.qdrant.delete_document_points(&collection, &document_id.to_string()).await?;

	Ok(())
}

async fn index_sections(
	state: &WorkerState,
	document_id: Uuid,
	document_name: &str,
	sections: &[SectionRecord],
) -> Result<()> {
	let collection = state.qdrant.sections_collection();

	// Replace rather than merge; stale section points must not survive a
	// re-index.
	state.qdrant.delete_document_points(&collection, &document_id.to_string()).await?;

	if sections.is_empty() {
		return Ok(());
	}

	let texts = sections.iter().map(|section| section.text.clone()).collect::<Vec<_>>();
	let vectors = embed_texts(state, &texts).await?;
	let mut points = Vec::with_capacity(sections.len());

	for (section, vector) in sections.iter().zip(vectors.iter()) {
		validate_vector_dim(vector, state.qdrant.vector_dim)?;

		let mut payload_map = HashMap::new();

		payload_map
			.insert("document_id".to_string(), Value::from(section.document_id.to_string()));
		payload_map.insert("document".to_string(), Value::from(document_name.to_string()));
		payload_map
			.insert("section_index".to_string(), Value::from(section.section_index as i64));

		points.push(PointStruct::new(
			section.section_id.to_string(),
			vector.clone(),
			Payload::from(payload_map),
		));
	}

	state.qdrant.upsert_points(&collection, points).await?;

	Ok(())
}

async fn embed_texts(state: &WorkerState, texts: &[String]) -> Result<Vec<Vec<f32>>> {
	let vectors = embedding::embed(&state.embedding, texts).await?;

	if vectors.len() != texts.len() {
		return Err(eyre::eyre!(
			"Embedding provider returned {} vectors for {} texts.",
			vectors.len(),
			texts.len()
		));
	}

	Ok(vectors)
}

fn item_points(
	items: &[IndexedItem],
	vectors: &[Vec<f32>],
	expected_dim: u32,
) -> Result<Vec<PointStruct>> {
	let mut points = Vec::with_capacity(items.len());

	for (item, vector) in items.iter().zip(vectors.iter()) {
		validate_vector_dim(vector, expected_dim)?;

		let mut payload_map = HashMap::new();

		payload_map.insert("item_id".to_string(), Value::from(item.item_id.to_string()));
		payload_map.insert("name".to_string(), Value::from(item.name.clone()));
		payload_map.insert("category".to_string(), Value::from(item.category.clone()));

		points.push(PointStruct::new(
			item.item_id.to_string(),
			vector.clone(),
			Payload::from(payload_map),
		));
	}

	Ok(points)
}

fn validate_vector_dim(vec: &[f32], expected_dim: u32) -> Result<()> {
	if vec.len() != expected_dim as usize {
		return Err(eyre::eyre!(
			"Embedding dimension {} does not match configured vector_dim {}.",
			vec.len(),
			expected_dim
		));
	}

	Ok(())
}

/// Outbox rows are operator-visible, so credentials must never land in
/// `last_error`. Bearer values and key=value secrets are masked and the text
/// is capped.
fn sanitize_outbox_error(text: &str) -> String {
	const SECRET_KEYS: [&str; 5] = ["api_key", "apikey", "password", "secret", "token"];

	let mut words = Vec::new();
	let mut redact_next = false;

	for word in text.split_whitespace() {
		if std::mem::take(&mut redact_next) {
			words.push("[REDACTED]".to_string());

			continue;
		}
		if word.eq_ignore_ascii_case("bearer") {
			redact_next = true;
		}

		words.push(mask_secret_assignment(word, &SECRET_KEYS));
	}

	let mut sanitized = words.join(" ");

	if sanitized.chars().count() > MAX_OUTBOX_ERROR_CHARS {
		sanitized = sanitized.chars().take(MAX_OUTBOX_ERROR_CHARS).collect();
		sanitized.push_str("...");
	}

	sanitized
}

fn mask_secret_assignment(word: &str, keys: &[&str]) -> String {
	let lowered = word.to_ascii_lowercase();

	if !keys.iter().any(|key| lowered.contains(key)) {
		return word.to_string();
	}

	match word.find(['=', ':']) {
		// Separators are ASCII, so slicing one byte past them is safe.
		Some(sep) => format!("{}[REDACTED]", &word[..=sep]),
		None => word.to_string(),
	}
}

fn backoff_for_attempt(attempt: i32) -> Duration {
	let exp = attempt.max(1).saturating_sub(1).min(6) as u32;
	let millis = (BASE_BACKOFF_MS << exp).min(MAX_BACKOFF_MS);

	Duration::milliseconds(millis)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backoff_doubles_and_caps() {
		assert_eq!(backoff_for_attempt(1), Duration::milliseconds(500));
		assert_eq!(backoff_for_attempt(2), Duration::milliseconds(1_000));
		assert_eq!(backoff_for_attempt(5), Duration::milliseconds(8_000));
		assert_eq!(backoff_for_attempt(12), Duration::milliseconds(30_000));
		assert_eq!(backoff_for_attempt(-3), Duration::milliseconds(500));
	}

	#[test]
	fn outbox_errors_redact_credentials() {
		let sanitized = sanitize_outbox_error("request failed: api_key=sk-123 Bearer sk-456");

		assert!(sanitized.contains("api_key=[REDACTED]"));
		assert!(!sanitized.contains("sk-123"));
		assert!(!sanitized.contains("sk-456"));
	}

	#[test]
	fn vector_dim_validation_rejects_mismatches() {
		assert!(validate_vector_dim(&[0.0; 4], 4).is_ok());
		assert!(validate_vector_dim(&[0.0; 3], 4).is_err());
	}
}
