use sqlx::PgPool;
use uuid::Uuid;

use pubgraph_domain::Category;

use crate::{
	Result,
	models::{DocumentRecord, DocumentSummary, IndexedItem, SectionRecord},
};

pub async fn insert_document(
	pool: &PgPool,
	name: &str,
	summary: Option<&str>,
	text: &str,
) -> Result<Uuid> {
	let document_id = Uuid::new_v4();

	sqlx::query(
		"\
INSERT INTO documents (document_id, name, summary, text)
VALUES ($1, $2, $3, $4)
ON CONFLICT (name) DO UPDATE
SET summary = EXCLUDED.summary,
	text = EXCLUDED.text,
	updated_at = now()",
	)
	.bind(document_id)
	.bind(name)
	.bind(summary)
	.bind(text)
	.execute(pool)
	.await?;

	let (document_id,): (Uuid,) =
		sqlx::query_as("SELECT document_id FROM documents WHERE name = $1")
			.bind(name)
			.fetch_one(pool)
			.await?;

	Ok(document_id)
}

pub async fn upsert_item(pool: &PgPool, category: Category, name: &str) -> Result<Uuid> {
	let item_id = Uuid::new_v4();

	sqlx::query(
		"\
INSERT INTO indexed_items (item_id, category, name)
VALUES ($1, $2, $3)
ON CONFLICT (category, name) DO NOTHING",
	)
	.bind(item_id)
	.bind(category.label())
	.bind(name)
	.execute(pool)
	.await?;

	let (item_id,): (Uuid,) =
		sqlx::query_as("SELECT item_id FROM indexed_items WHERE category = $1 AND name = $2")
			.bind(category.label())
			.bind(name)
			.fetch_one(pool)
			.await?;

	Ok(item_id)
}

pub async fn insert_mention(
	pool: &PgPool,
	document_id: Uuid,
	item_id: Uuid,
	kind: &str,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO document_mentions (document_id, item_id, kind)
VALUES ($1, $2, $3)
ON CONFLICT (document_id, item_id, kind) DO NOTHING",
	)
	.bind(document_id)
	.bind(item_id)
	.bind(kind)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn insert_section(
	pool: &PgPool,
	document_id: Uuid,
	section_index: i32,
	text: &str,
) -> Result<Uuid> {
	let section_id = Uuid::new_v4();

	sqlx::query(
		"\
INSERT INTO sections (section_id, document_id, section_index, text)
VALUES ($1, $2, $3, $4)
ON CONFLICT (document_id, section_index) DO UPDATE
SET text = EXCLUDED.text",
	)
	.bind(section_id)
	.bind(document_id)
	.bind(section_index)
	.bind(text)
	.execute(pool)
	.await?;

	let (section_id,): (Uuid,) =
		sqlx::query_as("SELECT section_id FROM sections WHERE document_id = $1 AND section_index = $2")
			.bind(document_id)
			.bind(section_index)
			.fetch_one(pool)
			.await?;

	Ok(section_id)
}

pub async fn document_by_name(pool: &PgPool, name: &str) -> Result<Option<DocumentRecord>> {
	let record = sqlx::query_as::<_, DocumentRecord>(
		"\
SELECT document_id, name, summary, text, created_at, updated_at
FROM documents
WHERE name = $1",
	)
	.bind(name)
	.fetch_optional(pool)
	.await?;

	Ok(record)
}

pub async fn document_by_id(pool: &PgPool, document_id: Uuid) -> Result<Option<DocumentRecord>> {
	let record = sqlx::query_as::<_, DocumentRecord>(
		"\
SELECT document_id, name, summary, text, created_at, updated_at
FROM documents
WHERE document_id = $1",
	)
	.bind(document_id)
	.fetch_optional(pool)
	.await?;

	Ok(record)
}

pub async fn list_documents(pool: &PgPool) -> Result<Vec<DocumentSummary>> {
	let records = sqlx::query_as::<_, DocumentSummary>(
		"\
SELECT name, summary IS NOT NULL AS has_summary
FROM documents
ORDER BY name",
	)
	.fetch_all(pool)
	.await?;

	Ok(records)
}

/// Documents that carry a summary, with the summary text itself.
pub async fn list_summaries(pool: &PgPool) -> Result<Vec<(String, String)>> {
	let rows: Vec<(String, String)> = sqlx::query_as(
		"\
SELECT name, summary
FROM documents
WHERE summary IS NOT NULL
ORDER BY name",
	)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn list_items(pool: &PgPool, category: Category) -> Result<Vec<String>> {
	let names: Vec<(String,)> = sqlx::query_as(
		"\
SELECT name
FROM indexed_items
WHERE category = $1
ORDER BY name",
	)
	.bind(category.label())
	.fetch_all(pool)
	.await?;

	Ok(names.into_iter().map(|(name,)| name).collect())
}

/// Names of documents owning an item through any of the given mention kinds.
/// DISTINCT so an item linked to the same document through several kinds
/// resolves once. An unknown item yields an empty list.
pub async fn mention_owner_names(
	pool: &PgPool,
	item_id: Uuid,
	kinds: &[&str],
) -> Result<Vec<String>> {
	let kinds = kinds.iter().map(|kind| kind.to_string()).collect::<Vec<_>>();
	let names: Vec<(String,)> = sqlx::query_as(
		"\
SELECT DISTINCT d.name
FROM document_mentions m
JOIN documents d ON d.document_id = m.document_id
WHERE m.item_id = $1 AND m.kind = ANY($2)
ORDER BY d.name",
	)
	.bind(item_id)
	.bind(&kinds)
	.fetch_all(pool)
	.await?;

	Ok(names.into_iter().map(|(name,)| name).collect())
}

pub async fn documents_for_item(
	pool: &PgPool,
	category: Category,
	name: &str,
) -> Result<Vec<String>> {
	let kinds = category
		.mention_kinds()
		.iter()
		.map(|kind| kind.to_string())
		.collect::<Vec<_>>();
	let names: Vec<(String,)> = sqlx::query_as(
		"\
SELECT DISTINCT d.name
FROM indexed_items i
JOIN document_mentions m ON m.item_id = i.item_id
JOIN documents d ON d.document_id = m.document_id
WHERE i.category = $1 AND i.name = $2 AND m.kind = ANY($3)
ORDER BY d.name",
	)
	.bind(category.label())
	.bind(name)
	.bind(&kinds)
	.fetch_all(pool)
	.await?;

	Ok(names.into_iter().map(|(name,)| name).collect())
}

/// Owning document name and section text for a section hit. None when the
/// section row is gone, which the caller treats as an orphaned index entry.
pub async fn section_owner(pool: &PgPool, section_id: Uuid) -> Result<Option<(String, String)>> {
	let row: Option<(String, String)> = sqlx::query_as(
		"\
SELECT d.name, s.text
FROM sections s
JOIN documents d ON d.document_id = s.document_id
WHERE s.section_id = $1",
	)
	.bind(section_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}

pub async fn items_for_document(pool: &PgPool, document_id: Uuid) -> Result<Vec<IndexedItem>> {
	let items = sqlx::query_as::<_, IndexedItem>(
		"\
SELECT DISTINCT i.item_id, i.category, i.name
FROM indexed_items i
JOIN document_mentions m ON m.item_id = i.item_id
WHERE m.document_id = $1
ORDER BY i.category, i.name",
	)
	.bind(document_id)
	.fetch_all(pool)
	.await?;

	Ok(items)
}

pub async fn sections_for_document(
	pool: &PgPool,
	document_id: Uuid,
) -> Result<Vec<SectionRecord>> {
	let sections = sqlx::query_as::<_, SectionRecord>(
		"\
SELECT section_id, document_id, section_index, text
FROM sections
WHERE document_id = $1
ORDER BY section_index",
	)
	.bind(document_id)
	.fetch_all(pool)
	.await?;

	Ok(sections)
}
