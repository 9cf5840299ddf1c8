use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRecord {
	pub document_id: Uuid,
	pub name: String,
	pub summary: Option<String>,
	pub text: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentSummary {
	pub name: String,
	pub has_summary: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IndexedItem {
	pub item_id: Uuid,
	pub category: String,
	pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SectionRecord {
	pub section_id: Uuid,
	pub document_id: Uuid,
	pub section_index: i32,
	pub text: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutboxEntry {
	pub outbox_id: Uuid,
	pub document_id: Uuid,
	pub op: String,
	pub status: String,
	pub attempts: i32,
	pub last_error: Option<String>,
	pub available_at: OffsetDateTime,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
