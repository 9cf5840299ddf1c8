/// Bootstrap DDL. Statements are split on ';' by the caller, so no statement
/// here may contain an embedded semicolon.
pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS documents (
	document_id UUID PRIMARY KEY,
	name        TEXT NOT NULL UNIQUE,
	summary     TEXT,
	text        TEXT NOT NULL,
	created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
	updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS indexed_items (
	item_id    UUID PRIMARY KEY,
	category   TEXT NOT NULL,
	name       TEXT NOT NULL,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	UNIQUE (category, name)
);

CREATE TABLE IF NOT EXISTS document_mentions (
	document_id UUID NOT NULL REFERENCES documents (document_id) ON DELETE CASCADE,
	item_id     UUID NOT NULL REFERENCES indexed_items (item_id) ON DELETE CASCADE,
	kind        TEXT NOT NULL,
	PRIMARY KEY (document_id, item_id, kind)
);

CREATE INDEX IF NOT EXISTS document_mentions_item_idx
	ON document_mentions (item_id, kind);

CREATE TABLE IF NOT EXISTS sections (
	section_id    UUID PRIMARY KEY,
	document_id   UUID NOT NULL REFERENCES documents (document_id) ON DELETE CASCADE,
	section_index INT NOT NULL,
	text          TEXT NOT NULL,
	UNIQUE (document_id, section_index)
);

CREATE TABLE IF NOT EXISTS ingest_outbox (
	outbox_id    UUID PRIMARY KEY,
	document_id  UUID NOT NULL REFERENCES documents (document_id) ON DELETE CASCADE,
	op           TEXT NOT NULL,
	status       TEXT NOT NULL DEFAULT 'PENDING',
	attempts     INT NOT NULL DEFAULT 0,
	last_error   TEXT,
	available_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
	updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS ingest_outbox_pending_idx
	ON ingest_outbox (status, available_at);
";
