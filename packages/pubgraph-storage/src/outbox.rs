use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Result, db::Db, models::OutboxEntry};

pub async fn enqueue(db: &Db, document_id: Uuid, op: &str) -> Result<Uuid> {
	let outbox_id = Uuid::new_v4();

	sqlx::query(
		"INSERT INTO ingest_outbox (outbox_id, document_id, op, status) VALUES ($1, $2, $3, 'PENDING')",
	)
	.bind(outbox_id)
	.bind(document_id)
	.bind(op)
	.execute(&db.pool)
	.await?;

	Ok(outbox_id)
}

/// Claims up to `limit` runnable jobs and pushes their `available_at` forward
/// by the lease, all inside one transaction. FOR UPDATE SKIP LOCKED keeps
/// concurrent workers from claiming the same rows.
pub async fn claim_batch(
	db: &Db,
	now: OffsetDateTime,
	limit: u32,
	lease_seconds: i64,
) -> Result<Vec<OutboxEntry>> {
	let mut tx = db.pool.begin().await?;
	let mut jobs = sqlx::query_as::<_, OutboxEntry>(
		"\
SELECT
	outbox_id,
	document_id,
	op,
	status,
	attempts,
	last_error,
	available_at,
	created_at,
	updated_at
FROM ingest_outbox
WHERE status IN ('PENDING','FAILED') AND available_at <= $1
ORDER BY available_at ASC
LIMIT $2
FOR UPDATE SKIP LOCKED",
	)
	.bind(now)
	.bind(limit as i64)
	.fetch_all(&mut *tx)
	.await?;

	let lease_until = now + Duration::seconds(lease_seconds);

	for job in &mut jobs {
		sqlx::query(
			"UPDATE ingest_outbox SET available_at = $1, updated_at = $2 WHERE outbox_id = $3",
		)
		.bind(lease_until)
		.bind(now)
		.bind(job.outbox_id)
		.execute(&mut *tx)
		.await?;

		job.available_at = lease_until;
		job.updated_at = now;
	}

	tx.commit().await?;

	Ok(jobs)
}

pub async fn mark_done(db: &Db, outbox_id: Uuid) -> Result<()> {
	let now = OffsetDateTime::now_utc();

	sqlx::query("UPDATE ingest_outbox SET status = 'DONE', updated_at = $1 WHERE outbox_id = $2")
		.bind(now)
		.bind(outbox_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn mark_failed(
	db: &Db,
	outbox_id: Uuid,
	next_attempts: i32,
	error_text: &str,
	available_at: OffsetDateTime,
) -> Result<()> {
	let now = OffsetDateTime::now_utc();

	sqlx::query(
		"\
UPDATE ingest_outbox
SET status = 'FAILED',
	attempts = $1,
	last_error = $2,
	available_at = $3,
	updated_at = $4
WHERE outbox_id = $5",
	)
	.bind(next_attempts)
	.bind(error_text)
	.bind(available_at)
	.bind(now)
	.bind(outbox_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}
