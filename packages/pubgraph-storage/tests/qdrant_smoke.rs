use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{PointStruct, Value},
};
use uuid::Uuid;

use pubgraph_domain::Category;
use pubgraph_storage::qdrant::QdrantStore;
use pubgraph_testkit::TestDatabase;

const VECTOR_DIM: u32 = 4;

fn test_store(test_db: &TestDatabase, url: &str) -> QdrantStore {
	let cfg = pubgraph_config::Qdrant {
		url: url.to_string(),
		collection_prefix: test_db.collection_prefix("pubgraph"),
		vector_dim: VECTOR_DIM,
	};
	let store = QdrantStore::new(&cfg).expect("Failed to build Qdrant store.");

	for category in pubgraph_domain::CATEGORIES {
		test_db.track_collection(&store.category_collection(category));
	}

	test_db.track_collection(&store.sections_collection());

	store
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set PUBGRAPH_PG_DSN and PUBGRAPH_QDRANT_URL to run."]
async fn ensure_collections_creates_each_collection_once() {
	let (Some(dsn), Some(url)) = (pubgraph_testkit::env_dsn(), pubgraph_testkit::env_qdrant_url())
	else {
		eprintln!("Skipping; set PUBGRAPH_PG_DSN and PUBGRAPH_QDRANT_URL to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let store = test_store(&test_db, &url);

	let created = store.ensure_collections().await.expect("Failed to ensure collections.");

	assert_eq!(created.len(), 5, "Expected all five collections to be created: {created:?}");

	let created_again = store.ensure_collections().await.expect("Failed to re-ensure collections.");

	assert!(created_again.is_empty(), "Second run must create nothing: {created_again:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set PUBGRAPH_PG_DSN and PUBGRAPH_QDRANT_URL to run."]
async fn upserted_item_points_come_back_from_nearest() {
	let (Some(dsn), Some(url)) = (pubgraph_testkit::env_dsn(), pubgraph_testkit::env_qdrant_url())
	else {
		eprintln!("Skipping; set PUBGRAPH_PG_DSN and PUBGRAPH_QDRANT_URL to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let store = test_store(&test_db, &url);

	store.ensure_collections().await.expect("Failed to ensure collections.");

	let collection = store.category_collection(Category::Entity);
	let item_id = Uuid::new_v4();
	let mut payload_map = HashMap::new();

	payload_map.insert("item_id".to_string(), Value::from(item_id.to_string()));
	payload_map.insert("name".to_string(), Value::from("CRISPR".to_string()));
	payload_map.insert("category".to_string(), Value::from("entity".to_string()));

	let point =
		PointStruct::new(item_id.to_string(), vec![0.1, 0.2, 0.3, 0.4], Payload::from(payload_map));

	store.upsert_points(&collection, vec![point]).await.expect("Failed to upsert point.");

	let hits = store
		.nearest(&collection, vec![0.1, 0.2, 0.3, 0.4], 5)
		.await
		.expect("Failed to query nearest points.");

	assert_eq!(hits.len(), 1);
	assert!(hits[0].score > 0.99, "Identical vectors must score ~1.0, got {}", hits[0].score);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
