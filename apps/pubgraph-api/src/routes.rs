use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use pubgraph_service::{
	DocumentDetail, DocumentListItem, EnsureCollectionsReport, GenerateResponse, SearchRequest,
	SearchResponse, SectionSearchResponse, ServiceError, SummaryItem,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search_sections", post(search_sections))
		.route("/v1/generate", post(generate))
		.route("/v1/documents", get(list_documents))
		.route("/v1/summaries", get(list_summaries))
		.route("/v1/documents/{name}", get(get_document))
		.route("/v1/items", get(list_items))
		.route("/v1/items/{category}/{name}/documents", get(documents_for_item))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/ensure_collections", post(ensure_collections))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(&payload).await?;
	Ok(Json(response))
}

async fn search_sections(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SectionSearchResponse>, ApiError> {
	let response = state.service.search_sections(&payload).await?;
	Ok(Json(response))
}

async fn generate(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
	let response = state.service.generate(&payload).await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct DocumentsResponse {
	documents: Vec<DocumentListItem>,
}

#[derive(Debug, Serialize)]
struct SummariesResponse {
	summaries: Vec<SummaryItem>,
}

async fn list_summaries(
	State(state): State<AppState>,
) -> Result<Json<SummariesResponse>, ApiError> {
	let summaries = state.service.list_summaries().await?;
	Ok(Json(SummariesResponse { summaries }))
}

async fn list_documents(
	State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, ApiError> {
	let documents = state.service.list_documents().await?;
	Ok(Json(DocumentsResponse { documents }))
}

async fn get_document(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<DocumentDetail>, ApiError> {
	let document = state.service.get_document(&name).await?;
	Ok(Json(document))
}

#[derive(Debug, Deserialize)]
struct ItemsQuery {
	category: String,
}

#[derive(Debug, Serialize)]
struct ItemsResponse {
	items: Vec<String>,
}

async fn list_items(
	State(state): State<AppState>,
	Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsResponse>, ApiError> {
	let items = state.service.list_items(&query.category).await?;
	Ok(Json(ItemsResponse { items }))
}

#[derive(Debug, Serialize)]
struct ItemDocumentsResponse {
	documents: Vec<String>,
}

async fn documents_for_item(
	State(state): State<AppState>,
	Path((category, name)): Path<(String, String)>,
) -> Result<Json<ItemDocumentsResponse>, ApiError> {
	let documents = state.service.documents_for_item(&category, &name).await?;
	Ok(Json(ItemDocumentsResponse { documents }))
}

async fn ensure_collections(
	State(state): State<AppState>,
) -> Result<Json<EnsureCollectionsReport>, ApiError> {
	let report = state.service.ensure_collections().await?;
	Ok(Json(report))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::NotFound { .. } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Provider { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message),
			ServiceError::IndexUnavailable { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "index_unavailable", message),
			ServiceError::Storage { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
			ServiceError::Qdrant { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "qdrant_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}
