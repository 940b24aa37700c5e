use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::auth::{ServiceAccountKey, TokenProvider};
use crate::query::{FieldFilter, Query};
use crate::value::{Document, decode_fields, encode_fields};
use crate::{DocumentStore, StoreError, StoredDocument};

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_DATABASE: &str = "(default)";
const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database_id: String,
    pub base_url: String,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE.to_string(),
            base_url: FIRESTORE_BASE_URL.to_string(),
        }
    }

    /// Points at a local emulator, given as `host:port`.
    pub fn emulator(host: &str, project_id: impl Into<String>) -> Self {
        Self {
            base_url: format!("http://{}/v1", host.trim_end_matches('/')),
            ..Self::new(project_id)
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database_id
        )
    }
}

/// Firestore over its REST API.
pub struct FirestoreStore {
    http: Client,
    config: FirestoreConfig,
    tokens: TokenProvider,
}

#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<RestDocument>,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig, tokens: TokenProvider) -> Result<Self, StoreError> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::Configuration(
                "project id cannot be empty".into(),
            ));
        }
        Ok(Self {
            http: Client::new(),
            config,
            tokens,
        })
    }

    /// Authenticates with the key file at `path`. The project defaults to the key's own.
    pub fn from_service_account(
        path: &Path,
        project_id: Option<String>,
    ) -> Result<Self, StoreError> {
        let key = ServiceAccountKey::from_file(path)?;
        let project_id = project_id.unwrap_or_else(|| key.project_id.clone());
        info!(project_id = %project_id, client = %key.client_email, "using service account");
        let tokens = TokenProvider::service_account(key)?;
        Self::new(FirestoreConfig::new(project_id), tokens)
    }

    pub fn emulator(host: &str, project_id: impl Into<String>) -> Result<Self, StoreError> {
        let config = FirestoreConfig::emulator(host, project_id);
        info!(base_url = %config.base_url, "using Firestore emulator");
        Self::new(config, TokenProvider::fixed(EMULATOR_TOKEN))
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.config.documents_root())
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        let token = self.tokens.token(&self.http).await?;
        Ok(request.bearer_auth(token))
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn field_filter_json(filter: &FieldFilter) -> serde_json::Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": filter.field },
            "op": filter.op.firestore_name(),
            "value": filter.value.to_firestore(),
        }
    })
}

/// Firestore accepts a single array-membership filter per query. The first one is sent to
/// the server, the rest are returned to be applied to the results locally.
fn split_filters(query: &Query) -> (Vec<&FieldFilter>, Vec<&FieldFilter>) {
    let mut server = Vec::new();
    let mut local = Vec::new();
    let mut array_sent = false;

    for filter in &query.filters {
        if filter.op.is_array() {
            if array_sent {
                local.push(filter);
                continue;
            }
            array_sent = true;
        }
        server.push(filter);
    }

    (server, local)
}

fn structured_query(
    collection: &str,
    filters: &[&FieldFilter],
    limit: Option<usize>,
) -> serde_json::Value {
    let mut query = json!({ "from": [{ "collectionId": collection }] });

    match filters {
        [] => {}
        [single] => query["where"] = field_filter_json(single),
        many => {
            query["where"] = json!({
                "compositeFilter": {
                    "op": "AND",
                    "filters": many.iter().map(|f| field_filter_json(f)).collect::<Vec<_>>(),
                }
            });
        }
    }

    if let Some(limit) = limit {
        query["limit"] = json!(limit);
    }

    json!({ "structuredQuery": query })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), StoreError> {
        // PATCH without an update mask replaces every field of the document.
        let request = self
            .http
            .patch(self.document_url(collection, id))
            .json(&encode_fields(document));
        let response = self.authorized(request).await?.send().await?;
        ensure_success(response).await?;
        debug!(collection, id, "document written");
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let request = self.http.get(self.document_url(collection, id));
        let response = self.authorized(request).await?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: RestDocument = ensure_success(response).await?.json().await?;
        decode_fields(document.fields.as_ref()).map(Some)
    }

    async fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let (server_filters, local_filters) = split_filters(query);
        // Server-side limits only hold when the server sees every filter and returns id order.
        let push_limit = local_filters.is_empty()
            && !query.filters.iter().any(|f| f.op.is_inequality());
        let body = structured_query(
            collection,
            &server_filters,
            if push_limit { query.limit } else { None },
        );

        let url = format!("{}:runQuery", self.config.documents_root());
        let request = self.http.post(url).json(&body);
        let response = self.authorized(request).await?.send().await?;
        let items: Vec<RunQueryItem> = ensure_success(response).await?.json().await?;

        let mut documents = Vec::new();
        for document in items.into_iter().filter_map(|item| item.document) {
            let fields = decode_fields(document.fields.as_ref())?;
            if local_filters.iter().all(|filter| filter.matches(&fields)) {
                documents.push(StoredDocument {
                    id: document_id(&document.name),
                    fields,
                });
            }
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }
        debug!(collection, results = documents.len(), "query finished");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterOp;
    use crate::value::Value;

    #[test]
    fn urls_follow_rest_layout() {
        let store = FirestoreStore::emulator("localhost:8080/", "the-joy-of-coding").unwrap();
        assert_eq!(
            store.document_url("episodes", "S01E01"),
            "http://localhost:8080/v1/projects/the-joy-of-coding/databases/(default)/documents/episodes/S01E01"
        );
        assert_eq!(
            FirestoreConfig::new("p").documents_root(),
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents"
        );
    }

    #[test]
    fn empty_project_is_rejected() {
        assert!(matches!(
            FirestoreStore::emulator("localhost:8080", " "),
            Err(StoreError::Configuration(_))
        ));
    }

    #[test]
    fn only_first_array_filter_goes_to_server() {
        let query = Query::new()
            .filter("subjects", FilterOp::ArrayContains, "TREE")
            .filter("subjects", FilterOp::ArrayContains, "LAKE")
            .filter("title", FilterOp::Equal, "Winter Mist");
        let (server, local) = split_filters(&query);

        assert_eq!(server.len(), 2);
        assert_eq!(server[0].value, Value::from("TREE"));
        assert_eq!(server[1].field, "title");
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].value, Value::from("LAKE"));
    }

    #[test]
    fn structured_query_shapes() {
        let single = Query::new().filter("title", FilterOp::Equal, "Winter Mist");
        let (filters, _) = split_filters(&single);
        assert_eq!(
            structured_query("episodes", &filters, Some(1)),
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "episodes" }],
                    "where": { "fieldFilter": {
                        "field": { "fieldPath": "title" },
                        "op": "EQUAL",
                        "value": { "stringValue": "Winter Mist" }
                    } },
                    "limit": 1
                }
            })
        );

        let pair = Query::new()
            .filter("season", FilterOp::GreaterThanOrEqual, 1i64)
            .filter("colors", FilterOp::ArrayContainsAny, vec!["Sap Green"]);
        let (filters, _) = split_filters(&pair);
        let body = structured_query("episodes", &filters, None);
        let composite = &body["structuredQuery"]["where"]["compositeFilter"];
        assert_eq!(composite["op"], "AND");
        assert_eq!(composite["filters"][1]["fieldFilter"]["op"], "ARRAY_CONTAINS_ANY");
        assert!(body["structuredQuery"].get("limit").is_none());
    }

    #[test]
    fn document_id_is_last_path_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/episodes/S02E11"),
            "S02E11"
        );
    }
}
