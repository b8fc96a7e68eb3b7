use crate::store::{CounterStore, StoreCredentials};
use crate::utils::error::ServiceError;
use crate::{Category, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
const COLLECTION: &str = "trash_stats";
const COUNT_FIELD: &str = "count";

/// Counter store backed by the Firestore REST API: one document per
/// category in the `trash_stats` collection, a single integer `count`
/// field each.
pub struct FirestoreCounterStore {
    http: reqwest::Client,
    credentials: StoreCredentials,
    base_url: String,
}

/// Firestore wire document. Integer values travel as strings.
#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    integer_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

impl Document {
    /// Category encoded in the document id (last path segment of `name`).
    fn category(&self) -> Option<Category> {
        self.name.rsplit('/').next().and_then(Category::from_name)
    }

    fn count(&self) -> Result<u64> {
        let value = self
            .fields
            .get(COUNT_FIELD)
            .and_then(|f| f.integer_value.as_deref())
            .ok_or_else(|| {
                ServiceError::Store(format!(
                    "Document '{}' has no integer '{}' field",
                    self.name, COUNT_FIELD
                ))
            })?;

        value.parse::<u64>().map_err(|_| {
            ServiceError::Store(format!(
                "Document '{}' has non-numeric count '{}'",
                self.name, value
            ))
        })
    }
}

impl FirestoreCounterStore {
    pub fn new(credentials: StoreCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            base_url: FIRESTORE_BASE.to_string(),
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.credentials.project_id
        )
    }

    fn document_url(&self, category: Category) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.documents_root(),
            COLLECTION,
            category.name()
        )
    }

    /// Body for a `documents:commit` call that applies a server-side
    /// increment transform, creating the document at 1 when absent.
    fn increment_body(&self, category: Category) -> serde_json::Value {
        serde_json::json!({
            "writes": [{
                "transform": {
                    "document": format!(
                        "{}/{}/{}",
                        self.documents_root(), COLLECTION, category.name()
                    ),
                    "fieldTransforms": [{
                        "fieldPath": COUNT_FIELD,
                        "increment": { "integerValue": "1" }
                    }]
                }
            }]
        })
    }

    async fn store_error(response: reqwest::Response, context: &str) -> ServiceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ServiceError::Store(format!("{} failed: HTTP {}: {}", context, status, body))
    }
}

#[async_trait]
impl CounterStore for FirestoreCounterStore {
    async fn get(&self, category: Category) -> Result<Option<u64>> {
        let response = self
            .http
            .get(self.document_url(category))
            .query(&[("key", self.credentials.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::store_error(response, "get").await);
        }

        let document: Document = response.json().await?;
        Ok(Some(document.count()?))
    }

    async fn increment(&self, category: Category) -> Result<()> {
        let url = format!("{}/{}:commit", self.base_url, self.documents_root());
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.credentials.api_key.as_str())])
            .json(&self.increment_body(category))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::store_error(response, "increment").await);
        }

        tracing::debug!("Incremented counter for '{}'", category);
        Ok(())
    }

    async fn list_all(&self) -> Result<BTreeMap<Category, u64>> {
        let url = format!("{}/{}/{}", self.base_url, self.documents_root(), COLLECTION);
        let mut counts = BTreeMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .query(&[("key", self.credentials.api_key.as_str())]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(Self::store_error(response, "list_all").await);
            }

            let page: ListDocumentsResponse = response.json().await?;
            for document in page.documents {
                match document.category() {
                    Some(category) => {
                        counts.insert(category, document.count()?);
                    }
                    None => {
                        tracing::warn!("Ignoring unknown category document '{}'", document.name);
                    }
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(counts)
    }
}
