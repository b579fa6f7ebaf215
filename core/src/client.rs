//! Request builder and response parser for the datasets endpoints.
//!
//! # Design
//! `DatasetsClient` holds only its base URL and application root, and
//! carries no mutable state between calls. Every operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`. The un-prefixed methods (`list_datasets`,
//! `purge_dataset`, ...) run build, one `Transport::execute`, and parse.
//! Failures are returned as-is; nothing is retried or cached here.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::options::{GetDatasetsOptions, ListDatasetsParams};
use crate::prefix::AppRoot;
use crate::types::{
    CopyContentBody, CopySource, DatasetSummary, HistoryContentType, HistoryItem,
    TaggableItemClass, UpdateContentBody, UpdateTagsBody,
};

/// Settings a host needs to construct a `DatasetsClient`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub app_root: AppRoot,
}

/// Stateless client for the dataset endpoints. Cheap to clone and safe to
/// share; build it once and reuse it.
#[derive(Debug, Clone)]
pub struct DatasetsClient {
    base_url: Url,
    app_root: AppRoot,
}

impl DatasetsClient {
    /// Creates a client rooted at `base_url`, which may include a sub-path.
    /// A trailing slash is stripped. Base URLs carrying a query or fragment
    /// are rejected since request paths are appended to them.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let invalid = |reason: &str| ApiError::InvalidUrl(format!("{base_url}: {reason}"));
        let mut url = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }
        url.path_segments_mut()
            .map_err(|()| invalid("not a hierarchical url"))?
            .pop_if_empty();
        Ok(Self {
            base_url: url,
            app_root: AppRoot::default(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(&config.base_url)?.with_app_root(config.app_root.clone()))
    }

    /// Sets the deployment root used by `composite_dataset_link`.
    pub fn with_app_root(mut self, app_root: AppRoot) -> Self {
        self.app_root = app_root;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn app_root(&self) -> &AppRoot {
        &self.app_root
    }

    // -- list --

    pub fn build_list_datasets(&self, options: &GetDatasetsOptions) -> HttpRequest {
        let params = ListDatasetsParams::from(options);
        let query = params.to_query_string();
        let mut url = self.endpoint(&["api", "datasets"]);
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        debug!("built list datasets request: {params:?}");
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_datasets(&self, response: HttpResponse) -> Result<Vec<DatasetSummary>, ApiError> {
        check_status(&response, &[200])?;
        parse_json(&response.body)
    }

    pub fn list_datasets<T: Transport>(
        &self,
        transport: &T,
        options: &GetDatasetsOptions,
    ) -> Result<Vec<DatasetSummary>, ApiError> {
        let response = transport.execute(self.build_list_datasets(options))?;
        self.parse_list_datasets(response)
    }

    // -- undelete --

    /// Marks a history dataset as not deleted. Sends only `deleted: false`.
    pub fn build_undelete_dataset(
        &self,
        history_id: &str,
        dataset_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.content_item_url(history_id, HistoryContentType::Dataset, dataset_id);
        debug!("built undelete request for dataset {dataset_id} in history {history_id}");
        json_request(HttpMethod::Put, url.into(), &UpdateContentBody { deleted: false })
    }

    pub fn parse_undelete_dataset(&self, response: HttpResponse) -> Result<HistoryItem, ApiError> {
        check_status(&response, &[200])?;
        parse_json(&response.body)
    }

    pub fn undelete_dataset<T: Transport>(
        &self,
        transport: &T,
        history_id: &str,
        dataset_id: &str,
    ) -> Result<HistoryItem, ApiError> {
        let response = transport.execute(self.build_undelete_dataset(history_id, dataset_id)?)?;
        self.parse_undelete_dataset(response)
    }

    // -- purge --

    /// Permanently removes a history dataset. `purge=true` travels in the
    /// query string; there is no body.
    pub fn build_purge_dataset(&self, history_id: &str, dataset_id: &str) -> HttpRequest {
        let mut url = self.content_item_url(history_id, HistoryContentType::Dataset, dataset_id);
        url.query_pairs_mut().append_pair("purge", "true");
        debug!("built purge request for dataset {dataset_id} in history {history_id}");
        HttpRequest {
            method: HttpMethod::Delete,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `None` when the server acknowledges with an empty 204.
    pub fn parse_purge_dataset(&self, response: HttpResponse) -> Result<Option<HistoryItem>, ApiError> {
        check_status(&response, &[200, 204])?;
        if response.status == 204 || response.body.trim().is_empty() {
            return Ok(None);
        }
        parse_json(&response.body).map(Some)
    }

    pub fn purge_dataset<T: Transport>(
        &self,
        transport: &T,
        history_id: &str,
        dataset_id: &str,
    ) -> Result<Option<HistoryItem>, ApiError> {
        let response = transport.execute(self.build_purge_dataset(history_id, dataset_id))?;
        self.parse_purge_dataset(response)
    }

    // -- copy --

    pub fn build_copy_content(
        &self,
        content_id: &str,
        history_id: &str,
        content_type: HistoryContentType,
        source: CopySource,
    ) -> Result<HttpRequest, ApiError> {
        let collection = format!("{}s", content_type.as_str());
        let url = self.endpoint(&["api", "histories", history_id, "contents", &collection]);
        debug!("built copy request for {content_id} ({source:?}) into history {history_id}");
        json_request(
            HttpMethod::Post,
            url.into(),
            &CopyContentBody {
                source,
                content: content_id,
            },
        )
    }

    pub fn parse_copy_content(&self, response: HttpResponse) -> Result<HistoryItem, ApiError> {
        check_status(&response, &[200, 201])?;
        parse_json(&response.body)
    }

    /// Copies `content_id` into `history_id` with an explicit type and source.
    pub fn copy_content<T: Transport>(
        &self,
        transport: &T,
        content_id: &str,
        history_id: &str,
        content_type: HistoryContentType,
        source: CopySource,
    ) -> Result<HistoryItem, ApiError> {
        let request = self.build_copy_content(content_id, history_id, content_type, source)?;
        self.parse_copy_content(transport.execute(request)?)
    }

    /// Copies a history dataset (`type = dataset`, `source = hda`).
    pub fn copy_dataset<T: Transport>(
        &self,
        transport: &T,
        dataset_id: &str,
        history_id: &str,
    ) -> Result<HistoryItem, ApiError> {
        self.copy_content(
            transport,
            dataset_id,
            history_id,
            HistoryContentType::default(),
            CopySource::default(),
        )
    }

    // -- tags --

    /// Replaces the full tag set of an item. Tags missing from `item_tags`
    /// are removed server-side.
    pub fn build_update_tags(
        &self,
        item_id: &str,
        item_class: TaggableItemClass,
        item_tags: &[String],
    ) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint(&["api", "tags"]);
        debug!(
            "built tag update for {item_class:?} {item_id} ({} tags)",
            item_tags.len()
        );
        json_request(
            HttpMethod::Put,
            url.into(),
            &UpdateTagsBody {
                item_id,
                item_class,
                item_tags,
            },
        )
    }

    /// Returns the server payload unchanged, or `None` for an empty 204.
    pub fn parse_update_tags(&self, response: HttpResponse) -> Result<Option<serde_json::Value>, ApiError> {
        check_status(&response, &[200, 204])?;
        if response.status == 204 || response.body.trim().is_empty() {
            return Ok(None);
        }
        parse_json(&response.body).map(Some)
    }

    pub fn update_tags<T: Transport>(
        &self,
        transport: &T,
        item_id: &str,
        item_class: TaggableItemClass,
        item_tags: &[String],
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let response = transport.execute(self.build_update_tags(item_id, item_class, item_tags)?)?;
        self.parse_update_tags(response)
    }

    // -- links --

    /// Display link for one sub-file of a composite dataset.
    ///
    /// `path` is inserted verbatim. Callers pass it already encoded if it
    /// may contain `&`, `#` or other query-significant characters.
    pub fn composite_dataset_link(&self, history_dataset_id: &str, path: &str) -> String {
        self.app_root.with_prefix(&format!(
            "/api/datasets/{history_dataset_id}/display?filename={path}"
        ))
    }

    fn content_item_url(&self, history_id: &str, content_type: HistoryContentType, id: &str) -> Url {
        let collection = format!("{}s", content_type.as_str());
        self.endpoint(&["api", "histories", history_id, "contents", &collection, id])
    }

    /// Appends `segments` to the base path, percent-encoding each one so
    /// identifiers containing `/`, `?` or `#` stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn json_request<B: Serialize>(method: HttpMethod, url: String, body: &B) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map statuses outside `expected` to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    warn!("unexpected HTTP status {} (expected {expected:?})", response.status);
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
