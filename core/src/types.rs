//! Wire DTOs for the datasets endpoints.
//!
//! # Design
//! These mirror the server schema but are defined independently of the
//! mock-server crate; the integration test catches drift. Response types
//! type the fields callers read and keep everything else in `extra`, so a
//! payload re-serializes without loss. Optional fields default so older
//! servers still parse.

use serde::{Deserialize, Serialize};

/// Kind of history content item, used in the `{type}s` path segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryContentType {
    #[default]
    Dataset,
    DatasetCollection,
}

impl HistoryContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryContentType::Dataset => "dataset",
            HistoryContentType::DatasetCollection => "dataset_collection",
        }
    }
}

/// Where a copied history item comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopySource {
    #[default]
    Hda,
    Hdca,
    Library,
    LibraryFolder,
    NewCollection,
}

/// Model classes the tags endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaggableItemClass {
    History,
    HistoryDatasetAssociation,
    HistoryDatasetCollectionAssociation,
    LibraryDatasetDatasetAssociation,
    Page,
    StoredWorkflow,
    Visualization,
}

/// One element of the `GET /api/datasets` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetSummary {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub history_id: Option<String>,
    #[serde(default)]
    pub hid: Option<u64>,
    #[serde(default)]
    pub history_content_type: Option<HistoryContentType>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub purged: bool,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    /// Every field not modelled above, kept as sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single history content item as returned by update, delete and copy.
///
/// Purge acks may carry no more than `id`, `deleted` and `purged`, so
/// everything but `id` is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    #[serde(default)]
    pub history_id: Option<String>,
    #[serde(default)]
    pub hid: Option<u64>,
    pub name: Option<String>,
    #[serde(default)]
    pub history_content_type: Option<HistoryContentType>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub purged: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_visible() -> bool {
    true
}

/// Body of the content update call used to undelete an item.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateContentBody {
    pub deleted: bool,
}

/// Body of the copy call.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CopyContentBody<'a> {
    pub source: CopySource,
    pub content: &'a str,
}

/// Body of `PUT /api/tags`. The tag list replaces whatever the item had.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateTagsBody<'a> {
    pub item_id: &'a str,
    pub item_class: TaggableItemClass,
    pub item_tags: &'a [String],
}
