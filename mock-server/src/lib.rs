use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use url::form_urlencoded;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    pub id: String,
    pub history_id: String,
    pub hid: u64,
    pub name: String,
    pub history_content_type: String,
    pub extension: String,
    pub deleted: bool,
    pub purged: bool,
    pub visible: bool,
    pub tags: Vec<String>,
    #[serde(skip)]
    created: u64,
    #[serde(skip)]
    updated: u64,
}

#[derive(Deserialize)]
pub struct UpdateContent {
    pub deleted: Option<bool>,
    pub visible: Option<bool>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub purge: bool,
}

#[derive(Deserialize)]
pub struct CopyContent {
    pub source: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateTags {
    pub item_id: String,
    pub item_class: String,
    pub item_tags: Vec<String>,
}

/// In-memory histories. Tags on items other than history datasets are kept
/// in `tags`, keyed by `(item_class, item_id)`.
#[derive(Debug, Default)]
pub struct Store {
    datasets: HashMap<String, Dataset>,
    next_hid: HashMap<String, u64>,
    clock: u64,
    tags: HashMap<(String, String), Vec<String>>,
}

impl Store {
    pub fn insert_dataset(&mut self, history_id: &str, name: &str, extension: &str) -> Dataset {
        let dataset = Dataset {
            id: Uuid::new_v4().simple().to_string(),
            history_id: history_id.to_string(),
            hid: self.take_hid(history_id),
            name: name.to_string(),
            history_content_type: "dataset".to_string(),
            extension: extension.to_string(),
            deleted: false,
            purged: false,
            visible: true,
            tags: Vec::new(),
            created: self.tick(),
            updated: 0,
        };
        self.store(dataset)
    }

    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    pub fn item_tags(&self, item_class: &str, item_id: &str) -> Option<&[String]> {
        if item_class == "HistoryDatasetAssociation" {
            return self.datasets.get(item_id).map(|d| d.tags.as_slice());
        }
        self.tags
            .get(&(item_class.to_string(), item_id.to_string()))
            .map(Vec::as_slice)
    }

    fn store(&mut self, mut dataset: Dataset) -> Dataset {
        dataset.updated = dataset.created;
        self.datasets.insert(dataset.id.clone(), dataset.clone());
        dataset
    }

    fn take_hid(&mut self, history_id: &str) -> u64 {
        let hid = self.next_hid.entry(history_id.to_string()).or_insert(1);
        let current = *hid;
        *hid += 1;
        current
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn history_dataset_mut(&mut self, history_id: &str, id: &str) -> Option<&mut Dataset> {
        self.datasets
            .get_mut(id)
            .filter(|d| d.history_id == history_id)
    }
}

pub type Db = Arc<RwLock<Store>>;

type HandlerResult<T> = Result<T, (StatusCode, String)>;

fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "item not found".to_string())
}

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::default())))
}

pub fn app_with_store(db: Db) -> Router {
    Router::new()
        .route("/api/datasets", get(list_datasets))
        .route("/api/histories/{history_id}/contents/{kind}", post(copy_content))
        .route(
            "/api/histories/{history_id}/contents/{kind}/{id}",
            put(update_content).delete(delete_content),
        )
        .route("/api/tags", put(update_tags))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(db)).await
}

/// Only plain datasets are stored; `{type}s` must be `datasets`.
fn require_datasets(kind: &str) -> HandlerResult<()> {
    match kind {
        "datasets" => Ok(()),
        other => Err(bad_request(format!("unsupported content type: {other}"))),
    }
}

#[derive(Debug, Default)]
struct ListQuery {
    order: Option<String>,
    limit: Option<usize>,
    offset: usize,
    q: Vec<String>,
    qv: Vec<String>,
}

fn parse_list_query(raw: Option<&str>) -> HandlerResult<ListQuery> {
    let mut query = ListQuery::default();
    for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "order" => query.order = Some(value.into_owned()),
            "limit" => {
                query.limit = Some(value.parse().map_err(|_| bad_request("invalid limit"))?)
            }
            "offset" => query.offset = value.parse().map_err(|_| bad_request("invalid offset"))?,
            "q" => query.q.push(value.into_owned()),
            "qv" => query.qv.push(value.into_owned()),
            _ => {}
        }
    }
    if query.q.len() != query.qv.len() {
        return Err(bad_request("q and qv must have the same length"));
    }
    Ok(query)
}

fn matches_filter(dataset: &Dataset, key: &str, value: &str) -> HandlerResult<bool> {
    match key {
        "name-contains" => Ok(dataset
            .name
            .to_lowercase()
            .contains(&value.to_lowercase())),
        "history_id-eq" => Ok(dataset.history_id == value),
        "deleted-eq" => {
            let wanted: bool = value.parse().map_err(|_| bad_request("invalid deleted-eq"))?;
            Ok(dataset.deleted == wanted)
        }
        other => Err(bad_request(format!("unsupported filter: {other}"))),
    }
}

fn comparator(order: &str) -> HandlerResult<impl Fn(&Dataset, &Dataset) -> Ordering> {
    let (field, desc) = if let Some(field) = order.strip_suffix("-dsc") {
        (field, true)
    } else if let Some(field) = order.strip_suffix("-asc") {
        (field, false)
    } else {
        return Err(bad_request(format!("invalid order: {order}")));
    };
    let key: fn(&Dataset, &Dataset) -> Ordering = match field {
        "name" => |a, b| a.name.cmp(&b.name),
        "hid" => |a, b| a.hid.cmp(&b.hid),
        "create_time" => |a, b| a.created.cmp(&b.created),
        "update_time" => |a, b| a.updated.cmp(&b.updated),
        other => return Err(bad_request(format!("unsupported order field: {other}"))),
    };
    Ok(move |a: &Dataset, b: &Dataset| {
        let ord = key(a, b).then_with(|| a.created.cmp(&b.created));
        if desc {
            ord.reverse()
        } else {
            ord
        }
    })
}

async fn list_datasets(
    State(db): State<Db>,
    RawQuery(raw): RawQuery,
) -> HandlerResult<Json<Vec<Dataset>>> {
    let query = parse_list_query(raw.as_deref())?;
    debug!("list datasets: {query:?}");

    let store = db.read().await;
    let mut datasets = Vec::new();
    'outer: for dataset in store.datasets.values() {
        for (key, value) in query.q.iter().zip(&query.qv) {
            if !matches_filter(dataset, key, value)? {
                continue 'outer;
            }
        }
        datasets.push(dataset.clone());
    }

    let compare = comparator(query.order.as_deref().unwrap_or("create_time-dsc"))?;
    datasets.sort_by(|a, b| compare(a, b));

    let page = datasets
        .into_iter()
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    Ok(Json(page))
}

async fn update_content(
    State(db): State<Db>,
    Path((history_id, kind, id)): Path<(String, String, String)>,
    Json(input): Json<UpdateContent>,
) -> HandlerResult<Json<Dataset>> {
    require_datasets(&kind)?;
    let mut store = db.write().await;
    let now = store.tick();
    let dataset = store
        .history_dataset_mut(&history_id, &id)
        .ok_or_else(not_found)?;

    if let Some(deleted) = input.deleted {
        if !deleted && dataset.purged {
            return Err(bad_request("cannot undelete a purged dataset"));
        }
        dataset.deleted = deleted;
    }
    if let Some(visible) = input.visible {
        dataset.visible = visible;
    }
    if let Some(name) = input.name {
        dataset.name = name;
    }
    dataset.updated = now;
    info!("updated dataset {id} in history {history_id}");
    Ok(Json(dataset.clone()))
}

async fn delete_content(
    State(db): State<Db>,
    Path((history_id, kind, id)): Path<(String, String, String)>,
    Query(params): Query<DeleteParams>,
) -> HandlerResult<Json<Dataset>> {
    require_datasets(&kind)?;
    let mut store = db.write().await;
    let now = store.tick();
    let dataset = store
        .history_dataset_mut(&history_id, &id)
        .ok_or_else(not_found)?;

    dataset.deleted = true;
    if params.purge {
        dataset.purged = true;
    }
    dataset.updated = now;
    info!("deleted dataset {id} in history {history_id} (purge={})", params.purge);
    Ok(Json(dataset.clone()))
}

async fn copy_content(
    State(db): State<Db>,
    Path((history_id, kind)): Path<(String, String)>,
    Json(input): Json<CopyContent>,
) -> HandlerResult<Json<Dataset>> {
    require_datasets(&kind)?;
    if input.source != "hda" {
        return Err(bad_request(format!("unsupported source: {}", input.source)));
    }

    let mut store = db.write().await;
    let source = store.dataset(&input.content).cloned().ok_or_else(not_found)?;
    let copy = Dataset {
        id: Uuid::new_v4().simple().to_string(),
        history_id: history_id.clone(),
        hid: store.take_hid(&history_id),
        deleted: false,
        purged: false,
        visible: true,
        created: store.tick(),
        ..source
    };
    let copy = store.store(copy);
    info!("copied dataset {} into history {history_id} as {}", input.content, copy.id);
    Ok(Json(copy))
}

async fn update_tags(State(db): State<Db>, Json(input): Json<UpdateTags>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    if input.item_class == "HistoryDatasetAssociation" {
        let now = store.tick();
        let dataset = store.datasets.get_mut(&input.item_id).ok_or_else(not_found)?;
        dataset.tags = input.item_tags;
        dataset.updated = now;
    } else {
        store
            .tags
            .insert((input.item_class.clone(), input.item_id.clone()), input.item_tags);
    }
    info!("replaced tags on {} {}", input.item_class, input.item_id);
    Ok(StatusCode::NO_CONTENT)
}
