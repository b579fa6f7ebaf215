//! Caller-facing list options and their wire form.
//!
//! `GetDatasetsOptions` is what UI code naturally has on hand (a sort column,
//! a direction flag, a search box). `ListDatasetsParams` is exactly what
//! `GET /api/datasets` accepts. The conversion keeps no state.

use url::form_urlencoded;

/// Filter key paired with a free-text search.
pub const NAME_CONTAINS: &str = "name-contains";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDatasetsOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_by: Option<String>,
    /// Only consulted when `sort_by` is set.
    pub sort_desc: bool,
    pub query: Option<String>,
}

impl GetDatasetsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, desc: bool) -> Self {
        self.sort_by = Some(field.into());
        self.sort_desc = desc;
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// Query parameters of `GET /api/datasets`.
///
/// `q` and `qv` are positionally paired and always the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDatasetsParams {
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub q: Vec<String>,
    pub qv: Vec<String>,
}

impl ListDatasetsParams {
    /// Encodes the params as a query string, arrays as repeated keys.
    /// Returns an empty string when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(order) = &self.order {
            serializer.append_pair("order", order);
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            serializer.append_pair("offset", &offset.to_string());
        }
        for key in &self.q {
            serializer.append_pair("q", key);
        }
        for value in &self.qv {
            serializer.append_pair("qv", value);
        }
        serializer.finish()
    }
}

impl From<&GetDatasetsOptions> for ListDatasetsParams {
    fn from(options: &GetDatasetsOptions) -> Self {
        let mut params = ListDatasetsParams::default();

        if let Some(sort_by) = options.sort_by.as_deref().filter(|s| !s.is_empty()) {
            let direction = if options.sort_desc { "-dsc" } else { "-asc" };
            params.order = Some(format!("{sort_by}{direction}"));
        }
        // Zero is indistinguishable from "not given" here.
        params.limit = options.limit.filter(|&n| n != 0);
        params.offset = options.offset.filter(|&n| n != 0);

        if let Some(query) = options.query.as_deref().filter(|s| !s.is_empty()) {
            params.q = vec![NAME_CONTAINS.to_string()];
            params.qv = vec![query.to_string()];
        }
        params
    }
}
