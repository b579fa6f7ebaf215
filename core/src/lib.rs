//! Typed client core for the dataset endpoints of a Galaxy-style REST API.
//!
//! # Overview
//! Translates caller-friendly arguments into the exact wire shape of five
//! endpoints (list datasets, undelete, purge, copy, replace tags), and builds
//! display links for composite dataset files.
//!
//! # Design
//! - `DatasetsClient` is immutable after construction; it holds a base URL
//!   and an application root.
//! - Each operation has `build_*` (produces `HttpRequest`) and `parse_*`
//!   (consumes `HttpResponse`); the I/O itself sits behind [`Transport`].
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod prefix;
pub mod types;

pub use client::{ClientConfig, DatasetsClient};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use options::{GetDatasetsOptions, ListDatasetsParams, NAME_CONTAINS};
pub use prefix::AppRoot;
pub use types::{CopySource, DatasetSummary, HistoryContentType, HistoryItem, TaggableItemClass};
