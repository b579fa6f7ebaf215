//! Deployment root handling for links handed to browsers.
//!
//! A deployment served under a sub-path (say `/galaxy/`) needs absolute
//! links rewritten under that root. API requests built by the client go
//! through `base_url` instead; this only affects display links.

use serde::{Deserialize, Serialize};

/// Normalized application root. Always starts and ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AppRoot(String);

impl AppRoot {
    pub fn new(root: &str) -> Self {
        let trimmed = root.trim_matches('/');
        if trimmed.is_empty() {
            AppRoot("/".to_string())
        } else {
            AppRoot(format!("/{trimmed}/"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rewrites an absolute path under the root. Relative paths and the
    /// default `/` root leave `path` untouched.
    pub fn with_prefix(&self, path: &str) -> String {
        match path.strip_prefix('/') {
            Some(rest) if self.0 != "/" => format!("{}{rest}", self.0),
            _ => path.to_string(),
        }
    }
}

impl Default for AppRoot {
    fn default() -> Self {
        AppRoot("/".to_string())
    }
}

impl From<String> for AppRoot {
    fn from(root: String) -> Self {
        AppRoot::new(&root)
    }
}

impl From<AppRoot> for String {
    fn from(root: AppRoot) -> Self {
        root.0
    }
}
