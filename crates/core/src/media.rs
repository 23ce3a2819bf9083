//! Media value object: a reference to an uploaded file.

use serde::{Deserialize, Serialize};

/// A stored upload (avatar, resume, skill svg, project banner, ...).
///
/// Compared by value: two assets with the same `public_id` and `url` are the
/// same asset. `public_id` is the handle used to delete the file later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub public_id: String,
    pub url: String,
}

impl MediaAsset {
    pub fn new(public_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            url: url.into(),
        }
    }
}
