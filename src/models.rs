use serde::{Deserialize, Serialize};

/// One entry of a web-app manifest `icons` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String, // "72x72"
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub purpose: String,
}
