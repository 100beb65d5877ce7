use serde::Serialize;

/// One manifest row. Paths are written as given; existence is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Label")]
    pub label: String,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}
