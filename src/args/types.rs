use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which URL source feeds the batch slots.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Every slot requests the same `--url`.
    Static,
    /// Slot `i` requests line `i` of `--url-file`.
    List,
}

impl SourceKind {
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self, SourceKind::Static)
    }
}

/// Name/value pair shown as the first column of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunLabel {
    pub name: String,
    pub value: String,
}

impl RunLabel {
    /// Label used when none is configured: whether the run hit one static URL.
    #[must_use]
    pub fn static_source(is_static: bool) -> Self {
        Self {
            name: "Static URL".to_owned(),
            value: if is_static { "Yes" } else { "No" }.to_owned(),
        }
    }
}
