//! Generated invoice record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sequentially numbered billing document attached to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Monotonic across the user's projects.
    pub number: i64,
    /// Derived display/file name, e.g. `Invoice_1001_Jane Doe_2025-11-02.pdf`.
    pub name: String,
    /// Rendered PDF location. `None` when rendering failed.
    pub file: Option<PathBuf>,
}

impl Invoice {
    pub fn new(number: i64, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            file: None,
        }
    }

    /// Whether a rendered document is attached.
    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}
