//! Billable line items.

use serde::{Deserialize, Serialize};

/// Kind of billable line. Labels match the picker shown in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Session,
    Overdub,
    Demo,
    Rehearsal,
    Concert,
    Tour,
    PerDiem,
    Reimbursement,
    Arrangement,
    Score,
    Production,
    Rental,
    Lesson,
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 14] = [
        ItemType::Session,
        ItemType::Overdub,
        ItemType::Demo,
        ItemType::Rehearsal,
        ItemType::Concert,
        ItemType::Tour,
        ItemType::PerDiem,
        ItemType::Reimbursement,
        ItemType::Arrangement,
        ItemType::Score,
        ItemType::Production,
        ItemType::Rental,
        ItemType::Lesson,
        ItemType::Other,
    ];

    /// Display label, also used in backups.
    pub fn label(self) -> &'static str {
        match self {
            Self::Session => "Tracking Session",
            Self::Overdub => "Overdub",
            Self::Demo => "Demo",
            Self::Rehearsal => "Rehearsal",
            Self::Concert => "Concert",
            Self::Tour => "Tour",
            Self::PerDiem => "Per Diem",
            Self::Reimbursement => "Reimbursement",
            Self::Arrangement => "Arrangement",
            Self::Score => "Score",
            Self::Production => "Production Services",
            Self::Rental => "Chart Rental",
            Self::Lesson => "Lesson",
            Self::Other => "Other",
        }
    }

    /// Parses a display label back into an item type.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// One billable line on a project.
///
/// `fee` is a flat amount; currency formatting happens at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub fee: f64,
    pub item_type: ItemType,
    pub notes: String,
}

impl Item {
    pub fn new(name: impl Into<String>, fee: f64, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            fee,
            item_type,
            notes: String::new(),
        }
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new("", 0.0, ItemType::Overdub)
    }
}
