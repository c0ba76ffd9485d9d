//! Project (gig) record and its workflow helpers.
//!
//! # Invariants
//! - `items` keeps insertion order; it is never re-sorted by core.
//! - `paid == true` implies `delivered == true`. The workflow helpers keep this
//!   true; the entity validator does not check it.

use crate::finance::calculate_fee_total;
use crate::model::client::ClientId;
use crate::model::invoice::Invoice;
use crate::model::item::Item;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProjectId = Uuid;

/// Billing lifecycle of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    Delivered,
    Closed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Open,
        ProjectStatus::Delivered,
        ProjectStatus::Closed,
    ];

    /// Display label. `Closed` is shown as `Paid`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Delivered => "Delivered",
            Self::Closed => "Paid",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

/// Kind of engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Film,
    Tv,
    Recording,
    Game,
    Concert,
    Tour,
    Lesson,
    Other,
}

impl MediaType {
    pub const ALL: [MediaType; 8] = [
        MediaType::Film,
        MediaType::Tv,
        MediaType::Recording,
        MediaType::Game,
        MediaType::Concert,
        MediaType::Tour,
        MediaType::Lesson,
        MediaType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Film => "Film",
            Self::Tv => "TV",
            Self::Recording => "Recording",
            Self::Game => "Video Game",
            Self::Concert => "Concert",
            Self::Tour => "Tour",
            Self::Lesson => "Lesson",
            Self::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// Billable engagement with a date range, optional client, items and invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub project_name: String,
    /// Optional on forms; see `ProjectRules` for the save-time policy.
    pub artist: String,
    pub start_date: DateTime<Utc>,
    /// Must be strictly after `start_date`.
    pub end_date: DateTime<Utc>,
    pub status: ProjectStatus,
    pub media_type: MediaType,
    pub notes: String,
    pub delivered: bool,
    pub paid: bool,
    pub date_opened: DateTime<Utc>,
    pub date_delivered: Option<DateTime<Utc>>,
    pub date_closed: Option<DateTime<Utc>>,
    pub client_id: Option<ClientId>,
    pub invoice: Option<Invoice>,
    pub items: Vec<Item>,
}

impl Project {
    /// Creates an open one-hour recording project starting now.
    pub fn new(project_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::with_id(Uuid::new_v4(), project_name, now, now + Duration::hours(1))
    }

    /// Creates a project with caller-provided identity and dates.
    pub fn with_id(
        id: ProjectId,
        project_name: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_name: project_name.into(),
            artist: String::new(),
            start_date,
            end_date,
            status: ProjectStatus::Open,
            media_type: MediaType::Recording,
            notes: String::new(),
            delivered: false,
            paid: false,
            date_opened: start_date,
            date_delivered: None,
            date_closed: None,
            client_id: None,
            invoice: None,
            items: Vec::new(),
        }
    }

    /// Appends an item, keeping insertion order.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Sum of this project's item fees.
    pub fn fee_total(&self) -> f64 {
        calculate_fee_total(&self.items)
    }

    /// Marks the work as delivered.
    pub fn mark_delivered(&mut self, at: DateTime<Utc>) {
        self.delivered = true;
        self.date_delivered = Some(at);
        if self.status == ProjectStatus::Open {
            self.status = ProjectStatus::Delivered;
        }
    }

    /// Marks the project paid and closed. Delivers first when needed.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        if !self.delivered {
            self.mark_delivered(at);
        }
        self.paid = true;
        self.date_closed = Some(at);
        self.status = ProjectStatus::Closed;
    }

    /// Returns the project to the open state and clears workflow timestamps.
    pub fn reopen(&mut self) {
        self.delivered = false;
        self.paid = false;
        self.date_delivered = None;
        self.date_closed = None;
        self.status = ProjectStatus::Open;
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaType, Project, ProjectStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn mark_paid_also_delivers() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut project = Project::new("Session A");

        project.mark_paid(at);

        assert!(project.delivered);
        assert!(project.paid);
        assert_eq!(project.status, ProjectStatus::Closed);
        assert_eq!(project.date_delivered, Some(at));
        assert_eq!(project.date_closed, Some(at));
    }

    #[test]
    fn reopen_clears_workflow_state() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut project = Project::new("Session A");
        project.mark_paid(at);

        project.reopen();

        assert!(!project.delivered && !project.paid);
        assert_eq!(project.status, ProjectStatus::Open);
        assert_eq!(project.date_closed, None);
    }

    #[test]
    fn labels_round_trip() {
        for kind in MediaType::ALL {
            assert_eq!(MediaType::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ProjectStatus::Closed.label(), "Paid");
        assert_eq!(MediaType::Game.label(), "Video Game");
    }
}
