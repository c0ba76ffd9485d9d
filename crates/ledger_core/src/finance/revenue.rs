//! Revenue bucketing behind the income charts.
//!
//! # Invariants
//! - Only paid projects with a close date feed `income_by_period`.
//! - Every period in the range is emitted, including empty ones, and every
//!   media type appears in each period so stacked charts line up.

use crate::finance::fees::calculate_fee_total;
use crate::model::{MediaType, Project, ProjectStatus};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeMap;

/// Fee total of closed projects for one media type.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaTypeTotal {
    pub media_type: MediaType,
    pub total_fee: f64,
}

/// Chart window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    /// Twelve weeks back to one week ahead, one bucket per day.
    Week,
    /// Twenty-four months back through the current month.
    Month,
    /// Twelve months back through the current month.
    SixMonths,
    /// January 1st two years back through December 31st this year.
    Year,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
            Self::SixMonths => "6 Months",
            Self::Year => "Year",
        }
    }

    /// Inclusive first and last day of the window around `today`.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Week => (
                today.checked_sub_days(Days::new(12 * 7)).unwrap_or(today),
                today.checked_add_days(Days::new(7)).unwrap_or(today),
            ),
            Self::Month => (months_back(today, 24), end_of_month(today)),
            Self::SixMonths => (months_back(today, 12), end_of_month(today)),
            Self::Year => (
                NaiveDate::from_ymd_opt(today.year() - 2, 1, 1).unwrap_or(today),
                NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
            ),
        }
    }

    fn is_daily(self) -> bool {
        matches!(self, Self::Week)
    }

    fn bucket_of(self, date: NaiveDate) -> NaiveDate {
        if self.is_daily() {
            date
        } else {
            start_of_month(date)
        }
    }

    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        if self.is_daily() {
            date.checked_add_days(Days::new(1))
        } else {
            date.checked_add_months(Months::new(1))
        }
    }
}

/// Income collected in one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotal {
    /// Day for daily buckets, first day of month otherwise.
    pub period_start: NaiveDate,
    pub total_fee: f64,
    /// One entry per media type in `MediaType::ALL` order, zeros included.
    pub by_media_type: Vec<(MediaType, f64)>,
}

/// Totals of closed projects grouped by media type.
///
/// Zero totals are dropped; the result is sorted by total, largest first.
pub fn media_type_totals(projects: &[Project]) -> Vec<MediaTypeTotal> {
    let mut grouped: BTreeMap<MediaType, f64> = BTreeMap::new();
    for project in projects
        .iter()
        .filter(|project| project.status == ProjectStatus::Closed)
    {
        *grouped.entry(project.media_type).or_insert(0.0) += calculate_fee_total(&project.items);
    }

    let mut totals: Vec<MediaTypeTotal> = grouped
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(media_type, total_fee)| MediaTypeTotal {
            media_type,
            total_fee,
        })
        .collect();
    totals.sort_by(|a, b| b.total_fee.total_cmp(&a.total_fee));
    totals
}

/// Paid income per period of `range`, keyed by close date.
pub fn income_by_period(projects: &[Project], range: TimeRange, today: NaiveDate) -> Vec<PeriodTotal> {
    let (start, end) = range.bounds(today);

    let mut buckets: BTreeMap<NaiveDate, BTreeMap<MediaType, f64>> = BTreeMap::new();
    for project in projects.iter().filter(|project| project.paid) {
        let Some(closed_at) = project.date_closed else {
            continue;
        };
        let closed_on = closed_at.date_naive();
        if closed_on < start || closed_on > end {
            continue;
        }
        *buckets
            .entry(range.bucket_of(closed_on))
            .or_default()
            .entry(project.media_type)
            .or_insert(0.0) += calculate_fee_total(&project.items);
    }

    let mut periods = Vec::new();
    let mut current = range.bucket_of(start);
    while current <= end {
        let totals = buckets.get(&current);
        let by_media_type: Vec<(MediaType, f64)> = MediaType::ALL
            .into_iter()
            .map(|kind| {
                let fee = totals.and_then(|map| map.get(&kind)).copied().unwrap_or(0.0);
                (kind, fee)
            })
            .collect();
        periods.push(PeriodTotal {
            period_start: current,
            total_fee: by_media_type.iter().map(|(_, fee)| fee).sum(),
            by_media_type,
        });

        match range.step(current) {
            Some(next) => current = next,
            None => break,
        }
    }
    periods
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn months_back(today: NaiveDate, months: u32) -> NaiveDate {
    start_of_month(today)
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemType};
    use chrono::{TimeZone, Utc};

    fn paid_project(media_type: MediaType, fee: f64, closed: (i32, u32, u32)) -> Project {
        let mut project = Project::new("Gig");
        project.media_type = media_type;
        project.add_item(Item::new("line", fee, ItemType::Concert));
        project.mark_paid(
            Utc.with_ymd_and_hms(closed.0, closed.1, closed.2, 12, 0, 0)
                .unwrap(),
        );
        project
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn media_totals_skip_open_and_zero_projects() {
        let open = Project::new("open");
        let projects = vec![
            paid_project(MediaType::Film, 100.0, (2025, 1, 5)),
            paid_project(MediaType::Tour, 500.0, (2025, 1, 6)),
            paid_project(MediaType::Film, 50.0, (2025, 2, 1)),
            paid_project(MediaType::Lesson, 0.0, (2025, 2, 1)),
            open,
        ];

        let totals = media_type_totals(&projects);
        assert_eq!(
            totals,
            vec![
                MediaTypeTotal {
                    media_type: MediaType::Tour,
                    total_fee: 500.0
                },
                MediaTypeTotal {
                    media_type: MediaType::Film,
                    total_fee: 150.0
                },
            ]
        );
    }

    #[test]
    fn bounds_per_range() {
        let today = day(2025, 3, 15);
        assert_eq!(TimeRange::Month.bounds(today), (day(2023, 3, 1), day(2025, 3, 31)));
        assert_eq!(TimeRange::SixMonths.bounds(today), (day(2024, 3, 1), day(2025, 3, 31)));
        assert_eq!(TimeRange::Year.bounds(today), (day(2023, 1, 1), day(2025, 12, 31)));
        assert_eq!(TimeRange::Week.bounds(today), (day(2024, 12, 21), day(2025, 3, 22)));
    }

    #[test]
    fn monthly_buckets_include_empty_months() {
        let today = day(2025, 3, 15);
        let projects = vec![
            paid_project(MediaType::Film, 100.0, (2025, 3, 2)),
            paid_project(MediaType::Concert, 40.0, (2025, 3, 20)),
            paid_project(MediaType::Film, 10.0, (2024, 4, 1)),
            paid_project(MediaType::Film, 999.0, (2023, 1, 1)),
        ];

        let periods = income_by_period(&projects, TimeRange::SixMonths, today);
        assert_eq!(periods.len(), 13);
        assert_eq!(periods[0].period_start, day(2024, 3, 1));
        assert_eq!(periods[0].total_fee, 0.0);
        assert_eq!(periods[1].total_fee, 10.0);

        let march = periods.last().unwrap();
        assert_eq!(march.period_start, day(2025, 3, 1));
        assert_eq!(march.total_fee, 140.0);
        assert_eq!(march.by_media_type.len(), MediaType::ALL.len());
        assert!(march
            .by_media_type
            .contains(&(MediaType::Concert, 40.0)));
    }

    #[test]
    fn weekly_range_is_daily() {
        let today = day(2025, 3, 15);
        let projects = vec![paid_project(MediaType::Tv, 25.0, (2025, 3, 14))];
        let periods = income_by_period(&projects, TimeRange::Week, today);
        assert_eq!(periods.len(), 92);
        let hit = periods
            .iter()
            .find(|period| period.period_start == day(2025, 3, 14))
            .unwrap();
        assert_eq!(hit.total_fee, 25.0);
    }
}
