//! Money math over in-memory project snapshots.
//!
//! # Invariants
//! - Totals are plain `f64` sums; no rounding happens here.
//! - Empty inputs yield `0.0` (or the supplied default invoice number).

pub mod fees;
pub mod revenue;

pub use fees::{calculate_fee_total, next_invoice_number, projects_fee_total};
pub use revenue::{income_by_period, media_type_totals, MediaTypeTotal, PeriodTotal, TimeRange};
